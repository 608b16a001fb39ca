use std::path::{Path, PathBuf};

use brujo_platform::{icon_theme_dirs, pixmap_dirs, WindowImage};
use image::imageops::FilterType;
use tracing::debug;

const THEMES: &[&str] = &["hicolor", "Adwaita", "breeze", "Papirus", "gnome"];
const CONTEXTS: &[&str] = &["apps", "places", "devices", "categories", "mimetypes"];
const SIZES: &[u32] = &[16, 22, 24, 32, 48, 64, 96, 128, 256, 512];

/// PNG lookup in freedesktop icon theme directories.
///
/// Only fixed-size PNG directories and the flat pixmap directories are
/// searched. Scalable SVG icons are not rendered.
#[derive(Debug, Clone)]
pub struct IconTheme {
    base_dirs: Vec<PathBuf>,
    pixmap_dirs: Vec<PathBuf>,
    themes: Vec<String>,
}

impl Default for IconTheme {
    fn default() -> Self {
        Self::new(icon_theme_dirs(), pixmap_dirs())
    }
}

impl IconTheme {
    pub fn new(base_dirs: Vec<PathBuf>, pixmap_dirs: Vec<PathBuf>) -> Self {
        Self {
            base_dirs,
            pixmap_dirs,
            themes: THEMES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Search `theme` before the built-in list.
    pub fn prefer_theme(&mut self, theme: &str) {
        self.themes.retain(|t| t != theme);
        self.themes.insert(0, theme.to_string());
    }

    /// Best file for `name` near `size` pixels.
    pub fn lookup(&self, name: &str, size: u32) -> Option<PathBuf> {
        if name.is_empty() || name.contains('/') {
            return None;
        }
        let file = format!("{name}.png");
        for size_dir in size_order(size) {
            for base in &self.base_dirs {
                for theme in &self.themes {
                    for context in CONTEXTS {
                        let path = base.join(theme).join(&size_dir).join(context).join(&file);
                        if path.is_file() {
                            return Some(path);
                        }
                    }
                }
            }
        }
        self.pixmap_dirs
            .iter()
            .map(|dir| dir.join(&file))
            .find(|path| path.is_file())
    }

    /// Look up `name` and load it scaled to `size`.
    pub fn load(&self, name: &str, size: u32) -> Option<WindowImage> {
        load_png(&self.lookup(name, size)?, size)
    }
}

/// `NxN` directory names: the exact size, then larger, then smaller.
fn size_order(size: u32) -> Vec<String> {
    let larger = SIZES.iter().filter(|s| **s >= size);
    let smaller = SIZES.iter().rev().filter(|s| **s < size);
    larger.chain(smaller).map(|s| format!("{s}x{s}")).collect()
}

/// Decode an image file and scale it to a `size`-pixel square.
pub fn load_png(path: &Path, size: u32) -> Option<WindowImage> {
    let decoded = match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            debug!("cannot decode {}: {e}", path.display());
            return None;
        }
    };
    let scaled = if decoded.width() == size && decoded.height() == size {
        decoded
    } else {
        image::imageops::resize(&decoded, size, size, FilterType::Lanczos3)
    };
    WindowImage::new(size, size, scaled.into_raw())
}

/// Scale a straight-RGBA image to a `size`-pixel square.
pub fn scale_image(source: &WindowImage, size: u32) -> Option<WindowImage> {
    if source.width == size && source.height == size {
        return Some(source.clone());
    }
    let buffer = image::RgbaImage::from_raw(source.width, source.height, source.rgba.clone())?;
    let scaled = image::imageops::resize(&buffer, size, size, FilterType::Lanczos3);
    WindowImage::new(size, size, scaled.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, size: u32) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let img = image::RgbaImage::from_pixel(size, size, image::Rgba([10, 20, 30, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn sizes_prefer_exact_then_larger() {
        let order = size_order(32);
        assert_eq!(order[0], "32x32");
        assert_eq!(order[1], "48x48");
        assert_eq!(order.last().unwrap(), "16x16");
    }

    #[test]
    fn finds_theme_icon() {
        let tmp = tempfile::tempdir().unwrap();
        let icon = tmp.path().join("hicolor/48x48/apps/gedit.png");
        write_png(&icon, 48);

        let theme = IconTheme::new(vec![tmp.path().to_path_buf()], vec![]);
        assert_eq!(theme.lookup("gedit", 32), Some(icon));
        let image = theme.load("gedit", 32).unwrap();
        assert_eq!((image.width, image.height), (32, 32));
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn falls_back_to_pixmaps() {
        let tmp = tempfile::tempdir().unwrap();
        let pixmap = tmp.path().join("pixmaps/xterm.png");
        write_png(&pixmap, 16);

        let theme = IconTheme::new(vec![tmp.path().join("icons")], vec![tmp.path().join("pixmaps")]);
        assert_eq!(theme.lookup("xterm", 32), Some(pixmap));
    }

    #[test]
    fn preferred_theme_wins() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(&tmp.path().join("hicolor/32x32/apps/term.png"), 32);
        let papirus = tmp.path().join("Papirus/32x32/apps/term.png");
        write_png(&papirus, 32);

        let mut theme = IconTheme::new(vec![tmp.path().to_path_buf()], vec![]);
        theme.prefer_theme("Papirus");
        assert_eq!(theme.lookup("term", 32), Some(papirus));
    }

    #[test]
    fn unknown_and_path_like_names_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let theme = IconTheme::new(vec![tmp.path().to_path_buf()], vec![]);
        assert!(theme.lookup("nothing", 32).is_none());
        assert!(theme.lookup("../etc/passwd", 32).is_none());
        assert!(theme.lookup("", 32).is_none());
    }

    #[test]
    fn scale_image_resizes() {
        let src = WindowImage::new(4, 4, vec![255; 64]).unwrap();
        let out = scale_image(&src, 2).unwrap();
        assert_eq!(out.rgba.len(), 16);
    }
}
