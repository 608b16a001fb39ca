//! Icon pixels for dock slots.
//!
//! Sources are tried in order: the window's own icon, an absolute path
//! from the desktop entry, theme names derived from the identifier, and
//! finally a generated glyph. The first hit is cached per identifier. A
//! generated glyph is replaced once if the application later shows a
//! window with an icon of its own.

mod fallback;
mod theme;

pub use fallback::{fallback_glyph, glyph_color, glyph_letter};
pub use theme::{load_png, scale_image, IconTheme};

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use brujo_panel::{icon_name_for_identifier, ApplicationIcon};
use brujo_platform::WindowImage;
use tracing::debug;

use crate::canvas::Fonts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSource {
    Window,
    File,
    Theme,
    Fallback,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    image: Arc<WindowImage>,
    source: IconSource,
    window_tried: bool,
}

#[derive(Debug)]
pub struct IconResolver {
    theme: IconTheme,
    fonts: Fonts,
    size: u32,
    cache: HashMap<String, CacheEntry>,
}

impl IconResolver {
    pub fn new(theme: IconTheme, fonts: Fonts, size: u32) -> Self {
        Self {
            theme,
            fonts,
            size,
            cache: HashMap::new(),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Change the icon size. Cached images of the old size are dropped.
    pub fn set_size(&mut self, size: u32) {
        if size != self.size {
            self.size = size;
            self.cache.clear();
        }
    }

    pub fn invalidate(&mut self, identifier: &str) {
        self.cache.remove(identifier);
    }

    pub fn source(&self, identifier: &str) -> Option<IconSource> {
        self.cache.get(identifier).map(|e| e.source)
    }

    /// Pixels for `icon`. `window_icon` is asked for the icon of one of
    /// the application's windows and is only called when that source is
    /// worth trying.
    pub fn resolve(
        &mut self,
        icon: &ApplicationIcon,
        window_icon: impl FnOnce(u32) -> Option<WindowImage>,
    ) -> Option<Arc<WindowImage>> {
        let size = self.size;
        if let Some(entry) = self.cache.get_mut(&icon.identifier) {
            let retry = entry.source == IconSource::Fallback && !entry.window_tried && icon.is_running();
            if retry {
                entry.window_tried = true;
                if let Some(image) = window_icon(size).and_then(|i| scale_image(&i, size)) {
                    entry.image = Arc::new(image);
                    entry.source = IconSource::Window;
                }
            }
            return Some(entry.image.clone());
        }

        let window_tried = icon.is_running();
        let (image, source) = self.lookup(icon, window_icon)?;
        let image = Arc::new(image);
        debug!(identifier = %icon.identifier, ?source, "icon resolved");
        self.cache.insert(
            icon.identifier.clone(),
            CacheEntry {
                image: image.clone(),
                source,
                window_tried,
            },
        );
        Some(image)
    }

    fn lookup(
        &self,
        icon: &ApplicationIcon,
        window_icon: impl FnOnce(u32) -> Option<WindowImage>,
    ) -> Option<(WindowImage, IconSource)> {
        let size = self.size;
        if icon.is_running() {
            if let Some(image) = window_icon(size).and_then(|i| scale_image(&i, size)) {
                return Some((image, IconSource::Window));
            }
        }
        if icon.icon_name.starts_with('/') {
            if let Some(image) = load_png(Path::new(&icon.icon_name), size) {
                return Some((image, IconSource::File));
            }
        }
        for name in theme_candidates(icon) {
            if let Some(image) = self.theme.load(&name, size) {
                return Some((image, IconSource::Theme));
            }
        }
        fallback_glyph(&icon.display_name, size, &self.fonts).map(|i| (i, IconSource::Fallback))
    }
}

/// Theme names to try for `icon`, deduplicated, without names containing
/// spaces.
pub fn theme_candidates(icon: &ApplicationIcon) -> Vec<String> {
    let first_segment = icon.identifier.split('-').next().unwrap_or_default();
    let raw = [
        icon.icon_name.as_str(),
        icon_name_for_identifier(&icon.identifier),
        first_segment,
        icon.identifier.as_str(),
    ];
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        if name.is_empty() || name.contains(' ') || name.starts_with('/') {
            continue;
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
