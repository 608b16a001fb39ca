use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ab_glyph::{point, Font, FontVec, Glyph, Point, PxScale, ScaleFont};
use tracing::{debug, warn};

use super::{TextExtents, TextStyle};

const REGULAR_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];

const BOLD_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
];

/// Average advance, in ems, assumed when no font could be loaded.
const FALLBACK_ADVANCE: f32 = 0.5;

/// Regular and bold faces. Either may be missing; bold falls back to
/// regular, and with no face at all text is measured by estimate and not
/// drawn.
#[derive(Clone, Default)]
pub struct Fonts {
    regular: Option<Arc<FontVec>>,
    bold: Option<Arc<FontVec>>,
}

impl fmt::Debug for Fonts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fonts")
            .field("regular", &self.regular.is_some())
            .field("bold", &self.bold.is_some())
            .finish()
    }
}

impl Fonts {
    /// No faces; text is invisible.
    pub fn none() -> Self {
        Self::default()
    }

    /// First installed face from a list of common locations.
    pub fn load_system() -> Self {
        let regular = REGULAR_FONTS.iter().find_map(|p| load_face(Path::new(p)));
        if regular.is_none() {
            warn!("no usable system font found, text will not be drawn");
        }
        let bold = BOLD_FONTS.iter().find_map(|p| load_face(Path::new(p)));
        Self { regular, bold }
    }

    pub fn from_paths(regular: &Path, bold: Option<&Path>) -> Self {
        Self {
            regular: load_face(regular),
            bold: bold.and_then(load_face),
        }
    }

    pub fn is_available(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    pub(crate) fn face(&self, bold: bool) -> Option<&FontVec> {
        let preferred = if bold { &self.bold } else { &self.regular };
        preferred
            .as_ref()
            .or(self.regular.as_ref())
            .or(self.bold.as_ref())
            .map(|f| f.as_ref())
    }

    pub fn measure(&self, text: &str, style: &TextStyle) -> TextExtents {
        let Some(face) = self.face(style.bold) else {
            return TextExtents {
                width: (text.chars().count() as f32 * style.size * FALLBACK_ADVANCE).ceil(),
                height: style.size,
            };
        };
        let scaled = face.as_scaled(PxScale::from(style.size));
        let glyphs = layout_line(&scaled, point(0.0, 0.0), text);
        let width = glyphs
            .last()
            .map(|g| g.position.x + scaled.h_advance(g.id))
            .unwrap_or(0.0);
        TextExtents {
            width: width.ceil(),
            height: (scaled.ascent() - scaled.descent()).ceil(),
        }
    }
}

fn load_face(path: &Path) -> Option<Arc<FontVec>> {
    let data = std::fs::read(path).ok()?;
    match FontVec::try_from_vec(data) {
        Ok(font) => {
            debug!("loaded font {}", path.display());
            Some(Arc::new(font))
        }
        Err(e) => {
            warn!("invalid font {}: {e}", path.display());
            None
        }
    }
}

/// Position glyphs along one baseline starting at `origin`. Control
/// characters are skipped.
pub(crate) fn layout_line<F, SF>(font: &SF, origin: Point, text: &str) -> Vec<Glyph>
where
    F: Font,
    SF: ScaleFont<F>,
{
    let mut caret = origin;
    let mut last = None;
    let mut glyphs = Vec::with_capacity(text.len());
    for c in text.chars().filter(|c| !c.is_control()) {
        let mut glyph = font.scaled_glyph(c);
        if let Some(previous) = last {
            caret.x += font.kern(previous, glyph.id);
        }
        glyph.position = point(caret.x.round(), caret.y);
        last = Some(glyph.id);
        caret.x += font.h_advance(glyph.id);
        glyphs.push(glyph);
    }
    glyphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use brujo_common::Color;

    #[test]
    fn estimate_without_font() {
        let fonts = Fonts::none();
        assert!(!fonts.is_available());
        let extents = fonts.measure("abcd", &TextStyle::new(10.0, Color::WHITE));
        assert_eq!(extents.width, 20.0);
        assert_eq!(extents.height, 10.0);
    }

    #[test]
    fn empty_text_has_no_width() {
        let extents = Fonts::none().measure("", &TextStyle::default());
        assert_eq!(extents.width, 0.0);
    }

    #[test]
    fn missing_font_file_is_none() {
        let fonts = Fonts::from_paths(Path::new("/nonexistent/font.ttf"), None);
        assert!(!fonts.is_available());
    }

    #[test]
    fn garbage_font_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(!Fonts::from_paths(&path, None).is_available());
    }
}
