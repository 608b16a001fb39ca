use brujo_common::Color;
use brujo_platform::WindowImage;

use crate::canvas::{Canvas, Fonts, PixmapCanvas, TextStyle};

const PALETTE: &[Color] = &[
    Color::from_rgba(0x3b, 0x82, 0xf6, 255),
    Color::from_rgba(0x10, 0xb9, 0x81, 255),
    Color::from_rgba(0xf5, 0x9e, 0x0b, 255),
    Color::from_rgba(0xef, 0x44, 0x44, 255),
    Color::from_rgba(0x8b, 0x5c, 0xf6, 255),
    Color::from_rgba(0x06, 0xb6, 0xd4, 255),
];

/// Circle color for `name`, stable across runs.
pub fn glyph_color(name: &str) -> Color {
    let sum = name.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    PALETTE[sum % PALETTE.len()]
}

/// First letter of `name`, uppercased, or `?` for empty names.
pub fn glyph_letter(name: &str) -> String {
    name.chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

/// Colored disc with the name's initial, used when no icon exists.
pub fn fallback_glyph(name: &str, size: u32, fonts: &Fonts) -> Option<WindowImage> {
    let mut canvas = PixmapCanvas::new(size, size, fonts.clone())?;
    let half = size as f32 / 2.0;
    canvas.fill_circle(half, half, half - 1.0, glyph_color(name));

    let letter = glyph_letter(name);
    let style = TextStyle::new(size as f32 * 0.55, Color::WHITE).bold();
    let extents = canvas.measure_text(&letter, &style);
    canvas.draw_text(&letter, half - extents.width / 2.0, half - extents.height / 2.0, &style);
    canvas.to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_is_uppercased_initial() {
        assert_eq!(glyph_letter("gedit"), "G");
        assert_eq!(glyph_letter("  écrire"), "É");
        assert_eq!(glyph_letter(""), "?");
    }

    #[test]
    fn color_is_stable() {
        assert_eq!(glyph_color("gedit"), glyph_color("gedit"));
    }

    #[test]
    fn glyph_is_a_filled_disc() {
        let image = fallback_glyph("gedit", 32, &Fonts::none()).unwrap();
        assert_eq!((image.width, image.height), (32, 32));
        let center = (16 * 32 + 16) * 4;
        assert_eq!(image.rgba[center + 3], 255);
        assert_eq!(image.rgba[3], 0);
    }
}
