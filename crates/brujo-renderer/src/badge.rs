use brujo_common::Color;
use brujo_panel::badge_text;

use crate::canvas::{Canvas, TextStyle};

pub const BADGE_RADIUS: f32 = 6.0;
const BADGE_INSET: f32 = 4.0;
const BADGE_FILL: Color = Color::from_rgba(207, 3, 26, 255);
const BADGE_TEXT_SIZE: f32 = 8.0;

/// Window-count badge hanging inside the top-right corner of a box whose
/// right edge is `right` and top edge is `top`. Returns whether anything
/// was drawn.
pub fn paint_badge(canvas: &mut dyn Canvas, right: f32, top: f32, window_count: usize) -> bool {
    let Some(text) = badge_text(window_count) else {
        return false;
    };
    let cx = right - BADGE_RADIUS;
    let cy = top + BADGE_INSET + BADGE_RADIUS;
    canvas.fill_circle(cx, cy, BADGE_RADIUS, BADGE_FILL);

    let style = TextStyle::new(BADGE_TEXT_SIZE, Color::WHITE).bold();
    let extents = canvas.measure_text(&text, &style);
    canvas.draw_text(&text, cx - extents.width / 2.0, cy - extents.height / 2.0, &style);
    true
}
