use brujo_common::Color;
use brujo_platform::WindowImage;

use super::{Canvas, Fonts, TextExtents, TextStyle};

/// One call made on a [`RecordingCanvas`], in local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate { dx: f32, dy: f32 },
    Clip { x: f32, y: f32, width: f32, height: f32 },
    Rect { x: f32, y: f32, width: f32, height: f32, color: Color },
    RoundedRect { x: f32, y: f32, width: f32, height: f32, radius: f32, color: Color },
    Circle { cx: f32, cy: f32, radius: f32, color: Color },
    Text { text: String, x: f32, y: f32, style: TextStyle },
    Image { x: f32, y: f32, width: f32, height: f32 },
}

/// Canvas that records instead of rasterizing. Text is measured with the
/// no-font estimate so results do not depend on installed fonts.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn clip_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Clip { x, y, width, height });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.ops.push(DrawOp::Rect { x, y, width, height, color });
    }

    fn fill_rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32, color: Color) {
        let radius = crate::shapes::clamp_radius(radius, width, height);
        self.ops.push(DrawOp::RoundedRect { x, y, width, height, radius, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        self.ops.push(DrawOp::Circle { cx, cy, radius, color });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style: *style,
        });
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtents {
        Fonts::none().measure(text, style)
    }

    fn draw_image(&mut self, _image: &WindowImage, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Image { x, y, width, height });
    }
}
