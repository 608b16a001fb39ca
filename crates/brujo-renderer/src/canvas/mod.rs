//! Drawing surface handed to components.
//!
//! Components only see the [`Canvas`] trait. The dock paints into a
//! [`PixmapCanvas`]; tests paint into a [`RecordingCanvas`] and assert on
//! the recorded operations.

mod fonts;
mod pixmap;
mod recording;

pub use fonts::Fonts;
pub use pixmap::PixmapCanvas;
pub use recording::{DrawOp, RecordingCanvas};

use brujo_common::Color;
use brujo_platform::WindowImage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Pixel size of the em square.
    pub size: f32,
    pub color: Color,
    pub bold: bool,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0, Color::WHITE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub width: f32,
    /// Ascent plus descent.
    pub height: f32,
}

/// 2D drawing operations in the current coordinate space.
///
/// `save`/`restore` bracket changes to the origin and the clip region.
/// Clips only ever shrink until the matching `restore`.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn clip_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    /// `radius` is clamped to half the shorter side.
    fn fill_rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32, color: Color);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color);

    /// Draw one line of text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtents;

    /// Draw `image` scaled into the given box.
    fn draw_image(&mut self, image: &WindowImage, x: f32, y: f32, width: f32, height: f32);
}
