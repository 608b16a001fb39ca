use ab_glyph::{point, Font, PxScale, ScaleFont};
use brujo_common::Color;
use brujo_platform::WindowImage;
use tiny_skia::{
    FillRule, FilterQuality, IntSize, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect,
    Transform,
};

use super::fonts::layout_line;
use super::{Canvas, Fonts, TextExtents, TextStyle};
use crate::shapes::rounded_rect_path;

/// Origin offset and device-space clip, saved and restored as a unit.
#[derive(Debug, Clone, Copy, Default)]
struct State {
    dx: f32,
    dy: f32,
    /// `[left, top, right, bottom]` in device pixels.
    clip: Option<[f32; 4]>,
}

/// Software canvas backed by a premultiplied RGBA [`Pixmap`].
pub struct PixmapCanvas {
    pixmap: Pixmap,
    fonts: Fonts,
    state: State,
    stack: Vec<State>,
}

impl PixmapCanvas {
    /// `None` if either dimension is zero.
    pub fn new(width: u32, height: u32, fonts: Fonts) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            fonts,
            state: State::default(),
            stack: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn fonts(&self) -> &Fonts {
        &self.fonts
    }

    /// Reset to fully transparent and drop any saved state.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.state = State::default();
        self.stack.clear();
    }

    /// Premultiplied BGRA, the byte order of a 32-bit ARGB X visual.
    pub fn to_bgra(&self) -> Vec<u8> {
        let mut out = self.pixmap.data().to_vec();
        for px in out.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        out
    }

    /// Straight RGBA copy of the surface.
    pub fn to_image(&self) -> Option<WindowImage> {
        let rgba = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        WindowImage::new(self.width(), self.height(), rgba)
    }

    fn transform(&self) -> Transform {
        Transform::from_translate(self.state.dx, self.state.dy)
    }

    fn paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;
        paint
    }

    /// Run `draw` with the current clip as a mask. Skipped entirely when
    /// the clip is empty.
    fn with_clip(&mut self, draw: impl FnOnce(&mut Pixmap, Transform, Option<&Mask>)) {
        let transform = self.transform();
        let Some([left, top, right, bottom]) = self.state.clip else {
            draw(&mut self.pixmap, transform, None);
            return;
        };
        let Some(rect) = Rect::from_ltrb(left, top, right, bottom) else {
            return;
        };
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        mask.fill_path(
            &PathBuilder::from_rect(rect),
            FillRule::Winding,
            false,
            Transform::identity(),
        );
        draw(&mut self.pixmap, transform, Some(&mask));
    }

    /// Device-space bounds text may touch.
    fn text_bounds(&self) -> [f32; 4] {
        let full = [0.0, 0.0, self.width() as f32, self.height() as f32];
        match self.state.clip {
            Some([l, t, r, b]) => [l.max(0.0), t.max(0.0), r.min(full[2]), b.min(full[3])],
            None => full,
        }
    }
}

impl Canvas for PixmapCanvas {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.dx += dx;
        self.state.dy += dy;
    }

    fn clip_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let left = x + self.state.dx;
        let top = y + self.state.dy;
        let new = [left, top, left + width.max(0.0), top + height.max(0.0)];
        self.state.clip = Some(match self.state.clip {
            Some([l, t, r, b]) => [
                l.max(new[0]),
                t.max(new[1]),
                r.min(new[2]).max(l.max(new[0])),
                b.min(new[3]).max(t.max(new[1])),
            ],
            None => new,
        });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let paint = Self::paint(color);
        self.with_clip(|pixmap, transform, mask| {
            pixmap.fill_rect(rect, &paint, transform, mask);
        });
    }

    fn fill_rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32, color: Color) {
        let Some(path) = rounded_rect_path(x, y, width, height, radius) else {
            return;
        };
        let paint = Self::paint(color);
        self.with_clip(|pixmap, transform, mask| {
            pixmap.fill_path(&path, &paint, FillRule::Winding, transform, mask);
        });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        let paint = Self::paint(color);
        self.with_clip(|pixmap, transform, mask| {
            pixmap.fill_path(&path, &paint, FillRule::Winding, transform, mask);
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        let Some(face) = self.fonts.face(style.bold) else {
            return;
        };
        let scaled = face.as_scaled(PxScale::from(style.size));
        let origin = point(x + self.state.dx, y + self.state.dy + scaled.ascent());
        let [left, top, right, bottom] = self.text_bounds();
        let width = self.pixmap.width() as usize;
        let color = style.color;
        let alpha = color.a as f32 / 255.0;
        let data = self.pixmap.data_mut();

        for glyph in layout_line(&scaled, origin, text) {
            let Some(outlined) = scaled.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x + gx as f32;
                let py = bounds.min.y + gy as f32;
                if px < left || px >= right || py < top || py >= bottom {
                    return;
                }
                let idx = (py as usize * width + px as usize) * 4;
                let sa = (coverage * alpha).clamp(0.0, 1.0);
                let inv = 1.0 - sa;
                let src = [color.r, color.g, color.b];
                for (channel, value) in src.iter().enumerate() {
                    let blended = *value as f32 * sa + data[idx + channel] as f32 * inv;
                    data[idx + channel] = blended.round().min(255.0) as u8;
                }
                let a = 255.0 * sa + data[idx + 3] as f32 * inv;
                data[idx + 3] = a.round().min(255.0) as u8;
            });
        }
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtents {
        self.fonts.measure(text, style)
    }

    fn draw_image(&mut self, image: &WindowImage, x: f32, y: f32, width: f32, height: f32) {
        let Some(source) = premultiplied(image) else {
            return;
        };
        let sx = width / image.width as f32;
        let sy = height / image.height as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.with_clip(|pixmap, transform, mask| {
            let placed = transform.pre_translate(x, y).pre_scale(sx, sy);
            pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, placed, mask);
        });
    }
}

fn premultiplied(image: &WindowImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width, image.height)?;
    let mut data = image.rgba.clone();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, size)
}
