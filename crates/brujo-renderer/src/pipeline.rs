//! One dock frame: background, then every laid-out component in its own
//! clipped and translated space.

use std::fmt;

use brujo_common::{Color, PluginError};
use brujo_panel::{DockGeometry, Slot};
use tracing::warn;

use crate::canvas::Canvas;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockStyle {
    pub corner_radius: f32,
    pub background: Color,
}

impl Default for DockStyle {
    fn default() -> Self {
        Self {
            corner_radius: 12.0,
            background: Color::from_rgba(0, 0, 0, 170),
        }
    }
}

/// Paint a frame. `draw` paints one component with the origin at the
/// component's top-left and a clip to its bounds. A failing component is
/// logged and skipped; the rest of the frame is still painted. Returns
/// the number of components that failed.
pub fn paint_dock<K, F>(
    canvas: &mut dyn Canvas,
    style: &DockStyle,
    geometry: &DockGeometry<K>,
    mut draw: F,
) -> usize
where
    K: fmt::Debug,
    F: FnMut(&mut dyn Canvas, &Slot<K>) -> Result<(), PluginError>,
{
    canvas.fill_rounded_rect(
        0.0,
        0.0,
        geometry.width as f32,
        geometry.height as f32,
        style.corner_radius,
        style.background,
    );

    let mut failures = 0;
    for slot in &geometry.slots {
        let rect = slot.rect;
        canvas.save();
        canvas.translate(rect.x as f32, rect.y as f32);
        canvas.clip_rect(0.0, 0.0, rect.width as f32, rect.height as f32);
        if let Err(e) = draw(&mut *canvas, slot) {
            warn!(component = ?slot.key, "draw failed: {e}");
            failures += 1;
        }
        canvas.restore();
    }
    failures
}
