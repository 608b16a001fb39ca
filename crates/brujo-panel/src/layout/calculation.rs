//! Row layout: left to right, vertically centered.

use brujo_common::{Rect, Size};

use super::{DockGeometry, LayoutEngine, Slot};

impl LayoutEngine {
    /// Lay out `components` in order. Linear in the component count and
    /// free of state, so equal inputs give equal geometry.
    pub fn compute<K: Clone>(&self, components: &[(K, Size)]) -> DockGeometry<K> {
        let content_width: i32 = components.iter().map(|(_, s)| s.width.max(0)).sum();
        let gaps = self.spacing * (components.len() as i32 - 1).max(0);
        let width = self.padding_x * 2 + content_width + gaps;

        let tallest = components.iter().map(|(_, s)| s.height.max(0)).max();
        let height = match tallest {
            Some(h) => h + self.padding_y * 2,
            None => self.min_height,
        };

        let mut slots = Vec::with_capacity(components.len());
        let mut x = self.padding_x;
        for (key, size) in components {
            let (w, h) = (size.width.max(0), size.height.max(0));
            slots.push(Slot {
                key: key.clone(),
                rect: Rect::new(x, (height - h) / 2, w, h),
            });
            x += w + self.spacing;
        }

        DockGeometry {
            width,
            height,
            slots,
        }
    }
}
