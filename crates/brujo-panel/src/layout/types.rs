//! Layout engine types and configuration.

use brujo_common::Rect;

/// Spacing rules for a horizontal row of components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEngine {
    /// Space left and right of the row.
    pub padding_x: i32,
    /// Space above and below the tallest component.
    pub padding_y: i32,
    /// Gap between neighbouring components.
    pub spacing: i32,
    /// Total height of an empty row.
    pub min_height: i32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            padding_x: 16,
            padding_y: 4,
            spacing: 4,
            min_height: 32,
        }
    }
}

/// One laid-out component. `rect` is relative to the row's top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot<K> {
    pub key: K,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockGeometry<K> {
    pub width: i32,
    pub height: i32,
    pub slots: Vec<Slot<K>>,
}

impl<K> Default for DockGeometry<K> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            slots: Vec::new(),
        }
    }
}

impl<K: PartialEq> DockGeometry<K> {
    pub fn slot(&self, key: &K) -> Option<&Slot<K>> {
        self.slots.iter().find(|s| s.key == *key)
    }
}
