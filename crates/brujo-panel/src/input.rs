//! Pointer hit-testing against the last computed layout.

use crate::layout::{DockGeometry, Slot};

/// A component under the pointer, with the pointer in its local space.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerTarget<K> {
    pub key: K,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverChange<K> {
    /// Still over the same component, or still over nothing.
    Unchanged,
    Moved {
        left: Option<K>,
        entered: Option<K>,
    },
}

/// Remembers which single component is hovered.
#[derive(Debug, Clone)]
pub struct HoverTracker<K> {
    current: Option<K>,
}

impl<K> Default for HoverTracker<K> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<K: Clone + PartialEq> HoverTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }

    pub fn update(&mut self, hit: Option<K>) -> HoverChange<K> {
        if hit == self.current {
            return HoverChange::Unchanged;
        }
        let left = std::mem::replace(&mut self.current, hit.clone());
        HoverChange::Moved { left, entered: hit }
    }

    pub fn clear(&mut self) -> HoverChange<K> {
        self.update(None)
    }
}

/// Routes pointer events to the component under them.
#[derive(Debug, Clone)]
pub struct InputRouter<K> {
    layout: DockGeometry<K>,
    hover: HoverTracker<K>,
}

impl<K> Default for InputRouter<K> {
    fn default() -> Self {
        Self {
            layout: DockGeometry::default(),
            hover: HoverTracker::default(),
        }
    }
}

impl<K: Clone + PartialEq> InputRouter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the layout. A hovered component that no longer exists is
    /// forgotten without a leave transition.
    pub fn set_layout(&mut self, layout: DockGeometry<K>) {
        let stale = self
            .hover
            .current()
            .is_some_and(|current| layout.slot(current).is_none());
        if stale {
            self.hover = HoverTracker::new();
        }
        self.layout = layout;
    }

    pub fn layout(&self) -> &DockGeometry<K> {
        &self.layout
    }

    /// First slot containing the point.
    pub fn locate(&self, x: f64, y: f64) -> Option<&Slot<K>> {
        self.layout.slots.iter().find(|s| s.rect.contains(x, y))
    }

    pub fn target(&self, x: f64, y: f64) -> Option<PointerTarget<K>> {
        self.locate(x, y).map(|slot| PointerTarget {
            key: slot.key.clone(),
            x: x - slot.rect.x as f64,
            y: y - slot.rect.y as f64,
        })
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) -> HoverChange<K> {
        let hit = self.locate(x, y).map(|s| s.key.clone());
        self.hover.update(hit)
    }

    pub fn pointer_left(&mut self) -> HoverChange<K> {
        self.hover.clear()
    }

    pub fn hovered(&self) -> Option<&K> {
        self.hover.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use brujo_common::Size;

    fn router() -> InputRouter<&'static str> {
        let engine = LayoutEngine {
            padding_x: 10,
            padding_y: 0,
            spacing: 4,
            min_height: 20,
        };
        let mut router = InputRouter::new();
        router.set_layout(engine.compute(&[("a", Size::new(20, 20)), ("b", Size::new(30, 20))]));
        router
    }

    #[test]
    fn point_inside_dispatches_to_owner_only() {
        let router = router();
        assert_eq!(router.locate(15.0, 10.0).unwrap().key, "a");
        assert_eq!(router.locate(40.0, 10.0).unwrap().key, "b");
    }

    #[test]
    fn point_outside_dispatches_to_none() {
        let router = router();
        assert!(router.locate(5.0, 10.0).is_none());
        assert!(router.locate(32.0, 10.0).is_none());
        assert!(router.locate(200.0, 10.0).is_none());
    }

    #[test]
    fn target_is_local() {
        let target = router().target(40.0, 7.0).unwrap();
        assert_eq!(target, PointerTarget { key: "b", x: 6.0, y: 7.0 });
    }

    #[test]
    fn hover_transitions() {
        let mut router = router();
        assert_eq!(
            router.pointer_moved(15.0, 5.0),
            HoverChange::Moved { left: None, entered: Some("a") }
        );
        assert_eq!(router.pointer_moved(16.0, 5.0), HoverChange::Unchanged);
        assert_eq!(
            router.pointer_moved(40.0, 5.0),
            HoverChange::Moved { left: Some("a"), entered: Some("b") }
        );
        assert_eq!(
            router.pointer_left(),
            HoverChange::Moved { left: Some("b"), entered: None }
        );
        assert_eq!(router.pointer_left(), HoverChange::Unchanged);
    }

    #[test]
    fn relayout_drops_vanished_hover() {
        let mut router = router();
        router.pointer_moved(40.0, 5.0);
        router.set_layout(LayoutEngine::default().compute(&[("a", Size::new(20, 20))]));
        assert!(router.hovered().is_none());
    }
}
