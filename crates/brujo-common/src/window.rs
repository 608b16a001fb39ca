//! Handles to windows owned by the external window system.
//!
//! The dock never owns a window. It holds a [`WindowRef`], which pairs the
//! server-side id with the generation the monitor assigned when the window
//! was first seen, so a recycled id is never mistaken for the old window.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowRef {
    pub id: WindowId,
    pub generation: u32,
}

impl WindowRef {
    pub const fn new(id: WindowId, generation: u32) -> Self {
        Self { id, generation }
    }
}

impl fmt::Display for WindowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.id, self.generation)
    }
}

/// Window-manager type hint, reduced to what the dock filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindowKind {
    #[default]
    Normal,
    Desktop,
    Dock,
    Splash,
    Dialog,
    Utility,
    Menu,
    Toolbar,
}

impl WindowKind {
    /// Kinds that never belong on the dock, not even for counting.
    pub fn is_shell_surface(self) -> bool {
        matches!(self, Self::Desktop | Self::Dock | Self::Splash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn window_id_display_is_hex() {
        assert_eq!(WindowId(0x1a00003).to_string(), "0x1a00003");
    }

    #[test]
    fn window_ref_equality_includes_generation() {
        let a = WindowRef::new(WindowId(7), 1);
        let b = WindowRef::new(WindowId(7), 2);
        assert_ne!(a, b);
        assert_eq!(a, WindowRef::new(WindowId(7), 1));
    }

    #[test]
    fn window_ref_hash() {
        let mut set = HashSet::new();
        set.insert(WindowRef::new(WindowId(1), 1));
        set.insert(WindowRef::new(WindowId(1), 1));
        set.insert(WindowRef::new(WindowId(2), 1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn shell_surfaces() {
        assert!(WindowKind::Desktop.is_shell_surface());
        assert!(WindowKind::Dock.is_shell_surface());
        assert!(WindowKind::Splash.is_shell_surface());
        assert!(!WindowKind::Normal.is_shell_surface());
        assert!(!WindowKind::Dialog.is_shell_surface());
    }
}
