//! Access to the external window system.
//!
//! The dock never owns client windows. It sees them through the
//! [`WindowSystem`] trait by id, and every query may fail with
//! [`PlatformError::WindowGone`] because the window can disappear between
//! an event and the next request.

use brujo_common::{PlatformError, WindowId, WindowKind};

pub mod noop;
pub mod x11;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

pub use noop::NoopWindowSystem;
pub use x11::X11WindowSystem;

#[cfg(any(test, feature = "testing"))]
pub use fake::{FakeCall, FakeWindowSystem};

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Metadata of one client window, read fresh from the window system.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowInfo {
    pub id: WindowId,
    pub pid: Option<u32>,
    pub title: String,
    /// First half of `WM_CLASS`.
    pub class_instance: String,
    /// Second half of `WM_CLASS`.
    pub class_name: String,
    pub kind: WindowKind,
    pub transient_for: Option<WindowId>,
}

impl WindowInfo {
    /// A normal, non-transient top-level window.
    pub fn is_primary(&self) -> bool {
        self.kind == WindowKind::Normal && self.transient_for.is_none()
    }
}

/// Straight (non-premultiplied) RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl WindowImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        (width > 0 && height > 0 && rgba.len() == (width * height * 4) as usize).then_some(Self {
            width,
            height,
            rgba,
        })
    }
}

pub type WindowIcon = WindowImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Opened(WindowId),
    Closed(WindowId),
    ActiveChanged(Option<WindowId>),
}

/// Platform-agnostic access to client windows.
///
/// Requests take `&self`; only [`WindowSystem::sync`], which advances
/// the backend's view of the world, needs `&mut self`.
pub trait WindowSystem {
    /// Managed client windows, oldest first.
    fn list_windows(&self) -> Result<Vec<WindowId>>;
    fn window_info(&self, id: WindowId) -> Result<WindowInfo>;
    fn active_window(&self) -> Result<Option<WindowId>>;
    fn activate(&self, id: WindowId) -> Result<()>;
    fn minimize(&self, id: WindowId) -> Result<()>;
    fn close(&self, id: WindowId) -> Result<()>;
    /// The window's own icon, closest to `size` pixels wide.
    fn window_icon(&self, id: WindowId, size: u32) -> Result<Option<WindowIcon>>;
    /// Current contents of the window; `None` when it is not viewable.
    fn capture_thumbnail(&self, id: WindowId) -> Result<Option<WindowImage>>;
    /// Diff the client list and active window against the previous call.
    fn sync(&mut self) -> Result<Vec<WindowEvent>>;
}

/// Diff two client lists into open/close events, closes first.
pub(crate) fn diff_client_lists(old: &[WindowId], new: &[WindowId]) -> Vec<WindowEvent> {
    let closed = old
        .iter()
        .filter(|id| !new.contains(id))
        .map(|id| WindowEvent::Closed(*id));
    let opened = new
        .iter()
        .filter(|id| !old.contains(id))
        .map(|id| WindowEvent::Opened(*id));
    closed.chain(opened).collect()
}

/// Events for one sync: the client-list diff, then `ActiveChanged` when
/// focus moved or when the active window is one of the windows just opened.
pub(crate) fn sync_events(
    old: &[WindowId],
    new: &[WindowId],
    old_active: Option<WindowId>,
    active: Option<WindowId>,
) -> Vec<WindowEvent> {
    let mut events = diff_client_lists(old, new);
    let opened_active = active.is_some_and(|id| events.contains(&WindowEvent::Opened(id)));
    if active != old_active || opened_active {
        events.push(WindowEvent::ActiveChanged(active));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_window_rules() {
        let mut info = WindowInfo::default();
        assert!(info.is_primary());
        info.transient_for = Some(WindowId(3));
        assert!(!info.is_primary());
        info.transient_for = None;
        info.kind = WindowKind::Dialog;
        assert!(!info.is_primary());
    }

    #[test]
    fn window_image_checks_length() {
        assert!(WindowImage::new(2, 2, vec![0; 16]).is_some());
        assert!(WindowImage::new(2, 2, vec![0; 15]).is_none());
        assert!(WindowImage::new(0, 2, vec![]).is_none());
    }

    #[test]
    fn diff_reports_closes_then_opens() {
        let old = [WindowId(1), WindowId(2), WindowId(3)];
        let new = [WindowId(2), WindowId(4), WindowId(3)];
        assert_eq!(
            diff_client_lists(&old, &new),
            vec![WindowEvent::Closed(WindowId(1)), WindowEvent::Opened(WindowId(4))]
        );
    }

    #[test]
    fn diff_of_equal_lists_is_empty() {
        let ids = [WindowId(5)];
        assert!(diff_client_lists(&ids, &ids).is_empty());
    }

    #[test]
    fn focus_move_follows_the_diff() {
        let ids = [WindowId(1), WindowId(2)];
        assert_eq!(
            sync_events(&ids, &ids, Some(WindowId(1)), Some(WindowId(2))),
            vec![WindowEvent::ActiveChanged(Some(WindowId(2)))]
        );
        assert!(sync_events(&ids, &ids, Some(WindowId(2)), Some(WindowId(2))).is_empty());
    }

    #[test]
    fn opened_active_window_is_announced_again() {
        // The id was already active before it reached the client list.
        let old = [WindowId(1)];
        let new = [WindowId(1), WindowId(7)];
        assert_eq!(
            sync_events(&old, &new, Some(WindowId(7)), Some(WindowId(7))),
            vec![
                WindowEvent::Opened(WindowId(7)),
                WindowEvent::ActiveChanged(Some(WindowId(7))),
            ]
        );
    }

    #[test]
    fn opening_a_background_window_keeps_focus_quiet() {
        let old = [WindowId(1)];
        let new = [WindowId(1), WindowId(8)];
        assert_eq!(
            sync_events(&old, &new, Some(WindowId(1)), Some(WindowId(1))),
            vec![WindowEvent::Opened(WindowId(8))]
        );
    }
}
