//! No-op window system.
//!
//! Used when no display is reachable: the dock still runs its plugins,
//! it just never sees any client windows.

use brujo_common::{PlatformError, WindowId};

use super::{Result, WindowEvent, WindowIcon, WindowImage, WindowInfo, WindowSystem};

/// All queries return empty results and all mutations succeed silently,
/// except per-window queries, which report the window as gone.
#[derive(Debug, Default)]
pub struct NoopWindowSystem;

impl WindowSystem for NoopWindowSystem {
    fn list_windows(&self) -> Result<Vec<WindowId>> {
        Ok(Vec::new())
    }

    fn window_info(&self, id: WindowId) -> Result<WindowInfo> {
        Err(PlatformError::WindowGone(id.0))
    }

    fn active_window(&self) -> Result<Option<WindowId>> {
        Ok(None)
    }

    fn activate(&self, _id: WindowId) -> Result<()> {
        Ok(())
    }

    fn minimize(&self, _id: WindowId) -> Result<()> {
        Ok(())
    }

    fn close(&self, _id: WindowId) -> Result<()> {
        Ok(())
    }

    fn window_icon(&self, _id: WindowId, _size: u32) -> Result<Option<WindowIcon>> {
        Ok(None)
    }

    fn capture_thumbnail(&self, _id: WindowId) -> Result<Option<WindowImage>> {
        Ok(None)
    }

    fn sync(&mut self) -> Result<Vec<WindowEvent>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_empty() {
        let ws = NoopWindowSystem;
        assert!(ws.list_windows().unwrap().is_empty());
        assert_eq!(ws.active_window().unwrap(), None);
    }

    #[test]
    fn info_reports_gone() {
        let ws = NoopWindowSystem;
        assert!(matches!(
            ws.window_info(WindowId(9)),
            Err(PlatformError::WindowGone(9))
        ));
    }

    #[test]
    fn mutations_succeed() {
        let mut ws = NoopWindowSystem;
        assert!(ws.activate(WindowId(1)).is_ok());
        assert!(ws.minimize(WindowId(1)).is_ok());
        assert!(ws.close(WindowId(1)).is_ok());
        assert!(ws.sync().unwrap().is_empty());
    }
}
