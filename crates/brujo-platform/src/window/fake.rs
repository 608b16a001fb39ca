//! Scriptable in-memory window system for tests.

use std::cell::RefCell;

use brujo_common::{PlatformError, WindowId, WindowKind};

use super::{
    diff_client_lists, Result, WindowEvent, WindowIcon, WindowImage, WindowInfo, WindowSystem,
};

/// A request the dock made, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeCall {
    Activate(WindowId),
    Minimize(WindowId),
    Close(WindowId),
}

#[derive(Debug, Default)]
struct FakeState {
    windows: Vec<WindowInfo>,
    active: Option<WindowId>,
    minimized: Vec<WindowId>,
    calls: Vec<FakeCall>,
    broken: Vec<WindowId>,
    icons: Vec<(WindowId, WindowIcon)>,
}

/// Windows are added and removed by the test; [`WindowSystem::sync`]
/// then reports the difference since the previous sync, like the X11
/// backend does.
#[derive(Debug, Default)]
pub struct FakeWindowSystem {
    state: RefCell<FakeState>,
    seen: Vec<WindowId>,
    seen_active: Option<WindowId>,
}

impl FakeWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a normal window and return its info for further tweaking.
    pub fn open(&self, id: u64, class: &str, title: &str) -> WindowInfo {
        let info = WindowInfo {
            id: WindowId(id),
            pid: Some(1000 + id as u32),
            title: title.into(),
            class_instance: class.to_lowercase(),
            class_name: class.into(),
            kind: WindowKind::Normal,
            transient_for: None,
        };
        self.insert(info.clone());
        info
    }

    pub fn insert(&self, info: WindowInfo) {
        let mut state = self.state.borrow_mut();
        state.windows.retain(|w| w.id != info.id);
        state.windows.push(info);
    }

    pub fn remove(&self, id: u64) {
        let mut state = self.state.borrow_mut();
        state.windows.retain(|w| w.id != WindowId(id));
        if state.active == Some(WindowId(id)) {
            state.active = None;
        }
    }

    pub fn set_active(&self, id: Option<u64>) {
        self.state.borrow_mut().active = id.map(WindowId);
    }

    pub fn set_title(&self, id: u64, title: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(w) = state.windows.iter_mut().find(|w| w.id == WindowId(id)) {
            w.title = title.into();
        }
    }

    pub fn set_icon(&self, id: u64, icon: WindowIcon) {
        self.state.borrow_mut().icons.push((WindowId(id), icon));
    }

    /// Make metadata queries for `id` fail as if it vanished mid-query,
    /// while it is still listed.
    pub fn break_window(&self, id: u64) {
        self.state.borrow_mut().broken.push(WindowId(id));
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.state.borrow().calls.clone()
    }

    pub fn is_minimized(&self, id: u64) -> bool {
        self.state.borrow().minimized.contains(&WindowId(id))
    }

    fn check(&self, id: WindowId) -> Result<()> {
        let state = self.state.borrow();
        if state.broken.contains(&id) || !state.windows.iter().any(|w| w.id == id) {
            return Err(PlatformError::WindowGone(id.0));
        }
        Ok(())
    }
}

impl WindowSystem for FakeWindowSystem {
    fn list_windows(&self) -> Result<Vec<WindowId>> {
        Ok(self.state.borrow().windows.iter().map(|w| w.id).collect())
    }

    fn window_info(&self, id: WindowId) -> Result<WindowInfo> {
        self.check(id)?;
        let state = self.state.borrow();
        state
            .windows
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(PlatformError::WindowGone(id.0))
    }

    fn active_window(&self) -> Result<Option<WindowId>> {
        Ok(self.state.borrow().active)
    }

    fn activate(&self, id: WindowId) -> Result<()> {
        self.check(id)?;
        let mut state = self.state.borrow_mut();
        state.calls.push(FakeCall::Activate(id));
        state.minimized.retain(|w| *w != id);
        state.active = Some(id);
        Ok(())
    }

    fn minimize(&self, id: WindowId) -> Result<()> {
        self.check(id)?;
        let mut state = self.state.borrow_mut();
        state.calls.push(FakeCall::Minimize(id));
        state.minimized.push(id);
        if state.active == Some(id) {
            state.active = None;
        }
        Ok(())
    }

    fn close(&self, id: WindowId) -> Result<()> {
        self.check(id)?;
        self.state.borrow_mut().calls.push(FakeCall::Close(id));
        Ok(())
    }

    fn window_icon(&self, id: WindowId, _size: u32) -> Result<Option<WindowIcon>> {
        self.check(id)?;
        let state = self.state.borrow();
        Ok(state
            .icons
            .iter()
            .find(|(w, _)| *w == id)
            .map(|(_, icon)| icon.clone()))
    }

    fn capture_thumbnail(&self, id: WindowId) -> Result<Option<WindowImage>> {
        self.check(id)?;
        if self.is_minimized(id.0) {
            return Ok(None);
        }
        Ok(WindowImage::new(4, 3, vec![0x80; 4 * 3 * 4]))
    }

    fn sync(&mut self) -> Result<Vec<WindowEvent>> {
        let current = self.list_windows()?;
        let active = self.active_window()?;
        let mut events = diff_client_lists(&self.seen, &current);
        if active != self.seen_active {
            events.push(WindowEvent::ActiveChanged(active));
        }
        self.seen = current;
        self.seen_active = active;
        Ok(events)
    }
}
