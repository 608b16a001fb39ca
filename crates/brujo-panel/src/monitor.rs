//! Turns window-system events into icon registry updates.
//!
//! Each window goes `Unseen -> Tracked -> Closed`. A tracked window holds
//! a [`WindowRef`] whose generation is unique for the monitor's lifetime,
//! so a recycled server id never resurrects a closed window's slot.
//! Metadata is read once, on open; any failure to read it means the
//! window is treated as already gone.

use std::collections::HashMap;

use brujo_common::{PlatformError, WindowId, WindowRef};
use brujo_platform::{ProcReader, WindowEvent, WindowInfo, WindowSystem};
use tracing::{debug, warn};

use crate::normalizer::identify;
use crate::registry::IconRegistry;

/// Registry change the dock must react to (relayout or redraw).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupChange {
    Changed {
        identifier: String,
        windows: Vec<WindowRef>,
    },
    Removed {
        identifier: String,
    },
    ActiveChanged,
}

#[derive(Debug, Clone)]
struct Tracked {
    window: WindowRef,
    /// `None` for dialogs and other secondary windows: counted, not grouped.
    identifier: Option<String>,
}

#[derive(Debug)]
pub struct WindowMonitor {
    own_pid: u32,
    proc: ProcReader,
    tracked: HashMap<WindowId, Tracked>,
    next_generation: u32,
}

impl WindowMonitor {
    pub fn new(own_pid: u32) -> Self {
        Self::with_proc(own_pid, ProcReader::default())
    }

    pub fn with_proc(own_pid: u32, proc: ProcReader) -> Self {
        Self {
            own_pid,
            proc,
            tracked: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Current handle for `id`, if the window is tracked.
    pub fn window_ref(&self, id: WindowId) -> Option<WindowRef> {
        self.tracked.get(&id).map(|t| t.window)
    }

    /// Application windows on screen, secondary ones included.
    pub fn visible_count(&self) -> usize {
        self.tracked.len()
    }

    /// Track every window that already exists, then the active one.
    pub fn scan(
        &mut self,
        windows: &dyn WindowSystem,
        registry: &mut IconRegistry,
    ) -> Vec<GroupChange> {
        let ids = match windows.list_windows() {
            Ok(ids) => ids,
            Err(e) => {
                warn!("cannot list windows: {e}");
                return Vec::new();
            }
        };
        let mut changes = Vec::new();
        for id in ids {
            changes.extend(self.handle(WindowEvent::Opened(id), windows, registry));
        }
        let active = windows.active_window().unwrap_or_else(|e| {
            debug!("active window unavailable: {e}");
            None
        });
        changes.extend(self.handle(WindowEvent::ActiveChanged(active), windows, registry));
        changes
    }

    pub fn handle(
        &mut self,
        event: WindowEvent,
        windows: &dyn WindowSystem,
        registry: &mut IconRegistry,
    ) -> Vec<GroupChange> {
        match event {
            WindowEvent::Opened(id) => self.opened(id, windows, registry),
            WindowEvent::Closed(id) => self.closed(id, registry),
            WindowEvent::ActiveChanged(id) => self.active_changed(id, registry),
        }
    }

    /// Drop a window an action found missing, before its close event.
    pub fn forget(&mut self, id: WindowId, registry: &mut IconRegistry) -> Vec<GroupChange> {
        self.closed(id, registry)
    }

    fn opened(
        &mut self,
        id: WindowId,
        windows: &dyn WindowSystem,
        registry: &mut IconRegistry,
    ) -> Vec<GroupChange> {
        if self.tracked.contains_key(&id) {
            return Vec::new();
        }
        let info = match windows.window_info(id) {
            Ok(info) => info,
            Err(PlatformError::WindowGone(_)) => {
                debug!(window = %id, "closed before it could be inspected");
                return Vec::new();
            }
            Err(e) => {
                warn!(window = %id, "ignoring window: {e}");
                return Vec::new();
            }
        };
        if !self.accepts(&info) {
            return Vec::new();
        }

        let window = WindowRef::new(id, self.next_generation);
        self.next_generation = self.next_generation.wrapping_add(1);

        if !info.is_primary() {
            self.tracked.insert(id, Tracked { window, identifier: None });
            return Vec::new();
        }

        let identifier = identify(&info, &self.proc);
        debug!(window = %window, %identifier, class = %info.class_name, "tracking");
        let icon = registry.resolve_or_create(&identifier, &info.title, window);
        let change = GroupChange::Changed {
            identifier: identifier.clone(),
            windows: icon.windows().to_vec(),
        };
        self.tracked.insert(
            id,
            Tracked {
                window,
                identifier: Some(identifier),
            },
        );
        vec![change]
    }

    fn accepts(&self, info: &WindowInfo) -> bool {
        if info.kind.is_shell_surface() {
            return false;
        }
        info.pid != Some(self.own_pid)
    }

    fn closed(&mut self, id: WindowId, registry: &mut IconRegistry) -> Vec<GroupChange> {
        let Some(tracked) = self.tracked.remove(&id) else {
            return Vec::new();
        };
        if tracked.identifier.is_none() {
            return Vec::new();
        }
        let Some(removal) = registry.remove_window(tracked.window) else {
            return Vec::new();
        };
        debug!(window = %tracked.window, identifier = %removal.identifier, "untracking");
        if removal.destroyed {
            return vec![GroupChange::Removed {
                identifier: removal.identifier,
            }];
        }
        let windows = registry
            .get(&removal.identifier)
            .map(|icon| icon.windows().to_vec())
            .unwrap_or_default();
        vec![GroupChange::Changed {
            identifier: removal.identifier,
            windows,
        }]
    }

    fn active_changed(
        &mut self,
        id: Option<WindowId>,
        registry: &mut IconRegistry,
    ) -> Vec<GroupChange> {
        let Some(id) = id else {
            registry.set_active(None);
            return vec![GroupChange::ActiveChanged];
        };
        match self.tracked.get(&id) {
            Some(Tracked {
                window,
                identifier: Some(_),
            }) => {
                registry.set_active(Some(*window));
                vec![GroupChange::ActiveChanged]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brujo_common::WindowKind;
    use brujo_platform::FakeWindowSystem;

    const OWN_PID: u32 = 4242;

    fn monitor() -> WindowMonitor {
        let proc = ProcReader::new(std::env::temp_dir().join("brujo-no-such-proc"));
        WindowMonitor::with_proc(OWN_PID, proc)
    }

    fn open(
        ws: &FakeWindowSystem,
        mon: &mut WindowMonitor,
        reg: &mut IconRegistry,
        id: u64,
        class: &str,
    ) -> Vec<GroupChange> {
        ws.open(id, class, &format!("{class} {id}"));
        mon.handle(WindowEvent::Opened(WindowId(id)), ws, reg)
    }

    #[test]
    fn opened_window_creates_group() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());

        let changes = open(&ws, &mut mon, &mut reg, 1, "Gedit");
        let window = mon.window_ref(WindowId(1)).unwrap();
        assert_eq!(
            changes,
            vec![GroupChange::Changed {
                identifier: "gedit".into(),
                windows: vec![window],
            }]
        );
        assert_eq!(reg.get("gedit").unwrap().display_name, "Gedit 1");
    }

    #[test]
    fn duplicate_open_event_is_ignored() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());
        open(&ws, &mut mon, &mut reg, 1, "Gedit");
        assert!(mon
            .handle(WindowEvent::Opened(WindowId(1)), &ws, &mut reg)
            .is_empty());
        assert_eq!(reg.get("gedit").unwrap().window_count(), 1);
    }

    #[test]
    fn shell_surfaces_and_own_windows_are_ignored() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());

        let mut desktop = ws.open(1, "Nemo-desktop", "Desktop");
        desktop.kind = WindowKind::Desktop;
        ws.insert(desktop);
        let mut own = ws.open(2, "brujo-dock", "dock");
        own.pid = Some(OWN_PID);
        ws.insert(own);

        for id in [1, 2] {
            assert!(mon.handle(WindowEvent::Opened(WindowId(id)), &ws, &mut reg).is_empty());
        }
        assert!(reg.is_empty());
        assert_eq!(mon.visible_count(), 0);
    }

    #[test]
    fn secondary_windows_count_but_do_not_group() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());
        open(&ws, &mut mon, &mut reg, 1, "Gimp");

        let mut dialog = ws.open(2, "Gimp", "Export Image");
        dialog.kind = WindowKind::Dialog;
        dialog.transient_for = Some(WindowId(1));
        ws.insert(dialog);

        assert!(mon.handle(WindowEvent::Opened(WindowId(2)), &ws, &mut reg).is_empty());
        assert_eq!(reg.get("gimp").unwrap().window_count(), 1);
        assert_eq!(mon.visible_count(), 2);

        assert!(mon.handle(WindowEvent::Closed(WindowId(2)), &ws, &mut reg).is_empty());
        assert_eq!(mon.visible_count(), 1);
    }

    #[test]
    fn closing_last_window_removes_group() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());
        open(&ws, &mut mon, &mut reg, 1, "Gedit");
        open(&ws, &mut mon, &mut reg, 2, "Gedit");

        ws.remove(1);
        let changes = mon.handle(WindowEvent::Closed(WindowId(1)), &ws, &mut reg);
        assert!(matches!(&changes[..], [GroupChange::Changed { windows, .. }] if windows.len() == 1));

        ws.remove(2);
        let changes = mon.handle(WindowEvent::Closed(WindowId(2)), &ws, &mut reg);
        assert_eq!(
            changes,
            vec![GroupChange::Removed {
                identifier: "gedit".into()
            }]
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn window_gone_during_query_is_absent() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());
        ws.open(1, "Gedit", "racy");
        ws.break_window(1);

        assert!(mon.handle(WindowEvent::Opened(WindowId(1)), &ws, &mut reg).is_empty());
        assert!(mon.window_ref(WindowId(1)).is_none());
        assert!(mon.handle(WindowEvent::Closed(WindowId(1)), &ws, &mut reg).is_empty());
    }

    #[test]
    fn recycled_id_gets_new_generation() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());
        open(&ws, &mut mon, &mut reg, 1, "Gedit");
        let first = mon.window_ref(WindowId(1)).unwrap();
        ws.remove(1);
        mon.handle(WindowEvent::Closed(WindowId(1)), &ws, &mut reg);

        open(&ws, &mut mon, &mut reg, 1, "Gedit");
        let second = mon.window_ref(WindowId(1)).unwrap();
        assert_ne!(first, second);
        assert_eq!(reg.get("gedit").unwrap().windows(), &[second]);
    }

    #[test]
    fn active_window_tracking() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());
        open(&ws, &mut mon, &mut reg, 1, "Gedit");
        open(&ws, &mut mon, &mut reg, 2, "XTerm");

        let changes = mon.handle(WindowEvent::ActiveChanged(Some(WindowId(2))), &ws, &mut reg);
        assert_eq!(changes, vec![GroupChange::ActiveChanged]);
        assert_eq!(reg.active().unwrap().identifier, "xterm");

        // Unknown windows leave the current state alone.
        assert!(mon
            .handle(WindowEvent::ActiveChanged(Some(WindowId(77))), &ws, &mut reg)
            .is_empty());
        assert_eq!(reg.active().unwrap().identifier, "xterm");

        mon.handle(WindowEvent::ActiveChanged(None), &ws, &mut reg);
        assert!(reg.active().is_none());
    }

    #[test]
    fn active_secondary_window_is_a_noop() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());
        open(&ws, &mut mon, &mut reg, 1, "Gimp");
        mon.handle(WindowEvent::ActiveChanged(Some(WindowId(1))), &ws, &mut reg);

        let mut dialog = ws.open(2, "Gimp", "Export");
        dialog.kind = WindowKind::Utility;
        ws.insert(dialog);
        mon.handle(WindowEvent::Opened(WindowId(2)), &ws, &mut reg);

        assert!(mon
            .handle(WindowEvent::ActiveChanged(Some(WindowId(2))), &ws, &mut reg)
            .is_empty());
        assert_eq!(reg.active().unwrap().identifier, "gimp");
    }

    #[test]
    fn scan_picks_up_existing_windows() {
        let ws = FakeWindowSystem::new();
        ws.open(1, "Gedit", "a");
        ws.open(2, "XTerm", "b");
        ws.set_active(Some(2));
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());

        let changes = mon.scan(&ws, &mut reg);
        assert_eq!(changes.len(), 3);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.active().unwrap().identifier, "xterm");
    }

    #[test]
    fn forget_behaves_like_close() {
        let ws = FakeWindowSystem::new();
        let (mut mon, mut reg) = (monitor(), IconRegistry::new());
        open(&ws, &mut mon, &mut reg, 1, "Gedit");
        let changes = mon.forget(WindowId(1), &mut reg);
        assert_eq!(changes.len(), 1);
        assert!(reg.is_empty());
    }
}
