//! Routing X11 input to plugins and the popup.

use brujo_panel::HoverChange;
use brujo_platform::WindowSystem;
use brujo_plugins::DockServices;
use tracing::{debug, warn};

use super::core::DockApp;
use super::dock_menu;
use super::events::{AppEvent, BUTTON_LEFT, BUTTON_RIGHT};

impl DockApp {
    pub(super) fn handle_event(&mut self, event: AppEvent) {
        let dock = self.dock.window();
        let popup = self.popup.window();
        match event {
            AppEvent::Expose(w) if w == dock => self.needs_redraw = true,
            AppEvent::Expose(w) if w == popup => {
                if let Err(e) = self.popup.paint() {
                    warn!("cannot repaint popup: {e}");
                }
            }
            AppEvent::Press {
                window,
                button,
                x,
                y,
                ctrl,
            } if window == dock => self.dock_press(button, x, y, ctrl),
            AppEvent::Press { window, button, y, .. } if window == popup => self.popup_press(button, y),
            AppEvent::Motion { window, x, y } if window == dock => self.dock_motion(x, y),
            AppEvent::Motion { window, y, .. } if window == popup => self.popup.hover(y),
            AppEvent::Leave(w) if w == dock => self.dock_leave(),
            AppEvent::Leave(w) if w == popup => self.popup.pointer_left(),
            AppEvent::ClientsChanged => self.sync_windows(),
            AppEvent::Disconnected(reason) => {
                self.lost_connection = Some(reason);
                self.should_exit = true;
            }
            other => debug!(?other, "event for an unknown window"),
        }
    }

    fn dock_press(&mut self, button: u8, x: f64, y: f64, ctrl: bool) {
        self.popup.hide();
        if button == BUTTON_RIGHT && ctrl {
            self.show_dock_menu(x);
            return;
        }
        if button != BUTTON_LEFT && button != BUTTON_RIGHT {
            return;
        }
        let Some(target) = self.router.target(x, y) else {
            return;
        };
        let services = DockServices::new(&self.windows, &self.translator);
        let requests = if button == BUTTON_LEFT {
            self.host.click(&target.key, target.x, target.y, services)
        } else {
            self.host.right_click(&target.key, target.x, target.y, services)
        };
        self.dispatch_all(requests);
    }

    /// Leave the previously hovered component, then hover the one under
    /// the pointer.
    fn dock_motion(&mut self, x: f64, y: f64) {
        let services = DockServices::new(&self.windows, &self.translator);
        let mut requests = Vec::new();
        if let HoverChange::Moved { left: Some(left), .. } = self.router.pointer_moved(x, y) {
            requests.extend(self.host.leave(&left, services));
        }
        if let Some(target) = self.router.target(x, y) {
            requests.extend(self.host.hover(&target.key, target.x, target.y, services));
        }
        self.dispatch_all(requests);
    }

    fn dock_leave(&mut self) {
        if let HoverChange::Moved { left: Some(left), .. } = self.router.pointer_left() {
            let services = DockServices::new(&self.windows, &self.translator);
            let requests = self.host.leave(&left, services);
            self.dispatch_all(requests);
        }
    }

    fn popup_press(&mut self, button: u8, y: f64) {
        if button != BUTTON_LEFT {
            self.popup.hide();
            return;
        }
        let Some((owner, action)) = self.popup.choose(y) else {
            return;
        };
        if owner == dock_menu::OWNER && !self.host.contains(&owner) {
            self.dock_menu_action(&action);
            return;
        }
        let services = DockServices::new(&self.windows, &self.translator);
        let requests = self.host.menu_action(&owner, &action, services);
        self.dispatch_all(requests);
    }

    /// The client list or the active window changed on the root window.
    fn sync_windows(&mut self) {
        let events = match self.windows.sync() {
            Ok(events) => events,
            Err(e) => {
                warn!("window sync failed: {e}");
                return;
            }
        };
        for event in events {
            let services = DockServices::new(&self.windows, &self.translator);
            let requests = self.host.window_event(event, services);
            self.dispatch_all(requests);
        }
    }
}
