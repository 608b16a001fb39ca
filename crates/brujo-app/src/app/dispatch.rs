//! Carrying out what plugins and the dock menu ask for.

use std::path::Path;
use std::time::Instant;

use brujo_config::load_settings;
use brujo_platform::{launch_command, open_path};
use brujo_plugins::{DockRequest, DockServices};
use brujo_renderer::Popup;
use tracing::{debug, info, warn};

use super::core::DockApp;
use super::dock_menu::{self, DockMenuAction};

fn open_or_warn(path: &Path) {
    if let Err(e) = open_path(path) {
        warn!(path = %path.display(), "cannot open file: {e}");
    }
}

impl DockApp {
    pub(super) fn dispatch_all(&mut self, requests: Vec<DockRequest>) {
        for request in requests {
            self.dispatch(request);
        }
    }

    pub(super) fn dispatch(&mut self, request: DockRequest) {
        match request {
            DockRequest::Relayout => self.needs_relayout = true,
            DockRequest::Redraw => self.needs_redraw = true,
            DockRequest::ShowMenu {
                owner,
                entries,
                anchor_x,
            } => self.show_popup(owner, Popup::Menu(entries), anchor_x),
            DockRequest::ShowPopup {
                owner,
                popup,
                anchor_x,
            } => self.show_popup(owner, popup, anchor_x),
            // An open menu only closes on a choice or when the pointer leaves it.
            DockRequest::HidePopup => {
                if !self.popup.is_menu() {
                    self.popup.hide();
                }
            }
            DockRequest::Launch(command) => {
                if let Err(e) = launch_command(&command) {
                    warn!(%command, "launch failed: {e}");
                }
            }
            DockRequest::OpenFile(path) => open_or_warn(&path),
            DockRequest::OpenSettings(name) => self.open_plugin_settings(&name),
            DockRequest::ReloadPlugins => self.reload_plugins(),
            DockRequest::Quit => self.should_exit = true,
        }
    }

    /// `anchor_x` is local to the owner's slot, or to the dock for owners
    /// without one.
    fn show_popup(&mut self, owner: String, popup: Popup, anchor_x: f64) {
        let dock = self.dock.rect();
        let slot_x = self.router.layout().slot(&owner).map_or(0, |slot| slot.rect.x);
        let anchor = dock.x + slot_x + anchor_x.round() as i32;
        if let Err(e) = self.popup.show(owner, popup, anchor, dock, self.screen) {
            warn!("cannot show popup: {e}");
        }
    }

    fn open_plugin_settings(&mut self, name: &str) {
        match self.host.settings_file(name) {
            Ok(path) => open_or_warn(&path),
            Err(e) => warn!(plugin = %name, "no settings file: {e}"),
        }
    }

    /// Re-read `core.json`, destroy every plugin and load the enabled set
    /// again.
    pub(super) fn reload_plugins(&mut self) {
        info!("reloading plugins");
        self.popup.hide();
        self.settings = load_settings(&self.paths);
        let names = self.settings.enabled_plugins();
        let services = DockServices::new(&self.windows, &self.translator);
        let requests = self.host.reload(&names, services, Instant::now());
        self.dispatch_all(requests);
        self.needs_relayout = true;
    }

    /// Ctrl + right click on the bar. `x` is local to the dock.
    pub(super) fn show_dock_menu(&mut self, x: f64) {
        let plugins: Vec<(&str, &str)> = self
            .host
            .names()
            .into_iter()
            .map(|name| (name, self.host.description(name).unwrap_or(name)))
            .collect();
        let entries = dock_menu::entries(|text| self.translator.tr(text), &plugins);
        self.show_popup(dock_menu::OWNER.to_string(), Popup::Menu(entries), x);
    }

    pub(super) fn dock_menu_action(&mut self, action: &str) {
        match DockMenuAction::parse(action) {
            Some(DockMenuAction::About) => {
                let center = f64::from(self.dock.rect().width) / 2.0;
                self.show_popup(
                    dock_menu::OWNER.to_string(),
                    Popup::Tooltip(dock_menu::about_lines()),
                    center,
                );
            }
            Some(DockMenuAction::Settings) => open_or_warn(&self.paths.core_file()),
            Some(DockMenuAction::PluginSettings(name)) => self.open_plugin_settings(&name),
            Some(DockMenuAction::Reload) => self.reload_plugins(),
            Some(DockMenuAction::Quit) => self.should_exit = true,
            None => debug!(%action, "unknown dock menu action"),
        }
    }
}
