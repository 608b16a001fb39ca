//! What a plugin hook may touch, and what it may ask the dock to do.

use std::path::PathBuf;

use brujo_config::Translator;
use brujo_platform::WindowSystem;
use brujo_renderer::{MenuEntry, Popup};

/// Work a plugin hands back to the dock. Carried out by the application
/// after the hook returns, in the order it was requested.
#[derive(Debug, Clone, PartialEq)]
pub enum DockRequest {
    /// Preferred sizes changed: recompute geometry, resize and repaint.
    Relayout,
    Redraw,
    /// Open a menu above the dock. `anchor_x` is local to `owner`'s slot.
    /// The chosen entry's action comes back through `on_menu_action`.
    ShowMenu {
        owner: String,
        entries: Vec<MenuEntry>,
        anchor_x: f64,
    },
    ShowPopup {
        owner: String,
        popup: Popup,
        anchor_x: f64,
    },
    HidePopup,
    Launch(String),
    OpenFile(PathBuf),
    /// Open the settings file of the named plugin.
    OpenSettings(String),
    ReloadPlugins,
    Quit,
}

/// Long-lived dock services lent to plugins.
#[derive(Clone, Copy)]
pub struct DockServices<'a> {
    pub windows: &'a dyn WindowSystem,
    pub translator: &'a Translator,
}

impl<'a> DockServices<'a> {
    pub fn new(windows: &'a dyn WindowSystem, translator: &'a Translator) -> Self {
        Self { windows, translator }
    }
}

/// Borrowed dock services for the duration of one hook call.
pub struct PluginContext<'a> {
    plugin: &'a str,
    windows: &'a dyn WindowSystem,
    translator: &'a Translator,
    requests: &'a mut Vec<DockRequest>,
}

impl<'a> PluginContext<'a> {
    pub fn new(plugin: &'a str, services: DockServices<'a>, requests: &'a mut Vec<DockRequest>) -> Self {
        Self {
            plugin,
            windows: services.windows,
            translator: services.translator,
            requests,
        }
    }

    pub fn plugin(&self) -> &str {
        self.plugin
    }

    pub fn windows(&self) -> &'a dyn WindowSystem {
        self.windows
    }

    pub fn translator(&self) -> &'a Translator {
        self.translator
    }

    pub fn tr(&self, text: &'a str) -> &'a str {
        self.translator.tr(text)
    }

    pub fn request(&mut self, request: DockRequest) {
        self.requests.push(request);
    }

    pub fn relayout(&mut self) {
        self.request(DockRequest::Relayout);
    }

    pub fn redraw(&mut self) {
        self.request(DockRequest::Redraw);
    }

    pub fn show_menu(&mut self, entries: Vec<MenuEntry>, anchor_x: f64) {
        let owner = self.plugin.to_string();
        self.request(DockRequest::ShowMenu {
            owner,
            entries,
            anchor_x,
        });
    }

    pub fn show_popup(&mut self, popup: Popup, anchor_x: f64) {
        let owner = self.plugin.to_string();
        self.request(DockRequest::ShowPopup {
            owner,
            popup,
            anchor_x,
        });
    }

    pub fn hide_popup(&mut self) {
        self.request(DockRequest::HidePopup);
    }

    pub fn launch(&mut self, command: impl Into<String>) {
        self.request(DockRequest::Launch(command.into()));
    }

    pub fn open_settings(&mut self) {
        let plugin = self.plugin.to_string();
        self.request(DockRequest::OpenSettings(plugin));
    }
}
