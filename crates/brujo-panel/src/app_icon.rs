use std::path::PathBuf;

use brujo_common::WindowRef;
use brujo_platform::DesktopEntry;

use crate::normalizer::normalize;

const GENERIC_ICON: &str = "application-x-executable";

/// One dock slot: an application and the windows grouped under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationIcon {
    pub identifier: String,
    pub display_name: String,
    /// Theme name or absolute path, resolved to pixels by the renderer.
    pub icon_name: String,
    pub desktop_path: Option<PathBuf>,
    pub pinned: bool,
    windows: Vec<WindowRef>,
    pub hovered: bool,
    pub active: bool,
}

impl ApplicationIcon {
    pub fn new(identifier: impl Into<String>, display_name: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            icon_name: identifier.clone(),
            identifier,
            display_name: display_name.into(),
            desktop_path: None,
            pinned: false,
            windows: Vec::new(),
            hovered: false,
            active: false,
        }
    }

    /// Icon for a launcher. The identifier comes from `StartupWMClass`,
    /// else the file stem, so it matches the class its windows report.
    pub fn from_desktop_entry(entry: &DesktopEntry, pinned: bool) -> Self {
        let display_name = if entry.name.is_empty() {
            entry.stem().to_string()
        } else {
            entry.name.clone()
        };
        let mut icon = Self::new(normalize(entry.class_hint()), display_name);
        icon.icon_name = entry
            .icon
            .clone()
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| GENERIC_ICON.to_string());
        icon.desktop_path = Some(entry.path.clone());
        icon.pinned = pinned;
        icon
    }

    pub fn windows(&self) -> &[WindowRef] {
        &self.windows
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_running(&self) -> bool {
        !self.windows.is_empty()
    }

    pub fn has_window(&self, window: WindowRef) -> bool {
        self.windows.contains(&window)
    }

    /// Returns `false` if the window was already present.
    pub fn add_window(&mut self, window: WindowRef) -> bool {
        if self.has_window(window) {
            return false;
        }
        self.windows.push(window);
        true
    }

    pub fn remove_window(&mut self, window: WindowRef) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| *w != window);
        self.windows.len() != before
    }

    /// Whether this icon may leave the dock.
    pub fn is_disposable(&self) -> bool {
        !self.pinned && self.windows.is_empty()
    }
}
