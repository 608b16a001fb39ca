//! Configuration schema types for BrujoDock.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Unknown top-level keys land in `extra` and are written back on save.

mod logging;
mod plugins;

pub use logging::*;
pub use plugins::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Core dock settings (`core.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockSettings {
    /// Dock height when no component is visible.
    pub default_height: u32,
    pub dock_padding_x: u32,
    pub dock_padding_y: u32,
    pub corner_radius: u32,
    /// Gap between plugin slots.
    pub dock_spacing: u32,
    pub log_mode: LogMode,
    /// ISO language code. `null` means detect from the environment.
    pub language: Option<String>,
    /// Insertion order is display order.
    pub plugins: PluginTable,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DockSettings {
    fn default() -> Self {
        Self {
            default_height: 32,
            dock_padding_x: 16,
            dock_padding_y: 4,
            corner_radius: 12,
            dock_spacing: 4,
            log_mode: LogMode::None,
            language: Some("en".into()),
            plugins: PluginTable::default(),
            extra: Map::new(),
        }
    }
}

impl DockSettings {
    /// Keep the corner radius within the dock's outer padding.
    pub fn clamp_corner_radius(&mut self) {
        let max_radius = self.dock_padding_x.max(self.dock_padding_y);
        self.corner_radius = self.corner_radius.min(max_radius);
    }

    /// Names of enabled plugins in display order.
    pub fn enabled_plugins(&self) -> Vec<&str> {
        self.plugins
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
