use brujo_common::Color;
use brujo_config::{FormField, SettingsForm};
use brujo_panel::LayoutEngine;
use serde_json::{Map, Value};

use crate::builtin::settings::{int, text};

const DEFAULT_HIGHLIGHT: Color = Color::from_rgba(0x00, 0xcc, 0x00, 0xff);

/// What hovering an icon shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintMode {
    None,
    /// Window titles.
    Tooltip,
    /// Thumbnail of the first window.
    Preview,
}

impl HintMode {
    fn from_index(index: i64) -> Self {
        match index {
            0 => Self::None,
            2 => Self::Preview,
            _ => Self::Tooltip,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconPanelConfig {
    pub icon_size: i32,
    pub panel_padding_x: i32,
    pub icon_padding_x: i32,
    pub icon_spacing: i32,
    pub icon_padding_top: i32,
    pub icon_padding_bottom: i32,
    pub highlight_color: Color,
    pub highlight_height: i32,
    pub hint_mode: HintMode,
}

impl Default for IconPanelConfig {
    fn default() -> Self {
        Self::from_settings(&form().defaults())
    }
}

impl IconPanelConfig {
    pub fn from_settings(settings: &Map<String, Value>) -> Self {
        let highlight = text(settings, "icon_highlight_color", "#00cc00");
        Self {
            icon_size: int(settings, "icon_size", 32) as i32,
            panel_padding_x: int(settings, "panel_padding_x", 4) as i32,
            icon_padding_x: int(settings, "icon_padding_x", 2) as i32,
            icon_spacing: int(settings, "icon_spacing", 2) as i32,
            icon_padding_top: int(settings, "icon_padding_top", 2) as i32,
            icon_padding_bottom: int(settings, "icon_padding_bottom", 6) as i32,
            highlight_color: Color::from_hex(&highlight).unwrap_or(DEFAULT_HIGHLIGHT),
            highlight_height: int(settings, "icon_highlight_height", 4) as i32,
            hint_mode: HintMode::from_index(int(settings, "hint_mode", 1)),
        }
    }

    /// Width and height of one icon cell, padding included.
    pub fn cell(&self) -> (i32, i32) {
        (
            self.icon_size + self.icon_padding_x * 2,
            self.icon_padding_top + self.icon_size + self.icon_padding_bottom,
        )
    }

    pub fn layout_engine(&self) -> LayoutEngine {
        LayoutEngine {
            padding_x: self.panel_padding_x,
            padding_y: 0,
            spacing: self.icon_spacing,
            min_height: 0,
        }
    }

    /// Height of the running indicator, never taller than the space below
    /// the icon.
    pub fn bar_height(&self) -> i32 {
        self.highlight_height.min(self.icon_padding_bottom).max(0)
    }
}

pub fn form() -> SettingsForm {
    SettingsForm::new(vec![
        FormField::spin("icon_size", "Icon size", 16, 128, 32),
        FormField::spin("panel_padding_x", "Panel padding", 0, 64, 4),
        FormField::spin("icon_padding_x", "Horizontal icon padding", 0, 32, 2),
        FormField::spin("icon_spacing", "Icon spacing", 0, 32, 2),
        FormField::spin("icon_padding_top", "Top icon padding", 0, 32, 2),
        FormField::spin("icon_padding_bottom", "Bottom icon padding", 0, 32, 6),
        FormField::entry("icon_highlight_color", "Highlight color", "#00cc00"),
        FormField::spin("icon_highlight_height", "Highlight height", 0, 16, 4),
        FormField::spin("hint_mode", "Hint (0 none, 1 titles, 2 preview)", 0, 2, 1),
    ])
}
