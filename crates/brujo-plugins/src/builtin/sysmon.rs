//! One-line CPU, memory and temperature readout.

use std::time::Duration;

use brujo_common::{Color, PluginError, Size};
use brujo_config::{FormField, SettingsForm};
use brujo_platform::{SystemProbe, SystemSample};
use brujo_renderer::{Canvas, Fonts, MenuEntry, TextStyle};
use serde_json::{Map, Value};

use crate::builtin::settings::{flag, int, text};
use crate::context::PluginContext;
use crate::plugin::Plugin;

/// Produces a fresh reading on every call.
pub type Sampler = Box<dyn FnMut() -> SystemSample>;

const EMPTY_WIDTH: i32 = 160;
const PADDING_X: i32 = 8;

#[derive(Debug, Clone, PartialEq)]
struct SysmonConfig {
    cpu_label: String,
    ram_label: String,
    temp_label: String,
    show_cpu: bool,
    show_ram: bool,
    show_temp: bool,
    font_size: f32,
    update_interval: Duration,
}

impl SysmonConfig {
    fn from_settings(settings: &Map<String, Value>) -> Self {
        Self {
            cpu_label: text(settings, "cpu_label", "CPU"),
            ram_label: text(settings, "ram_label", "RAM"),
            temp_label: text(settings, "temp_label", "T"),
            show_cpu: flag(settings, "show_cpu", true),
            show_ram: flag(settings, "show_ram", true),
            show_temp: flag(settings, "show_temp", true),
            font_size: int(settings, "font_size", 10) as f32,
            update_interval: Duration::from_millis(int(settings, "update_interval_ms", 1000).max(1) as u64),
        }
    }

    fn readout(&self, sample: &SystemSample) -> String {
        let mut parts = Vec::new();
        if self.show_cpu {
            parts.push(format!("{}: {:3}%", self.cpu_label, sample.cpu_percent.round() as i32));
        }
        if self.show_ram {
            parts.push(format!("{}: {:3}%", self.ram_label, sample.ram_percent.round() as i32));
        }
        if let (true, Some(t)) = (self.show_temp, sample.temperature) {
            parts.push(format!("{}: {:3}°", self.temp_label, t.round() as i32));
        }
        parts.join(" | ")
    }
}

fn form() -> SettingsForm {
    SettingsForm::new(vec![
        FormField::entry("cpu_label", "CPU label", "CPU"),
        FormField::entry("ram_label", "RAM label", "RAM"),
        FormField::entry("temp_label", "Temperature label", "T"),
        FormField::switch("show_cpu", "Show CPU", true),
        FormField::switch("show_ram", "Show RAM", true),
        FormField::switch("show_temp", "Show temperature", true),
        FormField::spin("font_size", "Font size", 6, 48, 10),
        FormField::spin("update_interval_ms", "Update interval (ms)", 250, 60_000, 1000),
    ])
}

pub struct Sysmon {
    fonts: Fonts,
    config: SysmonConfig,
    sampler: Sampler,
    readout: String,
    width: i32,
}

impl Sysmon {
    pub fn new(fonts: Fonts) -> Self {
        let mut probe = SystemProbe::new();
        Self::with_sampler(fonts, Box::new(move || probe.sample()))
    }

    pub fn with_sampler(fonts: Fonts, sampler: Sampler) -> Self {
        Self {
            fonts,
            config: SysmonConfig::from_settings(&form().defaults()),
            sampler,
            readout: String::new(),
            width: EMPTY_WIDTH,
        }
    }

    fn style(&self) -> TextStyle {
        TextStyle::new(self.config.font_size, Color::WHITE)
    }

    /// Take a sample. Returns `None` when the text is unchanged, otherwise
    /// whether the width changed.
    fn refresh(&mut self) -> Option<bool> {
        let sample = (self.sampler)();
        let readout = self.config.readout(&sample);
        if readout == self.readout {
            return None;
        }

        let width = if readout.is_empty() {
            EMPTY_WIDTH
        } else {
            self.fonts.measure(&readout, &self.style()).width.ceil() as i32 + PADDING_X * 2
        };
        self.readout = readout;
        let resized = width != self.width;
        self.width = width;
        Some(resized)
    }
}

impl Plugin for Sysmon {
    fn name(&self) -> &str {
        "sysmon"
    }

    fn description(&self) -> &str {
        "System monitor"
    }

    fn settings_form(&self) -> SettingsForm {
        form()
    }

    fn on_init(&mut self, _ctx: &mut PluginContext<'_>, settings: &Map<String, Value>) -> Result<(), PluginError> {
        self.config = SysmonConfig::from_settings(settings);
        self.refresh();
        Ok(())
    }

    fn preferred_size(&self) -> Size {
        Size::new(self.width, self.config.font_size as i32 + 8)
    }

    fn on_draw(&mut self, canvas: &mut dyn Canvas, width: i32, height: i32) -> Result<(), PluginError> {
        if self.readout.is_empty() {
            return Ok(());
        }
        let style = self.style();
        let extents = canvas.measure_text(&self.readout, &style);
        canvas.draw_text(
            &self.readout,
            (width as f32 - extents.width) / 2.0,
            (height as f32 - extents.height) / 2.0,
            &style,
        );
        Ok(())
    }

    fn on_right_click(&mut self, ctx: &mut PluginContext<'_>, x: f64, _y: f64) -> Result<(), PluginError> {
        ctx.show_menu(vec![MenuEntry::item(ctx.tr("Settings"), "settings")], x);
        Ok(())
    }

    fn on_menu_action(&mut self, ctx: &mut PluginContext<'_>, action: &str) -> Result<(), PluginError> {
        if action == "settings" {
            ctx.open_settings();
        }
        Ok(())
    }

    fn tick_interval(&self) -> Option<Duration> {
        Some(self.config.update_interval)
    }

    fn on_tick(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        match self.refresh() {
            Some(true) => ctx.relayout(),
            Some(false) => ctx.redraw(),
            None => {}
        }
        Ok(())
    }

    fn on_settings_changed(
        &mut self,
        ctx: &mut PluginContext<'_>,
        settings: &Map<String, Value>,
    ) -> Result<(), PluginError> {
        self.config = SysmonConfig::from_settings(settings);
        self.readout.clear();
        self.refresh();
        ctx.relayout();
        Ok(())
    }
}
