//! Charge level and charging state of the first battery.

use std::path::PathBuf;
use std::time::Duration;

use brujo_common::{Color, PluginError, Size};
use brujo_platform::{read_battery, BatteryInfo, BatteryStatus};
use brujo_renderer::{Canvas, Fonts, TextStyle};
use serde_json::{Map, Value};

use crate::context::PluginContext;
use crate::plugin::Plugin;

const FONT_SIZE: f32 = 14.0;
const PADDING_X: i32 = 8;
const HEIGHT: i32 = 32;
const POLL: Duration = Duration::from_millis(1000);

fn charging_color() -> Color {
    Color::from_f32(0.29, 0.56, 0.88, 1.0)
}

fn idle_color() -> Color {
    Color::from_f32(0.8, 0.8, 0.8, 1.0)
}

fn absent_color() -> Color {
    Color::from_f32(0.7, 0.7, 0.7, 1.0)
}

fn level_color(capacity: u8) -> Color {
    match capacity {
        40.. => Color::from_f32(0.49, 0.83, 0.13, 1.0),
        20.. => Color::from_f32(0.96, 0.65, 0.14, 1.0),
        _ => Color::from_f32(0.81, 0.01, 0.10, 1.0),
    }
}

/// What the slot shows, already translated.
#[derive(Debug, Clone, PartialEq)]
enum Readout {
    Battery {
        status: String,
        status_color: Color,
        level: String,
        level_color: Color,
    },
    Absent(String),
}

impl Readout {
    fn new(ctx: &PluginContext<'_>, info: Option<BatteryInfo>) -> Self {
        match info {
            Some(info) => {
                let (status, status_color) = match info.status {
                    BatteryStatus::Charging => (ctx.tr("Charging"), charging_color()),
                    BatteryStatus::Discharging => (ctx.tr("Discharging"), idle_color()),
                };
                Self::Battery {
                    status: status.to_string(),
                    status_color,
                    level: format!("{}%", info.capacity),
                    level_color: level_color(info.capacity),
                }
            }
            None => Self::Absent(ctx.tr("There is no battery").to_string()),
        }
    }

    fn texts(&self) -> Vec<&str> {
        match self {
            Self::Battery { status, level, .. } => vec![status.as_str(), level.as_str()],
            Self::Absent(text) => vec![text.as_str()],
        }
    }
}

pub struct BatteryStatusPlugin {
    fonts: Fonts,
    power_supply: PathBuf,
    readout: Option<Readout>,
    width: i32,
}

impl BatteryStatusPlugin {
    pub fn new(fonts: Fonts, power_supply: PathBuf) -> Self {
        Self {
            fonts,
            power_supply,
            readout: None,
            width: PADDING_X * 2,
        }
    }

    /// Re-read the battery and report what has to happen on screen.
    fn refresh(&mut self, ctx: &mut PluginContext<'_>) {
        let readout = Readout::new(ctx, read_battery(&self.power_supply));
        if self.readout.as_ref() == Some(&readout) {
            return;
        }

        let style = TextStyle::new(FONT_SIZE, Color::WHITE);
        let text_width = readout
            .texts()
            .iter()
            .map(|t| self.fonts.measure(t, &style).width)
            .fold(0.0_f32, f32::max);
        let width = text_width.ceil() as i32 + PADDING_X * 2;

        self.readout = Some(readout);
        if width != self.width {
            self.width = width;
            ctx.relayout();
        } else {
            ctx.redraw();
        }
    }
}

impl Plugin for BatteryStatusPlugin {
    fn name(&self) -> &str {
        "battery_status"
    }

    fn description(&self) -> &str {
        "Battery status"
    }

    fn on_init(&mut self, ctx: &mut PluginContext<'_>, _settings: &Map<String, Value>) -> Result<(), PluginError> {
        self.refresh(ctx);
        Ok(())
    }

    fn preferred_size(&self) -> Size {
        Size::new(self.width, HEIGHT)
    }

    fn on_draw(&mut self, canvas: &mut dyn Canvas, _width: i32, height: i32) -> Result<(), PluginError> {
        let x = PADDING_X as f32;
        match &self.readout {
            Some(Readout::Battery {
                status,
                status_color,
                level,
                level_color,
            }) => {
                canvas.draw_text(status, x, 0.0, &TextStyle::new(FONT_SIZE, *status_color));
                let style = TextStyle::new(FONT_SIZE, *level_color);
                let extents = canvas.measure_text(level, &style);
                canvas.draw_text(level, x, height as f32 - extents.height, &style);
            }
            Some(Readout::Absent(text)) => {
                let style = TextStyle::new(FONT_SIZE, absent_color());
                let extents = canvas.measure_text(text, &style);
                canvas.draw_text(text, x, (height as f32 - extents.height) / 2.0, &style);
            }
            None => {}
        }
        Ok(())
    }

    fn tick_interval(&self) -> Option<Duration> {
        Some(POLL)
    }

    fn on_tick(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        self.refresh(ctx);
        Ok(())
    }
}
