//! Two-line clock: time above, date below, right-aligned.
//!
//! The clock ticks every 100 ms but only asks for a relayout when its
//! width changes; a changed text alone is a redraw.

mod format;

pub use format::{offset_label, render, validate, Zone};

use std::time::Duration;

use brujo_common::{Color, PluginError, Size};
use brujo_config::{FormField, SettingsForm};
use brujo_renderer::{Canvas, Fonts, MenuEntry, Popup, TextStyle};
use chrono::{DateTime, FixedOffset, Local};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::builtin::settings::{int, lines, text};
use crate::context::PluginContext;
use crate::plugin::Plugin;

/// Where the current time comes from.
pub type TimeSource = Box<dyn Fn() -> DateTime<FixedOffset>>;

const DEFAULT_TIME_FORMAT: &str = "%-I:%M:%S %p";
const DEFAULT_DATE_FORMAT: &str = "%d.%m.%y";
const MIN_HEIGHT: i32 = 32;
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
struct ClockConfig {
    time_format: String,
    date_format: String,
    font_size: f32,
    padding_x: i32,
    timezones: Vec<String>,
}

impl ClockConfig {
    fn from_settings(settings: &Map<String, Value>) -> Self {
        Self {
            time_format: checked(text(settings, "time_format", DEFAULT_TIME_FORMAT), DEFAULT_TIME_FORMAT),
            date_format: checked(text(settings, "date_format", DEFAULT_DATE_FORMAT), DEFAULT_DATE_FORMAT),
            font_size: int(settings, "font_size", 10) as f32,
            padding_x: int(settings, "padding_x", 8) as i32,
            timezones: lines(settings, "timezones"),
        }
    }
}

fn checked(format: String, fallback: &str) -> String {
    match validate(&format) {
        Ok(()) => format,
        Err(e) => {
            warn!("{e}; using {fallback:?}");
            fallback.to_string()
        }
    }
}

fn form() -> SettingsForm {
    SettingsForm::new(vec![
        FormField::entry("time_format", "Time format", DEFAULT_TIME_FORMAT),
        FormField::entry("date_format", "Date format", DEFAULT_DATE_FORMAT),
        FormField::spin("font_size", "Font size", 8, 48, 10),
        FormField::spin("padding_x", "Horizontal padding", 0, 64, 8),
        FormField::text("timezones", "Timezones", &[]),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refresh {
    Same,
    Text,
    Width,
}

pub struct Clock {
    fonts: Fonts,
    config: ClockConfig,
    now: TimeSource,
    time: String,
    date: String,
    width: i32,
    hovering: bool,
}

impl Clock {
    pub fn new(fonts: Fonts) -> Self {
        Self::with_source(fonts, Box::new(|| Local::now().fixed_offset()))
    }

    pub fn with_source(fonts: Fonts, now: TimeSource) -> Self {
        let config = ClockConfig::from_settings(&form().defaults());
        Self {
            width: config.padding_x * 2,
            fonts,
            config,
            now,
            time: String::new(),
            date: String::new(),
            hovering: false,
        }
    }

    fn style(&self) -> TextStyle {
        TextStyle::new(self.config.font_size, Color::WHITE)
    }

    fn refresh(&mut self) -> Result<Refresh, PluginError> {
        let now = (self.now)();
        let time = render(&now, &self.config.time_format)?;
        let date = render(&now, &self.config.date_format)?;

        let style = self.style();
        let text_width = self
            .fonts
            .measure(&time, &style)
            .width
            .max(self.fonts.measure(&date, &style).width);
        let width = text_width.ceil() as i32 + self.config.padding_x * 2;

        let outcome = if width != self.width {
            Refresh::Width
        } else if time != self.time || date != self.date {
            Refresh::Text
        } else {
            Refresh::Same
        };
        self.time = time;
        self.date = date;
        self.width = width;
        Ok(outcome)
    }

    fn tooltip(&self, ctx: &PluginContext<'_>) -> Result<Vec<String>, PluginError> {
        let now = (self.now)();
        let config = &self.config;
        let mut tooltip = vec![format!(
            "{}, {} ({} - {})",
            render(&now, &config.date_format)?,
            render(&now, &config.time_format)?,
            ctx.tr("local time"),
            offset_label(*now.offset()),
        )];

        let zones: Vec<(&str, Zone)> = config
            .timezones
            .iter()
            .filter_map(|spec| match Zone::parse(spec) {
                Some(zone) => Some((spec.as_str(), zone)),
                None => {
                    debug!(zone = %spec, "unsupported timezone skipped");
                    None
                }
            })
            .collect();
        if !zones.is_empty() {
            tooltip.push(String::new());
        }
        for (spec, zone) in zones {
            let there = zone.at(&now);
            tooltip.push(format!(
                "{spec}: {}, {}",
                render(&there, &config.date_format)?,
                render(&there, &config.time_format)?,
            ));
        }
        Ok(tooltip)
    }
}

impl Plugin for Clock {
    fn name(&self) -> &str {
        "clock"
    }

    fn description(&self) -> &str {
        "Clock"
    }

    fn settings_form(&self) -> SettingsForm {
        form()
    }

    fn on_init(&mut self, _ctx: &mut PluginContext<'_>, settings: &Map<String, Value>) -> Result<(), PluginError> {
        self.config = ClockConfig::from_settings(settings);
        self.refresh()?;
        Ok(())
    }

    fn preferred_size(&self) -> Size {
        let height = (self.config.font_size as i32 * 2 + 8).max(MIN_HEIGHT);
        Size::new(self.width, height)
    }

    fn on_draw(&mut self, canvas: &mut dyn Canvas, width: i32, height: i32) -> Result<(), PluginError> {
        let style = self.style();
        let right = (width - self.config.padding_x) as f32;

        let time = canvas.measure_text(&self.time, &style);
        canvas.draw_text(&self.time, right - time.width, 0.0, &style);
        let date = canvas.measure_text(&self.date, &style);
        canvas.draw_text(&self.date, right - date.width, height as f32 - date.height, &style);
        Ok(())
    }

    fn on_right_click(&mut self, ctx: &mut PluginContext<'_>, x: f64, _y: f64) -> Result<(), PluginError> {
        ctx.hide_popup();
        ctx.show_menu(vec![MenuEntry::item(ctx.tr("Settings"), "settings")], x);
        Ok(())
    }

    fn on_hover(&mut self, ctx: &mut PluginContext<'_>, _x: f64, _y: f64) -> Result<(), PluginError> {
        if self.hovering {
            return Ok(());
        }
        self.hovering = true;
        let tooltip = self.tooltip(ctx)?;
        ctx.show_popup(Popup::Tooltip(tooltip), self.width as f64 / 2.0);
        Ok(())
    }

    fn on_leave(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        self.hovering = false;
        ctx.hide_popup();
        Ok(())
    }

    fn tick_interval(&self) -> Option<Duration> {
        Some(TICK)
    }

    fn on_tick(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        match self.refresh()? {
            Refresh::Width => ctx.relayout(),
            Refresh::Text => ctx.redraw(),
            Refresh::Same => {}
        }
        Ok(())
    }

    fn on_settings_changed(
        &mut self,
        ctx: &mut PluginContext<'_>,
        settings: &Map<String, Value>,
    ) -> Result<(), PluginError> {
        self.config = ClockConfig::from_settings(settings);
        self.refresh()?;
        ctx.relayout();
        Ok(())
    }

    fn on_menu_action(&mut self, ctx: &mut PluginContext<'_>, action: &str) -> Result<(), PluginError> {
        if action == "settings" {
            ctx.open_settings();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use brujo_config::Translator;
    use brujo_platform::NoopWindowSystem;
    use brujo_renderer::RecordingCanvas;
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::context::{DockRequest, DockServices};

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 9, hour, minute, second)
            .unwrap()
    }

    struct Fixture {
        now: Rc<Cell<DateTime<FixedOffset>>>,
        clock: Clock,
        windows: NoopWindowSystem,
        translator: Translator,
    }

    impl Fixture {
        fn new(settings: Value) -> Self {
            let now = Rc::new(Cell::new(at(19, 5, 7)));
            let source = now.clone();
            let mut fx = Self {
                now,
                clock: Clock::with_source(Fonts::none(), Box::new(move || source.get())),
                windows: NoopWindowSystem,
                translator: Translator::identity(),
            };
            let settings = form().merge_defaults(settings.as_object().unwrap());
            fx.call(|clock, ctx| clock.on_init(ctx, &settings));
            fx
        }

        fn call<F>(&mut self, f: F) -> Vec<DockRequest>
        where
            F: FnOnce(&mut Clock, &mut PluginContext<'_>) -> Result<(), PluginError>,
        {
            let mut requests = Vec::new();
            let services = DockServices::new(&self.windows, &self.translator);
            let mut ctx = PluginContext::new("clock", services, &mut requests);
            f(&mut self.clock, &mut ctx).unwrap();
            requests
        }

        fn tick(&mut self) -> Vec<DockRequest> {
            self.call(|clock, ctx| clock.on_tick(ctx))
        }
    }

    #[test]
    fn width_is_widest_line_plus_padding() {
        let fx = Fixture::new(json!({}));
        // "7:05:07 PM" is wider than "09.03.24": 10 chars at 5 px.
        assert_eq!(fx.clock.preferred_size(), Size::new(50 + 16, 32));
    }

    #[test]
    fn tick_redraws_and_relayouts_only_when_needed() {
        let mut fx = Fixture::new(json!({}));
        assert!(fx.tick().is_empty());

        fx.now.set(at(19, 5, 8));
        assert_eq!(fx.tick(), [DockRequest::Redraw]);

        fx.now.set(at(22, 5, 8));
        assert_eq!(fx.tick(), [DockRequest::Relayout]);
        assert_eq!(fx.clock.preferred_size().width, 55 + 16);
    }

    #[test]
    fn lines_are_right_aligned() {
        let mut fx = Fixture::new(json!({}));
        let mut canvas = RecordingCanvas::new();
        fx.clock.on_draw(&mut canvas, 66, 32).unwrap();

        let placed: Vec<(String, f32, f32)> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                brujo_renderer::DrawOp::Text { text, x, y, .. } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(
            placed,
            [("7:05:07 PM".to_string(), 8.0, 0.0), ("09.03.24".to_string(), 18.0, 22.0)]
        );
    }

    #[test]
    fn invalid_format_falls_back_to_default() {
        let fx = Fixture::new(json!({"time_format": "%H:%Q"}));
        assert_eq!(fx.clock.time, "7:05:07 PM");
    }

    #[test]
    fn custom_formats_and_font_size() {
        let fx = Fixture::new(json!({"time_format": "%H:%M", "font_size": 20, "padding_x": 0}));
        assert_eq!(fx.clock.time, "19:05");
        // "09.03.24" at 10 px per char, two 20 px lines plus 8.
        assert_eq!(fx.clock.preferred_size(), Size::new(80, 48));
    }

    #[test]
    fn tooltip_lists_configured_zones() {
        let mut fx = Fixture::new(json!({"timezones": "UTC\nMars/Olympus\nUTC-5"}));
        let requests = fx.call(|clock, ctx| clock.on_hover(ctx, 3.0, 3.0));

        let expected = Popup::Tooltip(vec![
            "09.03.24, 7:05:07 PM (local time - UTC+03:00)".into(),
            String::new(),
            "UTC: 09.03.24, 4:05:07 PM".into(),
            "UTC-5: 09.03.24, 11:05:07 AM".into(),
        ]);
        assert_eq!(
            requests,
            [DockRequest::ShowPopup {
                owner: "clock".into(),
                popup: expected,
                anchor_x: 33.0,
            }]
        );

        // Shown once per visit.
        assert!(fx.call(|clock, ctx| clock.on_hover(ctx, 4.0, 3.0)).is_empty());
        assert_eq!(fx.call(|clock, ctx| clock.on_leave(ctx)), [DockRequest::HidePopup]);
    }

    #[test]
    fn right_click_offers_settings() {
        let mut fx = Fixture::new(json!({}));
        let requests = fx.call(|clock, ctx| clock.on_right_click(ctx, 10.0, 5.0));
        assert!(matches!(&requests[1], DockRequest::ShowMenu { entries, .. }
            if entries == &[MenuEntry::item("Settings", "settings")]));
        assert_eq!(
            fx.call(|clock, ctx| clock.on_menu_action(ctx, "settings")),
            [DockRequest::OpenSettings("clock".into())]
        );
    }
}
