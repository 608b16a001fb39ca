use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use brujo_common::{PluginError, Size};
use brujo_config::{ConfigPaths, FormField, PluginSettingsStore, SettingsForm, Translator};
use brujo_panel::LayoutEngine;
use brujo_platform::{NoopWindowSystem, WindowEvent};
use brujo_renderer::{Canvas, DockStyle, RecordingCanvas, TextStyle};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

use super::*;

type Log = Rc<RefCell<Vec<String>>>;

/// Records every hook it receives. Hooks named in `failing` return an error.
struct Recorder {
    name: String,
    log: Log,
    failing: Vec<&'static str>,
    width: i32,
}

impl Recorder {
    fn check(&self, hook: &'static str) -> Result<(), PluginError> {
        self.log.borrow_mut().push(format!("{}:{hook}", self.name));
        if self.failing.contains(&hook) {
            return Err(PluginError::Draw(format!("{hook} exploded")));
        }
        Ok(())
    }
}

impl Plugin for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Recorder"
    }

    fn settings_form(&self) -> SettingsForm {
        SettingsForm::new(vec![
            FormField::spin("width", "Width", 10, 200, 40),
            FormField::spin("interval_ms", "Interval", 0, 10_000, 100),
        ])
    }

    fn on_init(&mut self, ctx: &mut PluginContext<'_>, settings: &Map<String, Value>) -> Result<(), PluginError> {
        self.width = settings["width"].as_i64().unwrap_or(40) as i32;
        ctx.redraw();
        self.check("on_init")
    }

    fn on_destroy(&mut self) {
        self.log.borrow_mut().push(format!("{}:on_destroy", self.name));
    }

    fn preferred_size(&self) -> Size {
        Size::new(self.width, 24)
    }

    fn on_draw(&mut self, canvas: &mut dyn Canvas, _width: i32, _height: i32) -> Result<(), PluginError> {
        self.check("on_draw")?;
        canvas.draw_text(&self.name, 0.0, 0.0, &TextStyle::default());
        Ok(())
    }

    fn on_click(&mut self, ctx: &mut PluginContext<'_>, _x: f64, _y: f64) -> Result<(), PluginError> {
        ctx.launch("xterm");
        self.check("on_click")
    }

    fn tick_interval(&self) -> Option<Duration> {
        (self.width != 99).then_some(Duration::from_millis(100))
    }

    fn on_tick(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        ctx.redraw();
        self.check("on_tick")
    }

    fn on_settings_changed(
        &mut self,
        _ctx: &mut PluginContext<'_>,
        settings: &Map<String, Value>,
    ) -> Result<(), PluginError> {
        self.width = settings["width"].as_i64().unwrap_or(40) as i32;
        self.check("on_settings_changed")
    }

    fn on_window_event(&mut self, _ctx: &mut PluginContext<'_>, _event: WindowEvent) -> Result<(), PluginError> {
        self.check("on_window_event")
    }
}

struct Fixture {
    _dir: TempDir,
    paths: ConfigPaths,
    log: Log,
    host: PluginHost,
    windows: NoopWindowSystem,
    translator: Translator,
}

impl Fixture {
    /// Test plugins named `a`, `b`, `c`; `failing` maps a plugin name to its
    /// failing hooks.
    fn new(failing: &[(&'static str, &'static str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::new(dir.path());
        let log: Log = Rc::default();
        let failing = failing.to_vec();
        let factory_log = log.clone();
        let factory: PluginFactory = Box::new(move |name: &str| -> Option<Box<dyn Plugin>> {
            if !["a", "b", "c"].contains(&name) {
                return None;
            }
            Some(Box::new(Recorder {
                name: name.to_string(),
                log: factory_log.clone(),
                failing: failing.iter().filter(|(p, _)| *p == name).map(|(_, h)| *h).collect(),
                width: 0,
            }))
        });
        let host = PluginHost::new(factory, PluginSettingsStore::new(paths.clone()));
        Self {
            _dir: dir,
            paths,
            log,
            host,
            windows: NoopWindowSystem,
            translator: Translator::identity(),
        }
    }

    fn load(&mut self, names: &[&str], now: Instant) -> Vec<DockRequest> {
        let services = DockServices::new(&self.windows, &self.translator);
        self.host.load(names, services, now)
    }

    fn hooks(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

#[test]
fn loads_in_order_skipping_unknown_and_duplicates() {
    let mut fx = Fixture::new(&[]);
    let requests = fx.load(&["b", "nope", "a", "b"], Instant::now());

    assert_eq!(fx.host.names(), ["b", "a"]);
    assert_eq!(requests, [DockRequest::Redraw, DockRequest::Redraw, DockRequest::Relayout]);
    assert_eq!(fx.host.timers().len(), 2);
}

#[test]
fn failed_init_leaves_plugin_out() {
    let mut fx = Fixture::new(&[("b", "on_init")]);
    fx.load(&["a", "b", "c"], Instant::now());

    assert_eq!(fx.host.names(), ["a", "c"]);
    assert!(fx.hooks().contains(&"b:on_destroy".to_string()));
    assert_eq!(fx.host.timers().len(), 2);
}

#[test]
fn geometry_follows_preferred_sizes() {
    let mut fx = Fixture::new(&[]);
    fx.load(&["a", "b"], Instant::now());
    let engine = LayoutEngine {
        padding_x: 16,
        padding_y: 4,
        spacing: 4,
        min_height: 32,
    };

    let geometry = fx.host.geometry(&engine);
    assert_eq!(geometry.width, 16 * 2 + 40 + 40 + 4);
    assert_eq!(geometry.height, 32);
    assert_eq!(geometry.slots[1].key, "b");
    assert_eq!(geometry.slots[1].rect.x, 16 + 40 + 4);
}

#[test]
fn failing_draw_is_isolated() {
    let mut fx = Fixture::new(&[("a", "on_draw")]);
    fx.load(&["a", "b"], Instant::now());
    let geometry = fx.host.geometry(&LayoutEngine::default());

    let mut canvas = RecordingCanvas::new();
    let failures = fx.host.paint(&mut canvas, &DockStyle::default(), &geometry);
    assert_eq!(failures, 1);
    assert_eq!(canvas.texts(), ["b"]);

    // The next frame still reaches both plugins.
    fx.host.paint(&mut RecordingCanvas::new(), &DockStyle::default(), &geometry);
    let draws = fx.hooks().iter().filter(|h| h.ends_with("on_draw")).count();
    assert_eq!(draws, 4);
}

#[test]
fn failing_hook_drops_its_requests() {
    let mut fx = Fixture::new(&[("a", "on_click")]);
    fx.load(&["a", "b"], Instant::now());
    let services = DockServices::new(&fx.windows, &fx.translator);

    assert!(fx.host.click("a", 1.0, 1.0, services).is_empty());
    assert_eq!(fx.host.click("b", 1.0, 1.0, services), [DockRequest::Launch("xterm".into())]);
    assert!(fx.host.click("zzz", 1.0, 1.0, services).is_empty());
}

#[test]
fn window_events_reach_everyone_despite_failures() {
    let mut fx = Fixture::new(&[("a", "on_window_event")]);
    fx.load(&["a", "b", "c"], Instant::now());
    let services = DockServices::new(&fx.windows, &fx.translator);
    fx.host.window_event(WindowEvent::ActiveChanged(None), services);

    let seen: Vec<String> = fx
        .hooks()
        .into_iter()
        .filter(|h| h.ends_with("on_window_event"))
        .collect();
    assert_eq!(seen, ["a:on_window_event", "b:on_window_event", "c:on_window_event"]);
}

#[test]
fn ticks_run_when_due() {
    let start = Instant::now();
    let mut fx = Fixture::new(&[]);
    fx.load(&["a"], start);
    let services = DockServices::new(&fx.windows, &fx.translator);

    assert!(fx.host.tick(start + Duration::from_millis(50), services).is_empty());
    assert_eq!(
        fx.host.tick(start + Duration::from_millis(100), services),
        [DockRequest::Redraw]
    );
    assert_eq!(fx.host.next_deadline(), Some(start + Duration::from_millis(200)));
}

#[test]
fn reload_destroys_and_releases_timers() {
    let start = Instant::now();
    let mut fx = Fixture::new(&[]);
    fx.load(&["a", "b"], start);
    let services = DockServices::new(&fx.windows, &fx.translator);
    let requests = fx.host.reload(&["c"], services, start);

    assert_eq!(fx.host.names(), ["c"]);
    assert_eq!(fx.host.timers().len(), 1);
    assert_eq!(requests.last(), Some(&DockRequest::Relayout));
    let hooks = fx.hooks();
    assert!(hooks.contains(&"a:on_destroy".to_string()));
    assert!(hooks.contains(&"b:on_destroy".to_string()));

    // Ticks only reach the new plugin.
    fx.host.tick(start + Duration::from_secs(1), services);
    assert!(!fx.hooks().iter().any(|h| h == "a:on_tick" || h == "b:on_tick"));
}

#[test]
fn stored_settings_override_defaults() {
    let mut fx = Fixture::new(&[]);
    PluginSettingsStore::new(fx.paths.clone())
        .save("a", &json!({"width": 70}).as_object().unwrap().clone())
        .unwrap();
    fx.load(&["a"], Instant::now());

    assert_eq!(fx.host.settings("a").unwrap()["width"], json!(70));
    assert_eq!(fx.host.settings("a").unwrap()["interval_ms"], json!(100));
    assert_eq!(fx.host.components()[0].1, Size::new(70, 24));
}

#[test]
fn apply_settings_persists_and_notifies() {
    let start = Instant::now();
    let mut fx = Fixture::new(&[]);
    fx.load(&["a"], start);
    let services = DockServices::new(&fx.windows, &fx.translator);

    let changes = json!({"width": 500}).as_object().unwrap().clone();
    let requests = fx.host.apply_settings("a", &changes, services, start).unwrap();
    assert_eq!(requests, [DockRequest::Relayout]);
    assert_eq!(fx.host.components()[0].1.width, 200);

    let stored = PluginSettingsStore::new(fx.paths.clone()).load("a");
    assert_eq!(stored["width"], json!(200));
}

#[test]
fn apply_settings_reschedules_changed_interval() {
    let start = Instant::now();
    let mut fx = Fixture::new(&[]);
    fx.load(&["a"], start);
    let services = DockServices::new(&fx.windows, &fx.translator);

    let changes = json!({"width": 99}).as_object().unwrap().clone();
    fx.host.apply_settings("a", &changes, services, start).unwrap();
    assert!(fx.host.timers().is_empty());
}

#[test]
fn invalid_settings_are_not_saved() {
    let mut fx = Fixture::new(&[]);
    fx.load(&["a"], Instant::now());
    let services = DockServices::new(&fx.windows, &fx.translator);

    let changes = json!({"width": "wide"}).as_object().unwrap().clone();
    let err = fx.host.apply_settings("a", &changes, services, Instant::now());
    assert!(matches!(err, Err(PluginError::Config(_))));
    assert!(!fx.paths.plugin_file("a").exists());

    let err = fx.host.apply_settings("zzz", &Map::new(), services, Instant::now());
    assert!(matches!(err, Err(PluginError::Unknown(_))));
}

#[test]
fn settings_file_is_created_on_demand() {
    let mut fx = Fixture::new(&[]);
    fx.load(&["a"], Instant::now());

    let path = fx.host.settings_file("a").unwrap();
    assert_eq!(path, fx.paths.plugin_file("a"));
    let stored = PluginSettingsStore::new(fx.paths.clone()).load("a");
    assert_eq!(stored["width"], json!(40));
}
