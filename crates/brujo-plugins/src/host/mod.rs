//! The plugin table.
//!
//! `PluginHost` owns every loaded plugin in display order together with
//! its current settings and timer. Hooks are relayed one plugin at a time;
//! a hook that fails is logged with the plugin and hook names and its
//! requests are dropped, and nothing else is affected.

mod timers;

#[cfg(test)]
mod tests;

pub use timers::TimerScheduler;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use brujo_common::{PluginError, Size};
use brujo_config::PluginSettingsStore;
use brujo_panel::{DockGeometry, LayoutEngine};
use brujo_platform::WindowEvent;
use brujo_renderer::{paint_dock, Canvas, DockStyle};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::context::{DockRequest, DockServices, PluginContext};
use crate::plugin::Plugin;

/// Builds a plugin by registration name. `None` for unknown names.
pub type PluginFactory = Box<dyn Fn(&str) -> Option<Box<dyn Plugin>>>;

struct Loaded {
    name: String,
    plugin: Box<dyn Plugin>,
    settings: Map<String, Value>,
    interval: Option<Duration>,
}

pub struct PluginHost {
    factory: PluginFactory,
    store: PluginSettingsStore,
    plugins: Vec<Loaded>,
    timers: TimerScheduler,
}

impl PluginHost {
    pub fn new(factory: PluginFactory, store: PluginSettingsStore) -> Self {
        Self {
            factory,
            store,
            plugins: Vec::new(),
            timers: TimerScheduler::new(),
        }
    }

    /// Create and initialize `names` in order. Unknown names, duplicates
    /// and plugins whose `on_init` fails are logged and left out.
    pub fn load(&mut self, names: &[&str], services: DockServices<'_>, now: Instant) -> Vec<DockRequest> {
        let mut requests = Vec::new();
        for &name in names {
            if self.contains(name) {
                warn!(plugin = %name, "plugin listed twice, ignoring the second entry");
                continue;
            }
            let Some(mut plugin) = (self.factory)(name) else {
                warn!(plugin = %name, "{}", PluginError::Unknown(name.to_string()));
                continue;
            };

            let settings = plugin.settings_form().merge_defaults(&self.store.load(name));
            let mut init_requests = Vec::new();
            let mut ctx = PluginContext::new(name, services, &mut init_requests);
            if let Err(e) = plugin.on_init(&mut ctx, &settings) {
                warn!(plugin = %name, hook = "on_init", "{e}; plugin not loaded");
                plugin.on_destroy();
                continue;
            }
            requests.extend(init_requests);

            let interval = plugin.tick_interval();
            if let Some(interval) = interval {
                self.timers.schedule(name, interval, now);
            }
            info!(plugin = %name, "plugin loaded");
            self.plugins.push(Loaded {
                name: name.to_string(),
                plugin,
                settings,
                interval,
            });
        }
        requests.push(DockRequest::Relayout);
        requests
    }

    /// Destroy every plugin and release its timers.
    pub fn unload_all(&mut self) {
        for mut loaded in self.plugins.drain(..) {
            loaded.plugin.on_destroy();
            let released = self.timers.cancel_owner(&loaded.name);
            debug!(plugin = %loaded.name, timers = released, "plugin unloaded");
        }
    }

    pub fn reload(&mut self, names: &[&str], services: DockServices<'_>, now: Instant) -> Vec<DockRequest> {
        info!("reloading plugins");
        self.unload_all();
        self.load(names, services, now)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.find(name).map(|p| p.plugin.description())
    }

    pub fn settings(&self, name: &str) -> Option<&Map<String, Value>> {
        self.find(name).map(|p| &p.settings)
    }

    pub fn timers(&self) -> &TimerScheduler {
        &self.timers
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Preferred size of every plugin, in display order.
    pub fn components(&self) -> Vec<(String, Size)> {
        self.plugins
            .iter()
            .map(|p| (p.name.clone(), p.plugin.preferred_size()))
            .collect()
    }

    pub fn geometry(&self, engine: &LayoutEngine) -> DockGeometry<String> {
        engine.compute(&self.components())
    }

    /// Paint a frame laid out by `geometry`. Returns the number of plugins
    /// whose draw failed.
    pub fn paint(&mut self, canvas: &mut dyn Canvas, style: &DockStyle, geometry: &DockGeometry<String>) -> usize {
        let plugins = &mut self.plugins;
        paint_dock(canvas, style, geometry, |canvas, slot| {
            let Some(loaded) = plugins.iter_mut().find(|p| p.name == slot.key) else {
                return Ok(());
            };
            loaded
                .plugin
                .on_draw(canvas, slot.rect.width, slot.rect.height)
                .map_err(|e| PluginError::HookFailed {
                    plugin: slot.key.clone(),
                    hook: "on_draw",
                    message: e.to_string(),
                })
        })
    }

    pub fn click(&mut self, name: &str, x: f64, y: f64, services: DockServices<'_>) -> Vec<DockRequest> {
        self.relay(name, "on_click", services, |p, ctx| p.on_click(ctx, x, y))
    }

    pub fn right_click(&mut self, name: &str, x: f64, y: f64, services: DockServices<'_>) -> Vec<DockRequest> {
        self.relay(name, "on_right_click", services, |p, ctx| p.on_right_click(ctx, x, y))
    }

    pub fn hover(&mut self, name: &str, x: f64, y: f64, services: DockServices<'_>) -> Vec<DockRequest> {
        self.relay(name, "on_hover", services, |p, ctx| p.on_hover(ctx, x, y))
    }

    pub fn leave(&mut self, name: &str, services: DockServices<'_>) -> Vec<DockRequest> {
        self.relay(name, "on_leave", services, |p, ctx| p.on_leave(ctx))
    }

    pub fn menu_action(&mut self, name: &str, action: &str, services: DockServices<'_>) -> Vec<DockRequest> {
        self.relay(name, "on_menu_action", services, |p, ctx| p.on_menu_action(ctx, action))
    }

    /// Forward a window-system event to every plugin.
    pub fn window_event(&mut self, event: WindowEvent, services: DockServices<'_>) -> Vec<DockRequest> {
        let names: Vec<String> = self.plugins.iter().map(|p| p.name.clone()).collect();
        names
            .iter()
            .flat_map(|name| {
                self.relay(name, "on_window_event", services, |p, ctx| p.on_window_event(ctx, event))
            })
            .collect()
    }

    /// Run the ticks that are due at `now`.
    pub fn tick(&mut self, now: Instant, services: DockServices<'_>) -> Vec<DockRequest> {
        let due = self.timers.due(now);
        due.iter()
            .flat_map(|name| self.relay(name, "on_tick", services, |p, ctx| p.on_tick(ctx)))
            .collect()
    }

    /// Validate `changes` against the plugin's form, persist the result
    /// and hand it to the plugin. Nothing is saved if validation fails.
    pub fn apply_settings(
        &mut self,
        name: &str,
        changes: &Map<String, Value>,
        services: DockServices<'_>,
        now: Instant,
    ) -> Result<Vec<DockRequest>, PluginError> {
        let loaded = self
            .plugins
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| PluginError::Unknown(name.to_string()))?;

        let updated = loaded.plugin.settings_form().apply(&loaded.settings, changes)?;
        self.store.save(name, &updated)?;

        let mut requests = Vec::new();
        let mut ctx = PluginContext::new(name, services, &mut requests);
        loaded
            .plugin
            .on_settings_changed(&mut ctx, &updated)
            .map_err(|e| PluginError::HookFailed {
                plugin: name.to_string(),
                hook: "on_settings_changed",
                message: e.to_string(),
            })?;
        loaded.settings = updated;

        let interval = loaded.plugin.tick_interval();
        if interval != loaded.interval {
            loaded.interval = interval;
            self.timers.cancel_owner(name);
            if let Some(interval) = interval {
                self.timers.schedule(name, interval, now);
            }
        }
        info!(plugin = %name, "settings applied");
        requests.push(DockRequest::Relayout);
        Ok(requests)
    }

    /// Path of the plugin's settings file, written with the current
    /// settings first if it does not exist yet.
    pub fn settings_file(&self, name: &str) -> Result<PathBuf, PluginError> {
        let loaded = self.find(name).ok_or_else(|| PluginError::Unknown(name.to_string()))?;
        let path = self.store.paths().plugin_file(name);
        if !path.exists() {
            self.store.save(name, &loaded.settings)?;
        }
        Ok(path)
    }

    fn find(&self, name: &str) -> Option<&Loaded> {
        self.plugins.iter().find(|p| p.name == name)
    }

    fn relay<F>(&mut self, name: &str, hook: &'static str, services: DockServices<'_>, call: F) -> Vec<DockRequest>
    where
        F: FnOnce(&mut dyn Plugin, &mut PluginContext<'_>) -> Result<(), PluginError>,
    {
        let Some(loaded) = self.plugins.iter_mut().find(|p| p.name == name) else {
            debug!(plugin = %name, hook, "no such plugin loaded");
            return Vec::new();
        };
        let mut requests = Vec::new();
        let mut ctx = PluginContext::new(name, services, &mut requests);
        match call(loaded.plugin.as_mut(), &mut ctx) {
            Ok(()) => requests,
            Err(e) => {
                warn!(plugin = %name, hook, "{e}");
                Vec::new()
            }
        }
    }
}

impl Drop for PluginHost {
    fn drop(&mut self) {
        self.unload_all();
    }
}
