use std::time::Duration;

use brujo_common::{PluginError, Size};
use brujo_config::SettingsForm;
use brujo_platform::WindowEvent;
use brujo_renderer::Canvas;
use serde_json::{Map, Value};

use crate::context::PluginContext;

/// A component living in one dock slot.
///
/// Only [`preferred_size`](Plugin::preferred_size) and
/// [`on_draw`](Plugin::on_draw) are mandatory. Coordinates passed to the
/// input hooks are local to the plugin's slot.
pub trait Plugin {
    /// Registration name, also the settings file stem.
    fn name(&self) -> &str;

    /// Untranslated one-line description shown in the dock menu.
    fn description(&self) -> &str;

    fn settings_form(&self) -> SettingsForm {
        SettingsForm::default()
    }

    /// Called once with the stored settings merged over the form defaults.
    fn on_init(
        &mut self,
        _ctx: &mut PluginContext<'_>,
        _settings: &Map<String, Value>,
    ) -> Result<(), PluginError> {
        Ok(())
    }

    /// Release everything the plugin holds. Timers are released by the host.
    fn on_destroy(&mut self) {}

    fn preferred_size(&self) -> Size;

    fn on_draw(&mut self, canvas: &mut dyn Canvas, width: i32, height: i32) -> Result<(), PluginError>;

    fn on_click(&mut self, _ctx: &mut PluginContext<'_>, _x: f64, _y: f64) -> Result<(), PluginError> {
        Ok(())
    }

    fn on_right_click(
        &mut self,
        _ctx: &mut PluginContext<'_>,
        _x: f64,
        _y: f64,
    ) -> Result<(), PluginError> {
        Ok(())
    }

    fn on_hover(&mut self, _ctx: &mut PluginContext<'_>, _x: f64, _y: f64) -> Result<(), PluginError> {
        Ok(())
    }

    fn on_leave(&mut self, _ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        Ok(())
    }

    /// How often [`on_tick`](Plugin::on_tick) runs. `None` means never.
    fn tick_interval(&self) -> Option<Duration> {
        None
    }

    fn on_tick(&mut self, _ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        Ok(())
    }

    /// The full, already coerced settings object after a change.
    fn on_settings_changed(
        &mut self,
        _ctx: &mut PluginContext<'_>,
        _settings: &Map<String, Value>,
    ) -> Result<(), PluginError> {
        Ok(())
    }

    fn on_window_event(
        &mut self,
        _ctx: &mut PluginContext<'_>,
        _event: WindowEvent,
    ) -> Result<(), PluginError> {
        Ok(())
    }

    /// An entry of a menu this plugin opened was chosen.
    fn on_menu_action(&mut self, _ctx: &mut PluginContext<'_>, _action: &str) -> Result<(), PluginError> {
        Ok(())
    }
}
