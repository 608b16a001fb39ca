//! Fixed launcher button at the start of the dock.

use brujo_common::{Color, PluginError, Size};
use brujo_config::{FormField, SettingsForm};
use brujo_renderer::{Canvas, MenuEntry};
use serde_json::{Map, Value};
use tracing::info;

use crate::builtin::settings::text;
use crate::context::PluginContext;
use crate::plugin::Plugin;

const SIZE: Size = Size::new(40, 32);
const FACE: Color = Color::from_rgba(255, 255, 255, 200);
const DOT: f32 = 3.0;

#[derive(Debug, Default)]
pub struct AppsMenu {
    command: String,
}

impl AppsMenu {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Plugin for AppsMenu {
    fn name(&self) -> &str {
        "apps_menu"
    }

    fn description(&self) -> &str {
        "Applications menu"
    }

    fn settings_form(&self) -> SettingsForm {
        SettingsForm::new(vec![FormField::entry("command", "Command", "")])
    }

    fn on_init(&mut self, _ctx: &mut PluginContext<'_>, settings: &Map<String, Value>) -> Result<(), PluginError> {
        self.command = text(settings, "command", "").trim().to_string();
        Ok(())
    }

    fn preferred_size(&self) -> Size {
        SIZE
    }

    /// A 3x3 grid of dots.
    fn on_draw(&mut self, canvas: &mut dyn Canvas, width: i32, height: i32) -> Result<(), PluginError> {
        let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
        let step = DOT * 3.0;
        for row in -1..=1 {
            for col in -1..=1 {
                canvas.fill_circle(cx + col as f32 * step, cy + row as f32 * step, DOT, FACE);
            }
        }
        Ok(())
    }

    fn on_click(&mut self, ctx: &mut PluginContext<'_>, _x: f64, _y: f64) -> Result<(), PluginError> {
        if self.command.is_empty() {
            info!("apps menu has no command configured");
        } else {
            ctx.launch(self.command.clone());
        }
        Ok(())
    }

    fn on_right_click(&mut self, ctx: &mut PluginContext<'_>, x: f64, _y: f64) -> Result<(), PluginError> {
        ctx.show_menu(vec![MenuEntry::item(ctx.tr("Settings"), "settings")], x);
        Ok(())
    }

    fn on_settings_changed(
        &mut self,
        ctx: &mut PluginContext<'_>,
        settings: &Map<String, Value>,
    ) -> Result<(), PluginError> {
        self.on_init(ctx, settings)
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
    use brujo_config::Translator;
    use brujo_platform::NoopWindowSystem;
    use brujo_renderer::RecordingCanvas;
    use serde_json::json;

    use super::*;
    use crate::context::{DockRequest, DockServices};

    fn run<F>(menu: &mut AppsMenu, f: F) -> Vec<DockRequest>
    where
        F: FnOnce(&mut AppsMenu, &mut PluginContext<'_>) -> Result<(), PluginError>,
    {
        let windows = NoopWindowSystem;
        let translator = Translator::identity();
        let mut requests = Vec::new();
        let mut ctx = PluginContext::new("apps_menu", DockServices::new(&windows, &translator), &mut requests);
        f(menu, &mut ctx).unwrap();
        requests
    }

    fn configured(settings: Value) -> AppsMenu {
        let mut menu = AppsMenu::new();
        let settings = menu.settings_form().merge_defaults(settings.as_object().unwrap());
        run(&mut menu, |m, ctx| m.on_init(ctx, &settings));
        menu
    }

    #[test]
    fn fixed_slot_with_dot_grid() {
        let mut menu = configured(json!({}));
        assert_eq!(menu.preferred_size(), Size::new(40, 32));

        let mut canvas = RecordingCanvas::new();
        menu.on_draw(&mut canvas, 40, 32).unwrap();
        assert_eq!(canvas.circles(), 9);
    }

    #[test]
    fn click_without_command_does_nothing() {
        let mut menu = configured(json!({}));
        assert!(run(&mut menu, |m, ctx| m.on_click(ctx, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn click_launches_configured_command() {
        let mut menu = configured(json!({"command": " rofi -show drun "}));
        assert_eq!(
            run(&mut menu, |m, ctx| m.on_click(ctx, 5.0, 5.0)),
            [DockRequest::Launch("rofi -show drun".into())]
        );
    }

    #[test]
    fn settings_change_replaces_command() {
        let mut menu = configured(json!({}));
        let settings = json!({"command": "xterm"});
        run(&mut menu, |m, ctx| m.on_settings_changed(ctx, settings.as_object().unwrap()));
        assert_eq!(
            run(&mut menu, |m, ctx| m.on_click(ctx, 0.0, 0.0)),
            [DockRequest::Launch("xterm".into())]
        );
    }
}
