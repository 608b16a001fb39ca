//! Plugins shipped with the dock.

pub mod apps_menu;
pub mod battery;
pub mod clock;
pub mod icon_panel;
pub mod settings;
pub mod sysmon;

use std::path::PathBuf;

use brujo_config::ConfigPaths;
use brujo_platform::{application_dirs, icon_theme_dirs, pixmap_dirs, ProcReader};
use brujo_renderer::{Fonts, IconTheme};

use crate::host::PluginFactory;
use crate::plugin::Plugin;

pub use apps_menu::AppsMenu;
pub use battery::BatteryStatusPlugin;
pub use clock::Clock;
pub use icon_panel::IconPanel;
pub use sysmon::Sysmon;

/// Registration names of every built-in plugin.
pub const BUILTIN_PLUGINS: [&str; 5] = ["icon_panel", "clock", "battery_status", "sysmon", "apps_menu"];

/// Everything the built-in plugins read from the host system.
#[derive(Debug, Clone)]
pub struct BuiltinEnv {
    pub fonts: Fonts,
    pub icon_theme: IconTheme,
    pub proc: ProcReader,
    /// Windows of this process never get an icon.
    pub own_pid: u32,
    pub application_dirs: Vec<PathBuf>,
    pub pinned_file: PathBuf,
    pub power_supply: PathBuf,
}

impl BuiltinEnv {
    /// The live system: XDG directories, `/proc` and sysfs.
    pub fn system(paths: &ConfigPaths, fonts: Fonts) -> Self {
        Self {
            fonts,
            icon_theme: IconTheme::new(icon_theme_dirs(), pixmap_dirs()),
            proc: ProcReader::default(),
            own_pid: std::process::id(),
            application_dirs: application_dirs(),
            pinned_file: paths.pinned_file(),
            power_supply: PathBuf::from(brujo_platform::battery::POWER_SUPPLY_DIR),
        }
    }

    pub fn factory(self) -> PluginFactory {
        Box::new(move |name: &str| create_builtin(name, &self))
    }
}

/// Build the built-in plugin registered as `name`.
pub fn create_builtin(name: &str, env: &BuiltinEnv) -> Option<Box<dyn Plugin>> {
    let plugin: Box<dyn Plugin> = match name {
        "icon_panel" => Box::new(IconPanel::new(env)),
        "clock" => Box::new(Clock::new(env.fonts.clone())),
        "battery_status" => Box::new(BatteryStatusPlugin::new(env.fonts.clone(), env.power_supply.clone())),
        "sysmon" => Box::new(Sysmon::new(env.fonts.clone())),
        "apps_menu" => Box::new(AppsMenu::new()),
        _ => return None,
    };
    Some(plugin)
}
