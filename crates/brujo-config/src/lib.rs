//! BrujoDock configuration system.
//!
//! Settings are JSON documents under the XDG config directory. Every field
//! has a default, so a partial `core.json` works, and keys this version does
//! not know about are carried through a load/save round trip untouched.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use brujo_config::{load_settings, ConfigPaths};
//!
//! let paths = ConfigPaths::default_location().expect("no config dir");
//! let settings = load_settings(&paths);
//! println!("dock height floor: {}", settings.default_height);
//! ```

pub mod forms;
pub mod i18n;
pub mod loader;
pub mod pinned;
pub mod plugin_store;
pub mod schema;
pub mod validation;
pub mod writer;

pub use forms::{FieldKind, FormField, SettingsForm};
pub use i18n::{available_languages, default_locale_dirs, detect_language, LanguageInfo, Translator};
pub use loader::{load_from_path, load_or_create, ConfigPaths};
pub use pinned::PinnedApps;
pub use plugin_store::PluginSettingsStore;
pub use schema::{DockSettings, LogMode, PluginEntry, PluginTable};
pub use writer::{save_json_atomic, save_settings};

use brujo_common::ConfigError;

/// Load `core.json` from `paths`, creating it with defaults if missing,
/// and hand back the problems found instead of logging them.
///
/// An unreadable file yields the defaults and its load error. Settings that
/// parsed but fail validation are kept and the validation error is listed.
pub fn read_settings(paths: &ConfigPaths) -> (DockSettings, Vec<ConfigError>) {
    let mut problems = Vec::new();
    let mut settings = match load_or_create(paths) {
        Ok(settings) => {
            if let Err(e) = validation::validate(&settings) {
                problems.push(e);
            }
            settings
        }
        Err(e) => {
            problems.push(e);
            DockSettings::default()
        }
    };
    settings.clamp_corner_radius();
    (settings, problems)
}

/// [`read_settings`], with every problem logged as a warning.
///
/// Never fails, because the dock has no useful way to run without settings.
pub fn load_settings(paths: &ConfigPaths) -> DockSettings {
    let (settings, problems) = read_settings(paths);
    for problem in problems {
        tracing::warn!("settings: {problem}");
    }
    settings
}
