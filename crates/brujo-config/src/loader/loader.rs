//! Core JSON config loading.

use crate::schema::DockSettings;
use crate::writer::save_settings;
use brujo_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::ConfigPaths;

/// Load settings from a specific JSON file.
///
/// Missing fields take their defaults. Values are returned as parsed,
/// out-of-range ones included.
pub fn load_from_path(path: &Path) -> Result<DockSettings, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let settings: DockSettings = serde_json::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse {}: {e}", path.display())))?;

    info!("loaded config from {}", path.display());
    Ok(settings)
}

/// Load `core.json`, writing a default one first if it does not exist.
pub fn load_or_create(paths: &ConfigPaths) -> Result<DockSettings, ConfigError> {
    let path = paths.core_file();
    match load_from_path(&path) {
        Ok(settings) => Ok(settings),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            let settings = DockSettings::default();
            save_settings(&settings, paths)?;
            Ok(settings)
        }
        Err(e) => Err(e),
    }
}
