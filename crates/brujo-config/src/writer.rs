//! Write settings documents to disk.
//!
//! All writes are atomic (write to `.tmp`, then rename) so a crash
//! mid-write never leaves a truncated JSON file behind.

use std::path::Path;

use brujo_common::ConfigError;
use serde::Serialize;

use crate::loader::ConfigPaths;
use crate::schema::DockSettings;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Write `core.json` under `paths`.
pub fn save_settings(settings: &DockSettings, paths: &ConfigPaths) -> Result<(), ConfigError> {
    save_json_atomic(settings, &paths.core_file())
}

/// Pretty-print `value` as JSON and write it to `path`.
///
/// Creates parent directories if they don't exist.
pub fn save_json_atomic<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), ConfigError> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| ConfigError::WriteError(format!("failed to serialize: {e}")))?;
    json.push('\n');

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::WriteError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json).map_err(|e| {
        ConfigError::WriteError(format!("failed to write {}: {e}", tmp_path.display()))
    })?;

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(ConfigError::WriteError(format!(
            "failed to replace {}: {e}",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), "settings saved to disk");
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
