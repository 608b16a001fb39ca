//! Per-plugin settings files under `plugins/<name>.json`.

use brujo_common::ConfigError;
use serde_json::{Map, Value};
use tracing::warn;

use crate::loader::ConfigPaths;
use crate::writer::save_json_atomic;

/// Reads and writes the free-form settings object of each plugin.
#[derive(Debug, Clone)]
pub struct PluginSettingsStore {
    paths: ConfigPaths,
}

impl PluginSettingsStore {
    pub fn new(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// The stored object for `plugin`, or an empty map if the file is
    /// missing or is not a JSON object.
    pub fn load(&self, plugin: &str) -> Map<String, Value> {
        let path = self.paths.plugin_file(plugin);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(plugin, "failed to read {}: {e}", path.display());
                }
                return Map::new();
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!(plugin, "{} is not a JSON object, ignoring", path.display());
                Map::new()
            }
            Err(e) => {
                warn!(plugin, "ignoring malformed {}: {e}", path.display());
                Map::new()
            }
        }
    }

    pub fn save(&self, plugin: &str, settings: &Map<String, Value>) -> Result<(), ConfigError> {
        save_json_atomic(settings, &self.paths.plugin_file(plugin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> PluginSettingsStore {
        PluginSettingsStore::new(ConfigPaths::new(dir.path()))
    }

    #[test]
    fn missing_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load("clock").is_empty());
    }

    #[test]
    fn non_object_is_empty() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::create_dir_all(s.paths().plugins_dir()).unwrap();
        std::fs::write(s.paths().plugin_file("clock"), "[1, 2]").unwrap();
        assert!(s.load("clock").is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let mut map = Map::new();
        map.insert("icon_size".into(), json!(48));
        map.insert("hint_mode".into(), json!(2));
        s.save("icon_panel", &map).unwrap();

        let loaded = s.load("icon_panel");
        assert_eq!(loaded.get("icon_size"), Some(&json!(48)));
        assert_eq!(loaded, map);
    }
}
