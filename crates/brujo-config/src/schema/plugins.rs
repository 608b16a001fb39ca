//! The ordered `plugins` table.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-plugin switch inside `core.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginEntry {
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PluginEntry {
    fn default() -> Self {
        Self {
            enabled: true,
            extra: Map::new(),
        }
    }
}

impl PluginEntry {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }
}

/// Plugin name → entry, in display order.
///
/// Backed by a `Vec` so the JSON object order is the dock's left-to-right
/// order, and serialized as a plain JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginTable(Vec<(String, PluginEntry)>);

impl Default for PluginTable {
    fn default() -> Self {
        Self(
            ["icon_panel", "sysmon", "battery_status", "clock"]
                .into_iter()
                .map(|name| (name.to_string(), PluginEntry::default()))
                .collect(),
        )
    }
}

impl PluginTable {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, PluginEntry)> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&PluginEntry> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    /// Insert or replace; a new name goes to the end.
    pub fn insert(&mut self, name: impl Into<String>, entry: PluginEntry) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = entry,
            None => self.0.push((name, entry)),
        }
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, entry)) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }
}

impl Serialize for PluginTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PluginTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let entry = PluginEntry::deserialize(value).map_err(serde::de::Error::custom)?;
            entries.push((name, entry));
        }
        Ok(Self(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_preserved_through_json() {
        let json = r#"{"clock": {"enabled": true}, "icon_panel": {"enabled": false}, "sysmon": {}}"#;
        let table: PluginTable = serde_json::from_str(json).unwrap();
        let names: Vec<_> = table.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["clock", "icon_panel", "sysmon"]);

        let out = serde_json::to_string(&table).unwrap();
        let clock = out.find("clock").unwrap();
        let icon = out.find("icon_panel").unwrap();
        let sysmon = out.find("sysmon").unwrap();
        assert!(clock < icon && icon < sysmon);
    }

    #[test]
    fn missing_enabled_defaults_to_true() {
        let table: PluginTable = serde_json::from_str(r#"{"clock": {}}"#).unwrap();
        assert!(table.get("clock").unwrap().enabled);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut table = PluginTable::default();
        table.insert("sysmon", PluginEntry::enabled(false));
        table.insert("apps_menu", PluginEntry::default());
        let names: Vec<_> = table.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["icon_panel", "sysmon", "battery_status", "clock", "apps_menu"]
        );
        assert!(!table.get("sysmon").unwrap().enabled);
    }

    #[test]
    fn set_enabled_unknown_returns_false() {
        let mut table = PluginTable::empty();
        assert!(!table.set_enabled("clock", true));
        assert!(table.is_empty());
    }
}
