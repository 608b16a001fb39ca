//! Typed reads from a coerced settings object.
//!
//! The host has already merged defaults and coerced every declared key,
//! so these only guard against hand-edited files that slipped through.

use serde_json::{Map, Value};

pub fn int(settings: &Map<String, Value>, key: &str, default: i64) -> i64 {
    settings.get(key).and_then(Value::as_i64).unwrap_or(default)
}

pub fn text(settings: &Map<String, Value>, key: &str, default: &str) -> String {
    settings
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

pub fn flag(settings: &Map<String, Value>, key: &str, default: bool) -> bool {
    settings.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// A `text` field: one entry per line.
pub fn lines(settings: &Map<String, Value>, key: &str) -> Vec<String> {
    match settings.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => s.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_fall_back_on_wrong_types() {
        let settings = json!({"size": "big", "on": true, "tz": ["UTC", 3], "label": "CPU"});
        let settings = settings.as_object().unwrap();

        assert_eq!(int(settings, "size", 10), 10);
        assert!(flag(settings, "on", false));
        assert_eq!(lines(settings, "tz"), ["UTC"]);
        assert_eq!(text(settings, "label", "x"), "CPU");
        assert_eq!(text(settings, "missing", "x"), "x");
    }
}
