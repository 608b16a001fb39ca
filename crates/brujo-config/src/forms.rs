//! Declarative settings forms.
//!
//! A plugin describes its settings as a list of [`FormField`]s. The form
//! supplies defaults for missing keys and coerces user input into the
//! stored JSON shape: spins become clamped integers, switches booleans,
//! entries strings, and text areas a list of non-empty lines.

use brujo_common::ConfigError;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Spin { min: i64, max: i64 },
    Switch,
    Entry,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub key: String,
    /// Untranslated label; the UI passes it through the translator.
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub default: Value,
}

impl FormField {
    pub fn spin(key: &str, label: &str, min: i64, max: i64, default: i64) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Spin { min, max },
            default: Value::from(default.clamp(min, max)),
        }
    }

    pub fn switch(key: &str, label: &str, default: bool) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Switch,
            default: Value::from(default),
        }
    }

    pub fn entry(key: &str, label: &str, default: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Entry,
            default: Value::from(default),
        }
    }

    pub fn text(key: &str, label: &str, default: &[&str]) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Text,
            default: Value::from(default.to_vec()),
        }
    }

    /// Coerce `input` into this field's stored shape.
    pub fn coerce(&self, input: &Value) -> Result<Value, ConfigError> {
        let bad = |what: &str| {
            ConfigError::ValidationError(format!("{}: expected {what}, got {input}", self.key))
        };
        match &self.kind {
            FieldKind::Spin { min, max } => {
                let n = match input {
                    Value::Number(n) => n
                        .as_i64()
                        .or_else(|| n.as_f64().map(|f| f.round() as i64))
                        .ok_or_else(|| bad("an integer"))?,
                    Value::String(s) => s.trim().parse::<i64>().map_err(|_| bad("an integer"))?,
                    _ => return Err(bad("an integer")),
                };
                Ok(Value::from(n.clamp(*min, *max)))
            }
            FieldKind::Switch => match input {
                Value::Bool(b) => Ok(Value::from(*b)),
                Value::Number(n) => Ok(Value::from(n.as_i64().unwrap_or(0) != 0)),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => Ok(Value::from(true)),
                    "false" | "off" | "no" | "0" => Ok(Value::from(false)),
                    _ => Err(bad("a boolean")),
                },
                _ => Err(bad("a boolean")),
            },
            FieldKind::Entry => match input {
                Value::String(s) => Ok(Value::from(s.as_str())),
                Value::Number(_) | Value::Bool(_) => Ok(Value::from(input.to_string())),
                _ => Err(bad("a string")),
            },
            FieldKind::Text => match input {
                Value::String(s) => Ok(Value::from(split_lines(s))),
                Value::Array(items) => {
                    let mut lines = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::String(s) => lines.extend(split_lines(s)),
                            _ => return Err(bad("a list of strings")),
                        }
                    }
                    Ok(Value::from(lines))
                }
                _ => Err(bad("text")),
            },
        }
    }
}

fn split_lines(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// The settings form a plugin declares.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsForm {
    pub fields: Vec<FormField>,
}

impl SettingsForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn defaults(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.key.clone(), f.default.clone()))
            .collect()
    }

    /// Fill keys missing from `stored` with defaults and coerce the ones
    /// present. Values that cannot be coerced fall back to the default.
    pub fn merge_defaults(&self, stored: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = stored.clone();
        for field in &self.fields {
            let value = match stored.get(&field.key) {
                Some(v) => field.coerce(v).unwrap_or_else(|e| {
                    tracing::debug!("{e}; using default");
                    field.default.clone()
                }),
                None => field.default.clone(),
            };
            merged.insert(field.key.clone(), value);
        }
        merged
    }

    /// Apply user `changes` on top of `base`.
    ///
    /// Keys the form declares are coerced; any failure rejects the whole
    /// change set. Keys it does not declare pass through unchanged.
    pub fn apply(
        &self,
        base: &Map<String, Value>,
        changes: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ConfigError> {
        let mut out = base.clone();
        let mut errors = Vec::new();
        for (key, value) in changes {
            match self.field(key) {
                Some(field) => match field.coerce(value) {
                    Ok(v) => {
                        out.insert(key.clone(), v);
                    }
                    Err(e) => errors.push(e.to_string()),
                },
                None => {
                    out.insert(key.clone(), value.clone());
                }
            }
        }
        if errors.is_empty() {
            Ok(out)
        } else {
            Err(ConfigError::ValidationError(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clock_form() -> SettingsForm {
        SettingsForm::new(vec![
            FormField::entry("time_format", "Time Format", "%-I:%M:%S %p"),
            FormField::spin("font_size", "Font Size", 8, 48, 10),
            FormField::switch("show_date", "Show Date", true),
            FormField::text("timezones", "Timezones\n(one per line)", &["UTC"]),
        ])
    }

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn defaults_cover_every_field() {
        let d = clock_form().defaults();
        assert_eq!(d["time_format"], json!("%-I:%M:%S %p"));
        assert_eq!(d["font_size"], json!(10));
        assert_eq!(d["show_date"], json!(true));
        assert_eq!(d["timezones"], json!(["UTC"]));
    }

    #[test]
    fn spin_default_is_clamped() {
        let f = FormField::spin("x", "X", 0, 5, 99);
        assert_eq!(f.default, json!(5));
    }

    #[test]
    fn spin_clamps_and_parses_strings() {
        let f = FormField::spin("font_size", "Font Size", 8, 48, 10);
        assert_eq!(f.coerce(&json!(100)).unwrap(), json!(48));
        assert_eq!(f.coerce(&json!(" 12 ")).unwrap(), json!(12));
        assert_eq!(f.coerce(&json!(12.6)).unwrap(), json!(13));
        assert!(f.coerce(&json!("big")).is_err());
    }

    #[test]
    fn switch_accepts_common_spellings() {
        let f = FormField::switch("s", "S", false);
        assert_eq!(f.coerce(&json!("on")).unwrap(), json!(true));
        assert_eq!(f.coerce(&json!(0)).unwrap(), json!(false));
        assert!(f.coerce(&json!([true])).is_err());
    }

    #[test]
    fn text_splits_lines_and_drops_blanks() {
        let f = FormField::text("tz", "TZ", &[]);
        assert_eq!(
            f.coerce(&json!("UTC\n\n  UTC+3  \n")).unwrap(),
            json!(["UTC", "UTC+3"])
        );
        assert_eq!(f.coerce(&json!(["a", "b\nc"])).unwrap(), json!(["a", "b", "c"]));
    }

    #[test]
    fn merge_defaults_keeps_unknown_and_repairs_bad() {
        let stored = obj(json!({"font_size": "huge", "font_face": "Mono"}));
        let merged = clock_form().merge_defaults(&stored);
        assert_eq!(merged["font_size"], json!(10));
        assert_eq!(merged["font_face"], json!("Mono"));
        assert_eq!(merged["show_date"], json!(true));
    }

    #[test]
    fn apply_coerces_declared_keys() {
        let form = clock_form();
        let base = form.defaults();
        let out = form
            .apply(&base, &obj(json!({"font_size": 200, "extra": 1})))
            .unwrap();
        assert_eq!(out["font_size"], json!(48));
        assert_eq!(out["extra"], json!(1));
        assert_eq!(out["time_format"], base["time_format"]);
    }

    #[test]
    fn apply_rejects_whole_change_set_on_error() {
        let form = clock_form();
        let err = form
            .apply(&form.defaults(), &obj(json!({"font_size": {}, "show_date": "maybe"})))
            .unwrap_err()
            .to_string();
        assert!(err.contains("font_size"));
        assert!(err.contains("show_date"));
    }
}
