//! Translation tables.
//!
//! Each locale directory holds `<lang>.json` files mapping source strings
//! to translations, plus the reserved keys `_lang_name` and
//! `_lang_name_eng`. Directories are merged in order, later ones
//! overriding earlier ones, and a directory without the requested language
//! contributes its `en.json` instead.

mod detect;


pub use detect::detect_language;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::loader::ConfigPaths;

const FALLBACK_LANG: &str = "en";

/// One entry of [`available_languages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub code: String,
    pub native: String,
    pub english: String,
}

#[derive(Debug, Clone, Default)]
pub struct Translator {
    lang: String,
    table: HashMap<String, String>,
}

impl Translator {
    /// A translator that returns every string unchanged.
    pub fn identity() -> Self {
        Self {
            lang: FALLBACK_LANG.into(),
            table: HashMap::new(),
        }
    }

    pub fn from_map(lang: &str, table: HashMap<String, String>) -> Self {
        Self {
            lang: lang.into(),
            table,
        }
    }

    pub fn load(lang: &str, dirs: &[PathBuf]) -> Self {
        let mut table = HashMap::new();
        for dir in dirs {
            if let Some(entries) = read_locale(dir, lang) {
                table.extend(entries);
            }
        }
        info!(lang, entries = table.len(), "translations loaded");
        Self {
            lang: lang.into(),
            table,
        }
    }

    /// Translate `text`, returning it unchanged when no entry exists.
    pub fn tr<'a>(&'a self, text: &'a str) -> &'a str {
        self.table.get(text).map(String::as_str).unwrap_or(text)
    }

    pub fn current_lang(&self) -> &str {
        &self.lang
    }

    pub fn lang_name(&self) -> &str {
        self.table
            .get("_lang_name")
            .map(String::as_str)
            .unwrap_or("English")
    }

    pub fn lang_name_eng(&self) -> &str {
        self.table
            .get("_lang_name_eng")
            .map(String::as_str)
            .unwrap_or("English")
    }
}

fn read_locale(dir: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let mut path = dir.join(format!("{lang}.json"));
    if !path.exists() {
        debug!("no {lang}.json in {}, using {FALLBACK_LANG}.json", dir.display());
        path = dir.join(format!("{FALLBACK_LANG}.json"));
    }
    let content = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<HashMap<String, String>>(&content) {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!("failed to parse {}: {e}", path.display());
            None
        }
    }
}

/// Languages with a file in `dir`, sorted by native name.
pub fn available_languages(dir: &Path) -> Vec<LanguageInfo> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut languages: Vec<LanguageInfo> = read_dir
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension()? != "json" {
                return None;
            }
            let code = path.file_stem()?.to_str()?.to_string();
            let data: HashMap<String, String> = std::fs::read_to_string(&path)
                .ok()
                .and_then(|c| serde_json::from_str(&c).ok())
                .unwrap_or_default();
            Some(LanguageInfo {
                native: data.get("_lang_name").cloned().unwrap_or_else(|| code.clone()),
                english: data
                    .get("_lang_name_eng")
                    .cloned()
                    .unwrap_or_else(|| code.clone()),
                code,
            })
        })
        .collect();
    languages.sort_by(|a, b| a.native.cmp(&b.native));
    languages
}

/// Locale directories to merge, lowest priority first: the installed
/// share directory, the source tree (for running from a checkout), then
/// the user's own overrides under the config root.
pub fn default_locale_dirs(config_root: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let share = PathBuf::from("/usr/share/brujo-dock/locales");
    if share.is_dir() {
        dirs.push(share);
    }
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../locales");
    if source.is_dir() {
        dirs.push(source);
    }
    dirs.push(ConfigPaths::new(config_root).locales_dir());
    dirs
}
