//! Language detection from the process environment.

use super::LanguageInfo;

/// Pick a language from `LC_ALL`, `LC_MESSAGES`, then `LANG`, keeping it
/// only if a translation exists for it. Falls back to `en`.
pub fn detect_language(available: &[LanguageInfo]) -> String {
    let env_value = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty());
    language_from_locale(env_value.as_deref(), available)
}

pub(crate) fn language_from_locale(locale: Option<&str>, available: &[LanguageInfo]) -> String {
    locale
        .and_then(|l| l.split(['_', '.', '@']).next())
        .map(str::to_ascii_lowercase)
        .filter(|lang| available.iter().any(|info| info.code == *lang))
        .unwrap_or_else(|| super::FALLBACK_LANG.to_string())
}
