//! Desktop entry (`.desktop`) files.
//!
//! Only the `[Desktop Entry]` group is read, and only the keys the dock
//! uses. Localized keys (`Name[de]=`) are ignored in favour of the plain
//! ones.

mod index;
mod parse;

#[cfg(test)]
mod tests;

pub use index::DesktopIndex;
pub use parse::strip_field_codes;

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DesktopEntry {
    pub path: PathBuf,
    pub name: String,
    pub icon: Option<String>,
    /// Raw `Exec` line, field codes included.
    pub exec: Option<String>,
    pub startup_wm_class: Option<String>,
    pub no_display: bool,
    pub hidden: bool,
}

impl DesktopEntry {
    /// Read and parse `path`. Returns `None` for unreadable files and for
    /// entries whose `Type` is not `Application`.
    pub fn load(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        parse::parse(path, &content)
    }

    /// File name without the `.desktop` suffix.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// `Exec` with field codes removed, ready to run.
    pub fn command(&self) -> Option<String> {
        self.exec
            .as_deref()
            .map(strip_field_codes)
            .filter(|c| !c.is_empty())
    }

    /// The raw class this entry claims: `StartupWMClass`, else the stem.
    pub fn class_hint(&self) -> &str {
        self.startup_wm_class
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.stem())
    }

    pub fn is_visible(&self) -> bool {
        !self.no_display && !self.hidden
    }
}
