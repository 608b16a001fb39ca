//! Pinned launcher list (`pinned.json`).

use std::path::{Path, PathBuf};

use brujo_common::ConfigError;
use tracing::warn;

use crate::writer::save_json_atomic;

/// Desktop-entry paths the user keeps on the dock, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedApps {
    entries: Vec<PathBuf>,
}

impl Default for PinnedApps {
    fn default() -> Self {
        Self {
            entries: vec![
                PathBuf::from("/usr/share/applications/vivaldi-stable.desktop"),
                PathBuf::from("/usr/share/applications/org.gnome.Terminal.desktop"),
            ],
        }
    }
}

impl PinnedApps {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        let mut pinned = Self { entries: Vec::new() };
        for entry in entries {
            pinned.add(entry);
        }
        pinned
    }

    /// Read `path`. A missing file yields the default list, and an
    /// unreadable one yields an empty list.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("failed to read {}: {e}", path.display());
                return Self::new(Vec::new());
            }
        };
        match serde_json::from_str::<Vec<PathBuf>>(&content) {
            Ok(entries) => Self::new(entries),
            Err(e) => {
                warn!("ignoring malformed {}: {e}", path.display());
                Self::new(Vec::new())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_json_atomic(&self.entries, path)
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|p| p == path)
    }

    /// Append `path` unless already pinned. Returns whether it was added.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }
        self.entries.push(path);
        true
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.entries.len();
        self.entries.retain(|p| p != path);
        self.entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let pinned = PinnedApps::load(&dir.path().join("pinned.json"));
        assert_eq!(pinned, PinnedApps::default());
        assert_eq!(pinned.entries().len(), 2);
    }

    #[test]
    fn malformed_file_gives_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pinned.json");
        std::fs::write(&path, "{\"a\": 1}").unwrap();
        assert!(PinnedApps::load(&path).entries().is_empty());
    }

    #[test]
    fn add_is_idempotent_and_ordered() {
        let mut pinned = PinnedApps::new(vec![]);
        assert!(pinned.add("/a.desktop"));
        assert!(pinned.add("/b.desktop"));
        assert!(!pinned.add("/a.desktop"));
        assert_eq!(
            pinned.entries(),
            &[PathBuf::from("/a.desktop"), PathBuf::from("/b.desktop")]
        );
    }

    #[test]
    fn new_drops_duplicates() {
        let pinned = PinnedApps::new(vec!["/a".into(), "/a".into(), "/b".into()]);
        assert_eq!(pinned.entries().len(), 2);
    }

    #[test]
    fn remove_reports_change() {
        let mut pinned = PinnedApps::new(vec!["/a".into()]);
        assert!(!pinned.remove(Path::new("/b")));
        assert!(pinned.remove(Path::new("/a")));
        assert!(pinned.entries().is_empty());
    }

    #[test]
    fn save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pinned.json");
        let mut pinned = PinnedApps::new(vec![]);
        pinned.add("/usr/share/applications/firefox.desktop");
        pinned.save(&path).unwrap();

        let loaded = PinnedApps::load(&path);
        assert!(loaded.contains(Path::new("/usr/share/applications/firefox.desktop")));
        assert_eq!(loaded.entries().len(), 1);
    }
}
