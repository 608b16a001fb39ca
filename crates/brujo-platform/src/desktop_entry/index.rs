use std::path::{Path, PathBuf};

use tracing::debug;

use super::DesktopEntry;

/// Every application entry found in a set of directories.
///
/// Directories are given highest priority first; an entry whose file name
/// was already seen in an earlier directory is shadowed, the way the XDG
/// lookup treats user overrides.
#[derive(Debug, Clone, Default)]
pub struct DesktopIndex {
    entries: Vec<DesktopEntry>,
}

impl DesktopIndex {
    pub fn scan(dirs: &[PathBuf]) -> Self {
        let mut entries: Vec<DesktopEntry> = Vec::new();
        for dir in dirs {
            let Ok(read_dir) = std::fs::read_dir(dir) else {
                debug!("skipping missing application dir {}", dir.display());
                continue;
            };
            let mut paths: Vec<PathBuf> = read_dir
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|e| e == "desktop"))
                .collect();
            paths.sort();
            for path in paths {
                let shadowed = entries
                    .iter()
                    .any(|e| e.path.file_name() == path.file_name());
                if shadowed {
                    continue;
                }
                if let Some(entry) = DesktopEntry::load(&path) {
                    entries.push(entry);
                }
            }
        }
        debug!(count = entries.len(), "desktop entries indexed");
        Self { entries }
    }

    pub fn from_entries(entries: Vec<DesktopEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DesktopEntry] {
        &self.entries
    }

    pub fn by_path(&self, path: &Path) -> Option<&DesktopEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// First entry `matches` accepts, in priority order.
    pub fn find(&self, matches: impl Fn(&DesktopEntry) -> bool) -> Option<&DesktopEntry> {
        self.entries.iter().find(|e| matches(e))
    }
}
