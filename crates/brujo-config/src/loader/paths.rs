//! Config path resolution.

use brujo_common::ConfigError;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "brujo-dock";

/// Locations of every file the dock reads or writes under its config root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    root: PathBuf,
}

impl ConfigPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$XDG_CONFIG_HOME/brujo-dock` (usually `~/.config/brujo-dock`).
    pub fn default_location() -> Result<Self, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
        Ok(Self::new(config_dir.join(APP_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn core_file(&self) -> PathBuf {
        self.root.join("core.json")
    }

    pub fn pinned_file(&self) -> PathBuf {
        self.root.join("pinned.json")
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.root.join("plugins")
    }

    pub fn plugin_file(&self, name: &str) -> PathBuf {
        self.plugins_dir().join(format!("{name}.json"))
    }

    /// User-provided translations, merged over the shipped ones.
    pub fn locales_dir(&self) -> PathBuf {
        self.root.join("locales")
    }
}
