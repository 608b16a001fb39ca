//! Logging mode.

use serde::{Deserialize, Serialize};

/// How much of the `tracing` output is kept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// No subscriber is installed; every log call is a no-op.
    #[default]
    None,
    Console,
    /// Append to `<data_dir>/logs/brujo-dock.log`.
    File,
}

impl LogMode {
    pub fn is_enabled(self) -> bool {
        self != LogMode::None
    }
}
