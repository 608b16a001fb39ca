//! Readers for `/proc/<pid>`.
//!
//! These are short, bounded filesystem reads, safe to call from the
//! event loop.

use std::path::{Path, PathBuf};

use brujo_common::PlatformError;

/// `/proc` reader with a configurable root, so tests can point it at a
/// fixture directory.
#[derive(Debug, Clone)]
pub struct ProcReader {
    root: PathBuf,
}

impl Default for ProcReader {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Arguments of `pid`, split on NUL.
    pub fn cmdline(&self, pid: u32) -> Result<Vec<String>, PlatformError> {
        let path = self.root.join(pid.to_string()).join("cmdline");
        let raw = std::fs::read(&path)
            .map_err(|e| PlatformError::ProcessInfo(format!("{}: {e}", path.display())))?;
        Ok(raw
            .split(|b| *b == 0)
            .filter(|arg| !arg.is_empty())
            .map(|arg| String::from_utf8_lossy(arg).into_owned())
            .collect())
    }

    /// Target of `/proc/<pid>/exe`.
    pub fn exe(&self, pid: u32) -> Result<PathBuf, PlatformError> {
        let path = self.root.join(pid.to_string()).join("exe");
        std::fs::read_link(&path)
            .map_err(|e| PlatformError::ProcessInfo(format!("{}: {e}", path.display())))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

pub fn read_cmdline(pid: u32) -> Result<Vec<String>, PlatformError> {
    ProcReader::default().cmdline(pid)
}

pub fn read_exe(pid: u32) -> Result<PathBuf, PlatformError> {
    ProcReader::default().exe(pid)
}
