//! Subscriber setup for the `log_mode` setting.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use brujo_common::DockError;
use brujo_config::LogMode;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";
const LOG_FILE: &str = "brujo-dock.log";

/// `--log-level` wins over `RUST_LOG`, which wins over the default.
pub fn filter(cli_directive: Option<&str>) -> EnvFilter {
    if let Some(directive) = cli_directive {
        match EnvFilter::try_new(directive) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("ignoring --log-level {directive:?}: {e}"),
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// An explicit `--log-level` turns console logging on even when the
/// settings say `none`.
pub fn effective_mode(mode: LogMode, cli_directive: Option<&str>) -> LogMode {
    match (mode, cli_directive) {
        (LogMode::None, Some(_)) => LogMode::Console,
        (mode, _) => mode,
    }
}

pub fn log_file(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE)
}

fn open_log(dir: &Path) -> Result<File, DockError> {
    std::fs::create_dir_all(dir)?;
    Ok(OpenOptions::new().create(true).append(true).open(log_file(dir))?)
}

/// Install the global subscriber. With [`LogMode::None`] nothing is
/// installed and every `tracing` macro is a no-op.
pub fn init(mode: LogMode, cli_directive: Option<&str>) -> Result<(), DockError> {
    match effective_mode(mode, cli_directive) {
        LogMode::None => {}
        LogMode::Console => {
            tracing_subscriber::fmt()
                .with_env_filter(filter(cli_directive))
                .with_writer(std::io::stderr)
                .init();
        }
        LogMode::File => {
            let dir = brujo_platform::log_dir()?;
            let file = open_log(&dir)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter(cli_directive))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }
    Ok(())
}
