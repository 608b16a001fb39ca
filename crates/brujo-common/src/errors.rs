use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config write error: {0}")]
    WriteError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("path error: {0}")]
    PathError(String),

    #[error("display connection error: {0}")]
    ConnectionError(String),

    #[error("window {0} is gone")]
    WindowGone(u64),

    #[error("window manager error: {0}")]
    WindowManagerError(String),

    #[error("process info unavailable: {0}")]
    ProcessInfo(String),

    #[error("launch error: {0}")]
    LaunchError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("unknown plugin: {0}")]
    Unknown(String),

    #[error("plugin {plugin} failed in {hook}: {message}")]
    HookFailed {
        plugin: String,
        hook: &'static str,
        message: String,
    },

    #[error("draw error: {0}")]
    Draw(String),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum DockError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
