pub mod errors;
pub mod types;
pub mod window;

pub use errors::{ConfigError, DockError, PlatformError, PluginError};
pub use types::{Color, Rect, Size};
pub use window::{WindowId, WindowKind, WindowRef};

pub type Result<T> = std::result::Result<T, DockError>;
