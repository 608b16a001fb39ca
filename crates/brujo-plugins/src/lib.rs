//! Dock plugins and the host that runs them.
//!
//! Every slot in the dock belongs to a [`Plugin`]. The [`PluginHost`]
//! keeps the enabled plugins in display order, relays input and timer
//! hooks to them, and turns what they ask for into [`DockRequest`]s for
//! the application to carry out. A failing hook is logged and skipped;
//! it never takes down the other plugins.

pub mod builtin;
pub mod context;
pub mod host;
pub mod plugin;

pub use builtin::{create_builtin, BuiltinEnv, BUILTIN_PLUGINS};
pub use context::{DockRequest, DockServices, PluginContext};
pub use host::{PluginFactory, PluginHost, TimerScheduler};
pub use plugin::Plugin;
