//! Dock model: which icons exist, which windows they own, where
//! everything sits on screen, and what the pointer is over.

pub mod app_icon;
pub mod badge;
pub mod input;
pub mod layout;
pub mod monitor;
pub mod normalizer;
pub mod registry;

pub use app_icon::ApplicationIcon;
pub use badge::badge_text;
pub use input::{HoverChange, HoverTracker, InputRouter, PointerTarget};
pub use layout::{bottom_center, DockGeometry, LayoutEngine, Slot};
pub use monitor::{GroupChange, WindowMonitor};
pub use normalizer::{
    icon_name_for_identifier, identify, normalize, resolve_chromium_app_id,
    resolve_libreoffice_variant,
};
pub use registry::{IconRegistry, Removal};
