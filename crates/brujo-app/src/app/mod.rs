//! The dock process: X11 windows, the event loop, and everything that
//! turns plugin requests into effects.

mod core;
mod dispatch;
mod dock_menu;
mod events;
mod input;
mod popup;
mod surface;

pub use core::DockApp;
