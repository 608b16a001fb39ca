mod color;
mod core;

pub use self::core::*;
pub use color::*;
