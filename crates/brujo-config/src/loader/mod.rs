//! JSON config file loading and creation.

mod loader;
mod paths;


pub use loader::{load_from_path, load_or_create};
pub use paths::ConfigPaths;
