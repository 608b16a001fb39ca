mod calculation;
mod placement;
mod types;

pub use placement::bottom_center;
pub use types::*;
