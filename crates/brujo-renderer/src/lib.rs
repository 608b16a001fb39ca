pub mod badge;
pub mod canvas;
pub mod icons;
pub mod pipeline;
pub mod popup;
pub mod shapes;

pub use badge::paint_badge;
pub use canvas::{Canvas, DrawOp, Fonts, PixmapCanvas, RecordingCanvas, TextExtents, TextStyle};
pub use icons::{fallback_glyph, IconResolver, IconTheme};
pub use pipeline::{paint_dock, DockStyle};
pub use popup::{MenuEntry, Popup, PopupPainter};
pub use shapes::{clamp_radius, rounded_rect_path};
