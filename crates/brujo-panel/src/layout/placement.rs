use brujo_common::{Rect, Size};

/// Where a dock of `size` goes: horizontally centered in `area`, flush
/// with its bottom edge.
pub fn bottom_center(area: Rect, size: Size) -> Rect {
    Rect::new(
        area.x + (area.width - size.width) / 2,
        area.bottom() - size.height,
        size.width,
        size.height,
    )
}
