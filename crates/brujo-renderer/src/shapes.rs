use tiny_skia::{Path, PathBuilder, Rect};

/// Cubic control-point distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// Clamp a corner radius to `[0, min(width, height) / 2]`.
pub fn clamp_radius(radius: f32, width: f32, height: f32) -> f32 {
    radius.min(width.min(height) / 2.0).max(0.0)
}

/// Closed rounded-rectangle path. A zero radius gives a plain rectangle;
/// `None` for empty rectangles.
pub fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<Path> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let r = clamp_radius(radius, width, height);
    if r == 0.0 {
        return Some(PathBuilder::from_rect(Rect::from_xywh(x, y, width, height)?));
    }
    let (right, bottom) = (x + width, y + height);
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_clamped_to_half_the_short_side() {
        assert_eq!(clamp_radius(12.0, 100.0, 16.0), 8.0);
        assert_eq!(clamp_radius(4.0, 100.0, 16.0), 4.0);
        assert_eq!(clamp_radius(-3.0, 100.0, 16.0), 0.0);
    }

    #[test]
    fn path_bounds_match_rect() {
        let path = rounded_rect_path(2.0, 3.0, 40.0, 20.0, 6.0).unwrap();
        let bounds = path.bounds();
        assert_eq!(bounds.left(), 2.0);
        assert_eq!(bounds.top(), 3.0);
        assert_eq!(bounds.right(), 42.0);
        assert_eq!(bounds.bottom(), 23.0);
    }

    #[test]
    fn empty_rect_has_no_path() {
        assert!(rounded_rect_path(0.0, 0.0, 0.0, 10.0, 0.0).is_none());
        assert!(rounded_rect_path(0.0, 0.0, 0.0, 10.0, 4.0).is_none());
    }
}
