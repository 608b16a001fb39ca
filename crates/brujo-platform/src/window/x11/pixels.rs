//! Pixel format conversions for icons and window captures.

use crate::window::WindowImage;

/// Pick the entry of a `_NET_WM_ICON` array closest to `size`: the
/// smallest one at least `size` wide, else the largest one.
///
/// The property is a sequence of `width, height, width*height ARGB
/// pixels`. A truncated trailing entry ends the scan.
pub(crate) fn pick_icon(data: &[u32], size: u32) -> Option<WindowImage> {
    let mut best: Option<(usize, u32, u32)> = None;
    let mut largest: Option<(usize, u32, u32)> = None;
    let mut idx = 0usize;

    while idx + 2 <= data.len() {
        let (w, h) = (data[idx], data[idx + 1]);
        let len = (w as usize).checked_mul(h as usize)?;
        let start = idx + 2;
        if w == 0 || h == 0 || start + len > data.len() {
            break;
        }
        if largest.is_none_or(|(_, lw, _)| w > lw) {
            largest = Some((start, w, h));
        }
        if w >= size && best.is_none_or(|(_, bw, _)| w < bw) {
            best = Some((start, w, h));
        }
        idx = start + len;
    }

    let (start, w, h) = best.or(largest)?;
    let mut rgba = Vec::with_capacity((w * h * 4) as usize);
    for &px in &data[start..start + (w * h) as usize] {
        rgba.extend_from_slice(&[
            (px >> 16) as u8,
            (px >> 8) as u8,
            px as u8,
            (px >> 24) as u8,
        ]);
    }
    WindowImage::new(w, h, rgba)
}

/// Convert a 24/32-bit `ZPixmap` capture (BGRX, little endian) to opaque
/// RGBA.
pub(crate) fn bgrx_to_rgba(data: &[u8], width: u32, height: u32) -> Option<WindowImage> {
    let needed = (width * height * 4) as usize;
    if data.len() < needed {
        return None;
    }
    let mut rgba = Vec::with_capacity(needed);
    for px in data[..needed].chunks_exact(4) {
        rgba.extend_from_slice(&[px[2], px[1], px[0], 0xFF]);
    }
    WindowImage::new(width, height, rgba)
}
