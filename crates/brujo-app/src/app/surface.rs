//! The dock's own X11 windows.
//!
//! Both the dock bar and the popup are 32-bit ARGB windows when the
//! server offers such a visual, so the rounded corners stay transparent
//! under a compositor. Frames are painted in software and uploaded with
//! `PutImage`.

use std::sync::Arc;

use brujo_common::{PlatformError, Rect, Size};
use brujo_platform::window::x11::Atoms;
use tracing::debug;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::{
    AtomEnum, ColormapAlloc, ConfigureWindowAux, ConnectionExt as _, CreateGCAux, CreateWindowAux,
    EventMask, Gcontext, ImageFormat, PropMode, Screen, VisualClass, Visualid, Window, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

/// Fixed part of a `PutImage` request.
const PUT_IMAGE_HEADER: usize = 24;

fn x_error(e: impl std::fmt::Display) -> PlatformError {
    PlatformError::ConnectionError(e.to_string())
}

/// Whole-screen rectangle of `screen_num`.
pub fn screen_area(conn: &RustConnection, screen_num: usize) -> Rect {
    let screen = &conn.setup().roots[screen_num];
    Rect::new(
        0,
        0,
        i32::from(screen.width_in_pixels),
        i32::from(screen.height_in_pixels),
    )
}

fn argb_visual(screen: &Screen) -> Option<(u8, Visualid)> {
    screen
        .allowed_depths
        .iter()
        .filter(|d| d.depth == 32)
        .flat_map(|d| d.visuals.iter().map(move |v| (d.depth, v)))
        .find(|(_, v)| v.class == VisualClass::TRUE_COLOR)
        .map(|(depth, v)| (depth, v.visual_id))
}

/// `_NET_WM_STRUT` and `_NET_WM_STRUT_PARTIAL` reserving the screen
/// from the top of `dock` down to the bottom edge.
pub fn strut(dock: Rect, screen: Rect) -> ([u32; 4], [u32; 12]) {
    let bottom = (screen.bottom() - dock.y).max(0) as u32;
    let start = dock.x.max(0) as u32;
    let end = (dock.right() - 1).max(0) as u32;
    (
        [0, 0, 0, bottom],
        [0, 0, 0, bottom, 0, 0, 0, 0, 0, 0, start, end],
    )
}

/// Split an image of `height` rows into `(first_row, rows)` bands that
/// each fit in one request of at most `max_request` bytes.
pub fn bands(height: usize, stride: usize, max_request: usize) -> Vec<(usize, usize)> {
    if height == 0 || stride == 0 {
        return Vec::new();
    }
    let per_band = (max_request.saturating_sub(PUT_IMAGE_HEADER) / stride).max(1);
    (0..height)
        .step_by(per_band)
        .map(|top| (top, per_band.min(height - top)))
        .collect()
}

pub struct Surface {
    conn: Arc<RustConnection>,
    window: Window,
    gc: Gcontext,
    depth: u8,
    rect: Rect,
}

impl Surface {
    pub fn create(
        conn: &Arc<RustConnection>,
        screen_num: usize,
        rect: Rect,
        override_redirect: bool,
        events: EventMask,
    ) -> Result<Self, PlatformError> {
        let screen = &conn.setup().roots[screen_num];
        let (depth, visual, colormap) = match argb_visual(screen) {
            Some((depth, visual)) => {
                let colormap = conn.generate_id().map_err(x_error)?;
                conn.create_colormap(ColormapAlloc::NONE, colormap, screen.root, visual)
                    .map_err(x_error)?;
                (depth, visual, colormap)
            }
            None => {
                debug!("no ARGB visual, corners will be opaque");
                (screen.root_depth, screen.root_visual, screen.default_colormap)
            }
        };

        let window = conn.generate_id().map_err(x_error)?;
        let aux = CreateWindowAux::new()
            .background_pixel(0)
            .border_pixel(0)
            .colormap(colormap)
            .override_redirect(u32::from(override_redirect))
            .event_mask(events);
        conn.create_window(
            depth,
            window,
            screen.root,
            rect.x as i16,
            rect.y as i16,
            rect.width.max(1) as u16,
            rect.height.max(1) as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &aux,
        )
        .map_err(x_error)?;

        let gc = conn.generate_id().map_err(x_error)?;
        conn.create_gc(gc, window, &CreateGCAux::new()).map_err(x_error)?;

        Ok(Self {
            conn: conn.clone(),
            window,
            gc,
            depth,
            rect,
        })
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Window type, state and class of a dock that stays on every desktop.
    pub fn mark_as_dock(&self, atoms: &Atoms) -> Result<(), PlatformError> {
        let conn = &self.conn;
        let w = self.window;
        conn.change_property32(
            PropMode::REPLACE,
            w,
            atoms._NET_WM_WINDOW_TYPE,
            AtomEnum::ATOM,
            &[atoms._NET_WM_WINDOW_TYPE_DOCK],
        )
        .map_err(x_error)?;
        conn.change_property32(
            PropMode::REPLACE,
            w,
            atoms._NET_WM_STATE,
            AtomEnum::ATOM,
            &[
                atoms._NET_WM_STATE_STICKY,
                atoms._NET_WM_STATE_SKIP_TASKBAR,
                atoms._NET_WM_STATE_SKIP_PAGER,
            ],
        )
        .map_err(x_error)?;
        conn.change_property32(PropMode::REPLACE, w, atoms._NET_WM_DESKTOP, AtomEnum::CARDINAL, &[u32::MAX])
            .map_err(x_error)?;
        conn.change_property8(PropMode::REPLACE, w, AtomEnum::WM_NAME, AtomEnum::STRING, b"brujo-dock")
            .map_err(x_error)?;
        conn.change_property8(
            PropMode::REPLACE,
            w,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            b"brujo-dock\0BrujoDock\0",
        )
        .map_err(x_error)?;
        Ok(())
    }

    pub fn set_strut(&self, atoms: &Atoms, screen: Rect) -> Result<(), PlatformError> {
        let (strut, partial) = strut(self.rect, screen);
        self.conn
            .change_property32(PropMode::REPLACE, self.window, atoms._NET_WM_STRUT, AtomEnum::CARDINAL, &strut)
            .map_err(x_error)?;
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                atoms._NET_WM_STRUT_PARTIAL,
                AtomEnum::CARDINAL,
                &partial,
            )
            .map_err(x_error)?;
        Ok(())
    }

    pub fn set_rect(&mut self, rect: Rect) -> Result<(), PlatformError> {
        if rect == self.rect {
            return Ok(());
        }
        let aux = ConfigureWindowAux::new()
            .x(rect.x)
            .y(rect.y)
            .width(rect.width.max(1) as u32)
            .height(rect.height.max(1) as u32);
        self.conn.configure_window(self.window, &aux).map_err(x_error)?;
        self.rect = rect;
        Ok(())
    }

    pub fn map(&self) -> Result<(), PlatformError> {
        self.conn.map_window(self.window).map_err(x_error)?;
        self.conn.flush().map_err(x_error)
    }

    pub fn unmap(&self) -> Result<(), PlatformError> {
        self.conn.unmap_window(self.window).map_err(x_error)?;
        self.conn.flush().map_err(x_error)
    }

    /// Upload a premultiplied BGRA frame of `size` to the window origin.
    pub fn present(&self, bgra: &[u8], size: Size) -> Result<(), PlatformError> {
        let stride = size.width.max(0) as usize * 4;
        let height = size.height.max(0) as usize;
        if bgra.len() < stride * height {
            return Err(PlatformError::WindowManagerError(format!(
                "frame of {} bytes is too small for {}x{}",
                bgra.len(),
                size.width,
                size.height
            )));
        }
        for (top, rows) in bands(height, stride, self.conn.maximum_request_bytes()) {
            let data = &bgra[top * stride..(top + rows) * stride];
            self.conn
                .put_image(
                    ImageFormat::Z_PIXMAP,
                    self.window,
                    self.gc,
                    size.width as u16,
                    rows as u16,
                    0,
                    top as i16,
                    0,
                    self.depth,
                    data,
                )
                .map_err(x_error)?;
        }
        self.conn.flush().map_err(x_error)
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        let _ = self.conn.free_gc(self.gc);
        let _ = self.conn.destroy_window(self.window);
        let _ = self.conn.flush();
    }
}
