//! X11 backend speaking EWMH to the running window manager.
//!
//! The connection is shared (`Arc`) with the application, which owns the
//! dock window and the event thread; this type only issues requests.

mod atoms;
mod pixels;

pub use atoms::Atoms;

use std::sync::Arc;

use brujo_common::{PlatformError, WindowId, WindowKind};
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError};
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ChangeWindowAttributesAux, ClientMessageEvent, ConnectionExt as _, EventMask,
    GetPropertyReply, ImageFormat, MapState, Window,
};
use x11rb::protocol::ErrorKind;
use x11rb::rust_connection::RustConnection;
use x11rb::CURRENT_TIME;

use super::{
    sync_events, Result, WindowEvent, WindowIcon, WindowImage, WindowInfo, WindowSystem,
};

/// ICCCM `IconicState`.
const ICONIC_STATE: u32 = 3;
/// EWMH source indication for pager-like clients.
const SOURCE_PAGER: u32 = 2;
const MAX_PROPERTY_LEN: u32 = 1 << 20;

pub struct X11WindowSystem {
    conn: Arc<RustConnection>,
    screen_num: usize,
    atoms: Atoms,
    seen: Vec<WindowId>,
    seen_active: Option<WindowId>,
}

fn connection_error(e: ConnectionError) -> PlatformError {
    PlatformError::ConnectionError(e.to_string())
}

fn reply_error(id: Window, e: ReplyError) -> PlatformError {
    match e {
        ReplyError::X11Error(err) if err.error_kind == ErrorKind::Window => {
            PlatformError::WindowGone(u64::from(id))
        }
        ReplyError::X11Error(err) => {
            PlatformError::WindowManagerError(format!("{:?} on window {id:#x}", err.error_kind))
        }
        ReplyError::ConnectionError(e) => connection_error(e),
    }
}

fn xid(id: WindowId) -> Result<Window> {
    Window::try_from(id.0).map_err(|_| PlatformError::WindowGone(id.0))
}

impl X11WindowSystem {
    /// Connect to `$DISPLAY`.
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)
            .map_err(|e| PlatformError::ConnectionError(e.to_string()))?;
        Self::new(Arc::new(conn), screen_num)
    }

    pub fn new(conn: Arc<RustConnection>, screen_num: usize) -> Result<Self> {
        let atoms = Atoms::new(&*conn)
            .map_err(connection_error)?
            .reply()
            .map_err(|e| PlatformError::ConnectionError(e.to_string()))?;
        let root = conn.setup().roots[screen_num].root;
        conn.change_window_attributes(
            root,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::PROPERTY_CHANGE),
        )
        .map_err(connection_error)?;
        debug!(screen_num, "connected to X server");
        Ok(Self {
            conn,
            screen_num,
            atoms,
            seen: Vec::new(),
            seen_active: None,
        })
    }

    pub fn connection(&self) -> &Arc<RustConnection> {
        &self.conn
    }

    pub fn screen_num(&self) -> usize {
        self.screen_num
    }

    pub fn atoms(&self) -> &Atoms {
        &self.atoms
    }

    fn root(&self) -> Window {
        self.conn.setup().roots[self.screen_num].root
    }

    fn property(
        &self,
        window: Window,
        property: impl Into<Atom>,
        type_: impl Into<Atom>,
        length: u32,
    ) -> Result<GetPropertyReply> {
        self.conn
            .get_property(false, window, property, type_, 0, length)
            .map_err(connection_error)?
            .reply()
            .map_err(|e| reply_error(window, e))
    }

    fn property32(&self, window: Window, property: Atom, type_: impl Into<Atom>) -> Result<Vec<u32>> {
        let reply = self.property(window, property, type_, MAX_PROPERTY_LEN)?;
        Ok(reply.value32().map(|v| v.collect()).unwrap_or_default())
    }

    fn title(&self, window: Window) -> Result<String> {
        let utf8 = self.property(window, self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING, 1024)?;
        let raw = if utf8.value.is_empty() {
            self.property(window, AtomEnum::WM_NAME, AtomEnum::STRING, 1024)?
                .value
        } else {
            utf8.value
        };
        Ok(sanitize_title(&String::from_utf8_lossy(&raw)))
    }

    fn kind(&self, window: Window) -> Result<WindowKind> {
        let types = self.property32(window, self.atoms._NET_WM_WINDOW_TYPE, AtomEnum::ATOM)?;
        let a = &self.atoms;
        let kind = types.iter().find_map(|&t| match t {
            t if t == a._NET_WM_WINDOW_TYPE_NORMAL => Some(WindowKind::Normal),
            t if t == a._NET_WM_WINDOW_TYPE_DESKTOP => Some(WindowKind::Desktop),
            t if t == a._NET_WM_WINDOW_TYPE_DOCK => Some(WindowKind::Dock),
            t if t == a._NET_WM_WINDOW_TYPE_SPLASH => Some(WindowKind::Splash),
            t if t == a._NET_WM_WINDOW_TYPE_DIALOG => Some(WindowKind::Dialog),
            t if t == a._NET_WM_WINDOW_TYPE_UTILITY => Some(WindowKind::Utility),
            t if t == a._NET_WM_WINDOW_TYPE_MENU
                || t == a._NET_WM_WINDOW_TYPE_POPUP_MENU
                || t == a._NET_WM_WINDOW_TYPE_DROPDOWN_MENU
                || t == a._NET_WM_WINDOW_TYPE_TOOLTIP =>
            {
                Some(WindowKind::Menu)
            }
            t if t == a._NET_WM_WINDOW_TYPE_TOOLBAR => Some(WindowKind::Toolbar),
            _ => None,
        });
        Ok(kind.unwrap_or_default())
    }

    fn send_client_message(&self, window: Window, type_: Atom, data: [u32; 5]) -> Result<()> {
        let event = ClientMessageEvent::new(32, window, type_, data);
        self.conn
            .send_event(
                false,
                self.root(),
                EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                event,
            )
            .map_err(connection_error)?;
        self.conn.flush().map_err(connection_error)?;
        Ok(())
    }
}

/// Drop control and bidi formatting characters some clients put in titles.
fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| {
            !c.is_control()
                && !matches!(
                    *c,
                    '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{FEFF}'
                )
        })
        .collect()
}

/// Split `WM_CLASS` (`instance\0class\0`).
fn split_wm_class(raw: &[u8]) -> (String, String) {
    let mut parts = raw
        .split(|b| *b == 0)
        .map(|p| String::from_utf8_lossy(p).into_owned());
    let instance = parts.next().unwrap_or_default();
    let class = parts.next().unwrap_or_default();
    (instance, class)
}

impl WindowSystem for X11WindowSystem {
    fn list_windows(&self) -> Result<Vec<WindowId>> {
        let ids = self.property32(self.root(), self.atoms._NET_CLIENT_LIST, AtomEnum::WINDOW)?;
        Ok(ids.into_iter().map(|w| WindowId(u64::from(w))).collect())
    }

    fn window_info(&self, id: WindowId) -> Result<WindowInfo> {
        let window = xid(id)?;
        let class = self.property(window, AtomEnum::WM_CLASS, AtomEnum::STRING, 1024)?;
        let (class_instance, class_name) = split_wm_class(&class.value);
        let pid = self
            .property32(window, self.atoms._NET_WM_PID, AtomEnum::CARDINAL)?
            .first()
            .copied();
        let transient_for = self
            .property32(window, AtomEnum::WM_TRANSIENT_FOR.into(), AtomEnum::WINDOW)?
            .first()
            .filter(|w| **w != 0)
            .map(|w| WindowId(u64::from(*w)));

        Ok(WindowInfo {
            id,
            pid,
            title: self.title(window)?,
            class_instance,
            class_name,
            kind: self.kind(window)?,
            transient_for,
        })
    }

    fn active_window(&self) -> Result<Option<WindowId>> {
        let active = self.property32(self.root(), self.atoms._NET_ACTIVE_WINDOW, AtomEnum::WINDOW)?;
        Ok(active
            .first()
            .filter(|w| **w != 0)
            .map(|w| WindowId(u64::from(*w))))
    }

    fn activate(&self, id: WindowId) -> Result<()> {
        self.send_client_message(
            xid(id)?,
            self.atoms._NET_ACTIVE_WINDOW,
            [SOURCE_PAGER, CURRENT_TIME, 0, 0, 0],
        )
    }

    fn minimize(&self, id: WindowId) -> Result<()> {
        self.send_client_message(xid(id)?, self.atoms.WM_CHANGE_STATE, [ICONIC_STATE, 0, 0, 0, 0])
    }

    fn close(&self, id: WindowId) -> Result<()> {
        self.send_client_message(
            xid(id)?,
            self.atoms._NET_CLOSE_WINDOW,
            [CURRENT_TIME, SOURCE_PAGER, 0, 0, 0],
        )
    }

    fn window_icon(&self, id: WindowId, size: u32) -> Result<Option<WindowIcon>> {
        let data = self.property32(xid(id)?, self.atoms._NET_WM_ICON, AtomEnum::CARDINAL)?;
        Ok(pixels::pick_icon(&data, size))
    }

    fn capture_thumbnail(&self, id: WindowId) -> Result<Option<WindowImage>> {
        let window = xid(id)?;
        let attrs = self
            .conn
            .get_window_attributes(window)
            .map_err(connection_error)?
            .reply()
            .map_err(|e| reply_error(window, e))?;
        if attrs.map_state != MapState::VIEWABLE {
            return Ok(None);
        }
        let geometry = self
            .conn
            .get_geometry(window)
            .map_err(connection_error)?
            .reply()
            .map_err(|e| reply_error(window, e))?;
        if geometry.depth < 24 {
            return Ok(None);
        }
        let image = self
            .conn
            .get_image(
                ImageFormat::Z_PIXMAP,
                window,
                0,
                0,
                geometry.width,
                geometry.height,
                !0,
            )
            .map_err(connection_error)?
            .reply()
            .map_err(|e| reply_error(window, e))?;
        Ok(pixels::bgrx_to_rgba(
            &image.data,
            u32::from(geometry.width),
            u32::from(geometry.height),
        ))
    }

    fn sync(&mut self) -> Result<Vec<WindowEvent>> {
        let current = self.list_windows()?;
        let active = self.active_window()?;
        let events = sync_events(&self.seen, &current, self.seen_active, active);
        self.seen = current;
        self.seen_active = active;
        Ok(events)
    }
}
