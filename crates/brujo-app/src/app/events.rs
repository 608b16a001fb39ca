//! X11 event thread.
//!
//! A dedicated thread blocks in `wait_for_event` and forwards the events
//! the dock cares about over a channel, so the main loop can sleep on
//! `recv_timeout` until either input arrives or the next plugin timer is
//! due.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use brujo_common::DockError;
use tracing::{debug, error};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, KeyButMask, NotifyDetail, Window};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_RIGHT: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Expose(Window),
    Press {
        window: Window,
        button: u8,
        x: f64,
        y: f64,
        ctrl: bool,
    },
    Motion {
        window: Window,
        x: f64,
        y: f64,
    },
    Leave(Window),
    /// The client list or the active window changed.
    ClientsChanged,
    Disconnected(String),
}

/// Root window properties that describe the set of clients.
#[derive(Debug, Clone, Copy)]
pub struct RootWatch {
    pub root: Window,
    pub client_list: Atom,
    pub active_window: Atom,
}

impl RootWatch {
    pub fn is_client_change(&self, window: Window, atom: Atom) -> bool {
        window == self.root && (atom == self.client_list || atom == self.active_window)
    }
}

fn translate(event: &Event, watch: &RootWatch) -> Option<AppEvent> {
    match event {
        Event::Expose(e) if e.count == 0 => Some(AppEvent::Expose(e.window)),
        Event::ButtonPress(e) => Some(AppEvent::Press {
            window: e.event,
            button: e.detail,
            x: f64::from(e.event_x),
            y: f64::from(e.event_y),
            ctrl: e.state.contains(KeyButMask::CONTROL),
        }),
        Event::MotionNotify(e) => Some(AppEvent::Motion {
            window: e.event,
            x: f64::from(e.event_x),
            y: f64::from(e.event_y),
        }),
        Event::LeaveNotify(e) if e.detail != NotifyDetail::INFERIOR => Some(AppEvent::Leave(e.event)),
        Event::PropertyNotify(e) if watch.is_client_change(e.window, e.atom) => Some(AppEvent::ClientsChanged),
        _ => None,
    }
}

pub fn spawn(
    conn: Arc<RustConnection>,
    watch: RootWatch,
    tx: Sender<AppEvent>,
) -> Result<JoinHandle<()>, DockError> {
    let handle = thread::Builder::new()
        .name("x11-events".into())
        .spawn(move || loop {
            match conn.wait_for_event() {
                Ok(event) => {
                    let Some(event) = translate(&event, &watch) else {
                        continue;
                    };
                    if tx.send(event).is_err() {
                        debug!("event receiver gone, stopping event thread");
                        break;
                    }
                }
                Err(e) => {
                    error!("X connection lost: {e}");
                    let _ = tx.send(AppEvent::Disconnected(e.to_string()));
                    break;
                }
            }
        })?;
    Ok(handle)
}
