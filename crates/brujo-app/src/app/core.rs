//! DockApp struct definition and the main loop.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use brujo_common::{DockError, PlatformError, Rect, Size};
use brujo_config::{ConfigPaths, DockSettings, PluginSettingsStore, Translator};
use brujo_panel::{bottom_center, InputRouter, LayoutEngine};
use brujo_platform::{WindowSystem, X11WindowSystem};
use brujo_plugins::{BuiltinEnv, DockServices, PluginHost};
use brujo_renderer::{DockStyle, Fonts, PixmapCanvas};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::EventMask;

use super::events::{self, AppEvent, RootWatch};
use super::popup::PopupLayer;
use super::surface::{screen_area, Surface};

/// Longest sleep when no plugin timer is pending.
const IDLE_WAIT: Duration = Duration::from_secs(1);

fn px(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Layout rules taken from the core settings.
pub fn layout_engine(settings: &DockSettings) -> LayoutEngine {
    LayoutEngine {
        padding_x: px(settings.dock_padding_x),
        padding_y: px(settings.dock_padding_y),
        spacing: px(settings.dock_spacing),
        min_height: px(settings.default_height),
    }
}

pub fn dock_style(settings: &DockSettings) -> DockStyle {
    DockStyle {
        corner_radius: settings.corner_radius as f32,
        ..DockStyle::default()
    }
}

// =============================================================================
// STATE
// =============================================================================

/// The running dock: one bar window, one popup window, the plugin host,
/// and the flags that batch layout and paint work to once per loop turn.
pub struct DockApp {
    pub(super) paths: ConfigPaths,
    pub(super) settings: DockSettings,
    pub(super) translator: Translator,
    pub(super) fonts: Fonts,
    pub(super) windows: X11WindowSystem,
    pub(super) host: PluginHost,
    pub(super) dock: Surface,
    pub(super) popup: PopupLayer,
    pub(super) router: InputRouter<String>,
    pub(super) screen: Rect,
    event_rx: Receiver<AppEvent>,
    pub(super) needs_relayout: bool,
    pub(super) needs_redraw: bool,
    pub(super) should_exit: bool,
    pub(super) lost_connection: Option<String>,
}

impl DockApp {
    /// Connect to the display and create the dock and popup windows.
    /// Plugins are loaded by [`DockApp::run`].
    pub fn new(paths: ConfigPaths, settings: DockSettings, translator: Translator) -> Result<Self, DockError> {
        let windows = X11WindowSystem::connect()?;
        let conn = windows.connection().clone();
        let screen_num = windows.screen_num();
        let screen = screen_area(&conn, screen_num);

        let fonts = Fonts::load_system();
        if !fonts.is_available() {
            warn!("no usable system font found, text will not be drawn");
        }

        let pointer = EventMask::EXPOSURE
            | EventMask::BUTTON_PRESS
            | EventMask::POINTER_MOTION
            | EventMask::LEAVE_WINDOW;
        let initial = bottom_center(screen, Size::new(1, px(settings.default_height)));
        let dock = Surface::create(&conn, screen_num, initial, false, pointer)?;
        dock.mark_as_dock(windows.atoms())?;
        let popup = Surface::create(&conn, screen_num, Rect::new(0, 0, 1, 1), true, pointer)?;

        let factory = BuiltinEnv::system(&paths, fonts.clone()).factory();
        let host = PluginHost::new(factory, PluginSettingsStore::new(paths.clone()));

        let watch = RootWatch {
            root: conn.setup().roots[screen_num].root,
            client_list: windows.atoms()._NET_CLIENT_LIST,
            active_window: windows.atoms()._NET_ACTIVE_WINDOW,
        };
        let (tx, event_rx) = mpsc::channel();
        events::spawn(conn, watch, tx)?;

        Ok(Self {
            paths,
            settings,
            translator,
            popup: PopupLayer::new(popup, fonts.clone()),
            fonts,
            windows,
            host,
            dock,
            router: InputRouter::new(),
            screen,
            event_rx,
            needs_relayout: false,
            needs_redraw: false,
            should_exit: false,
            lost_connection: None,
        })
    }

    // =========================================================================
    // MAIN LOOP
    // =========================================================================

    /// Run until Quit or until the display connection is lost.
    pub fn run(mut self) -> Result<(), DockError> {
        // Windows that already exist are listed by the plugins themselves;
        // only later changes should arrive as events.
        if let Err(e) = self.windows.sync() {
            warn!("initial window sync failed: {e}");
        }
        self.load_plugins();
        self.relayout();
        self.paint();
        self.dock.map()?;
        info!(plugins = self.host.len(), "dock running");

        while !self.should_exit {
            let timeout = self
                .host
                .next_deadline()
                .map_or(IDLE_WAIT, |deadline| deadline.saturating_duration_since(Instant::now()));
            match self.event_rx.recv_timeout(timeout) {
                Ok(event) => {
                    self.handle_event(event);
                    while let Ok(event) = self.event_rx.try_recv() {
                        self.handle_event(event);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.lost_connection = Some("event thread stopped".into());
                    self.should_exit = true;
                }
            }
            self.tick();
            self.flush_frame();
        }

        self.shutdown();
        match self.lost_connection.take() {
            Some(reason) => Err(PlatformError::ConnectionError(reason).into()),
            None => Ok(()),
        }
    }

    fn load_plugins(&mut self) {
        let names = self.settings.enabled_plugins();
        let services = DockServices::new(&self.windows, &self.translator);
        let requests = self.host.load(&names, services, Instant::now());
        self.dispatch_all(requests);
    }

    fn tick(&mut self) {
        let services = DockServices::new(&self.windows, &self.translator);
        let requests = self.host.tick(Instant::now(), services);
        self.dispatch_all(requests);
    }

    fn flush_frame(&mut self) {
        if self.needs_relayout {
            self.relayout();
        }
        if self.needs_redraw {
            self.paint();
        }
    }

    // =========================================================================
    // LAYOUT & PAINT
    // =========================================================================

    /// Recompute the geometry, move the bar and its strut, and schedule a
    /// repaint.
    pub(super) fn relayout(&mut self) {
        self.needs_relayout = false;
        let geometry = self.host.geometry(&layout_engine(&self.settings));
        let rect = bottom_center(self.screen, Size::new(geometry.width, geometry.height));
        debug!(width = rect.width, height = rect.height, "dock geometry");
        if let Err(e) = self.dock.set_rect(rect) {
            warn!("cannot move dock window: {e}");
        }
        if let Err(e) = self.dock.set_strut(self.windows.atoms(), self.screen) {
            warn!("cannot reserve screen edge: {e}");
        }
        self.router.set_layout(geometry);
        self.needs_redraw = true;
    }

    pub(super) fn paint(&mut self) {
        self.needs_redraw = false;
        let size = self.dock.rect().size();
        let Some(mut canvas) = PixmapCanvas::new(
            size.width.max(1) as u32,
            size.height.max(1) as u32,
            self.fonts.clone(),
        ) else {
            warn!(width = size.width, height = size.height, "cannot allocate dock frame");
            return;
        };
        let failed = self.host.paint(&mut canvas, &dock_style(&self.settings), self.router.layout());
        if failed > 0 {
            debug!(failed, "components skipped in this frame");
        }
        if let Err(e) = self.dock.present(&canvas.to_bgra(), size) {
            warn!("cannot present dock frame: {e}");
        }
    }

    // =========================================================================
    // SHUTDOWN
    // =========================================================================

    /// Destroy every plugin (releasing its timers) before the windows go.
    fn shutdown(&mut self) {
        info!("shutting down");
        self.popup.hide();
        self.host.unload_all();
        if let Err(e) = self.dock.unmap() {
            debug!("dock window already gone: {e}");
        }
        info!("shutdown complete");
    }
}
