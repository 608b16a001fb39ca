//! The single popup window shown above the dock.

use brujo_common::{PlatformError, Rect, Size};
use brujo_renderer::{Fonts, PixmapCanvas, Popup, PopupPainter};
use tracing::warn;
use x11rb::protocol::xproto::Window;

use super::surface::Surface;

/// Gap between the popup and the top of the dock.
const GAP: i32 = 6;

/// Center the popup on `anchor_x` above `dock`, kept on screen.
pub fn place(anchor_x: i32, dock: Rect, size: Size, screen: Rect) -> Rect {
    let max_x = (screen.right() - size.width).max(screen.x);
    let x = (anchor_x - size.width / 2).clamp(screen.x, max_x);
    let y = (dock.y - size.height - GAP).max(screen.y);
    Rect::new(x, y, size.width, size.height)
}

struct Shown {
    owner: String,
    popup: Popup,
    size: Size,
    hovered: Option<usize>,
}

pub struct PopupLayer {
    surface: Surface,
    painter: PopupPainter,
    fonts: Fonts,
    shown: Option<Shown>,
}

impl PopupLayer {
    pub fn new(surface: Surface, fonts: Fonts) -> Self {
        Self {
            surface,
            painter: PopupPainter::new(fonts.clone()),
            fonts,
            shown: None,
        }
    }

    pub fn window(&self) -> Window {
        self.surface.window()
    }

    pub fn is_menu(&self) -> bool {
        matches!(&self.shown, Some(Shown { popup: Popup::Menu(_), .. }))
    }

    /// Show `popup` for `owner`, replacing whatever is open. `anchor_x` is
    /// in screen coordinates.
    pub fn show(
        &mut self,
        owner: String,
        popup: Popup,
        anchor_x: i32,
        dock: Rect,
        screen: Rect,
    ) -> Result<(), PlatformError> {
        let size = self.painter.measure(&popup);
        self.surface.set_rect(place(anchor_x, dock, size, screen))?;
        self.shown = Some(Shown {
            owner,
            popup,
            size,
            hovered: None,
        });
        self.surface.map()?;
        self.paint()
    }

    pub fn hide(&mut self) {
        if self.shown.take().is_some() {
            if let Err(e) = self.surface.unmap() {
                warn!("cannot hide popup: {e}");
            }
        }
    }

    pub fn paint(&self) -> Result<(), PlatformError> {
        let Some(shown) = &self.shown else {
            return Ok(());
        };
        let Some(mut canvas) = PixmapCanvas::new(
            shown.size.width.max(1) as u32,
            shown.size.height.max(1) as u32,
            self.fonts.clone(),
        ) else {
            return Ok(());
        };
        self.painter.paint(&mut canvas, &shown.popup, shown.size, shown.hovered);
        self.surface.present(&canvas.to_bgra(), shown.size)
    }

    /// Highlight the menu entry under `y`.
    pub fn hover(&mut self, y: f64) {
        let Some(shown) = &mut self.shown else {
            return;
        };
        let hovered = self.painter.item_at(&shown.popup, y as f32);
        if hovered != shown.hovered {
            shown.hovered = hovered;
            if let Err(e) = self.paint() {
                warn!("cannot repaint popup: {e}");
            }
        }
    }

    /// Menus close once the pointer leaves them.
    pub fn pointer_left(&mut self) {
        if self.is_menu() {
            self.hide();
        }
    }

    /// Close the popup and return `(owner, action)` of the menu entry
    /// under `y`, if any.
    pub fn choose(&mut self, y: f64) -> Option<(String, String)> {
        let chosen = self.shown.as_ref().and_then(|shown| {
            let index = self.painter.item_at(&shown.popup, y as f32)?;
            let action = self.painter.action(&shown.popup, index)?;
            Some((shown.owner.clone(), action.to_string()))
        });
        self.hide();
        chosen
    }
}
