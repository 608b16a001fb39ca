//! Menus, tooltips and window previews shown above the dock.

use brujo_common::{Color, Size};
use brujo_platform::WindowImage;

use crate::canvas::{Canvas, Fonts, TextStyle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// `action` is handed back to whoever opened the menu.
    Item { label: String, action: String },
    Separator,
}

impl MenuEntry {
    pub fn item(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Item {
            label: label.into(),
            action: action.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    Menu(Vec<MenuEntry>),
    Tooltip(Vec<String>),
    Preview {
        title: String,
        image: Option<WindowImage>,
    },
}

const PADDING: f32 = 8.0;
const ITEM_HEIGHT: f32 = 22.0;
const SEPARATOR_HEIGHT: f32 = 9.0;
const LINE_HEIGHT: f32 = 16.0;
const MIN_MENU_WIDTH: f32 = 120.0;
const PREVIEW_MAX: u32 = 240;

const BACKGROUND: Color = Color::from_rgba(30, 30, 30, 240);
const FOREGROUND: Color = Color::from_rgba(230, 230, 230, 255);
const HIGHLIGHT: Color = Color::from_rgba(70, 110, 180, 255);
const RULE: Color = Color::from_rgba(90, 90, 90, 255);

/// Sizes and paints popups. Measuring uses the same fonts the popup
/// window will be painted with.
#[derive(Debug, Clone)]
pub struct PopupPainter {
    fonts: Fonts,
    text: TextStyle,
}

impl PopupPainter {
    pub fn new(fonts: Fonts) -> Self {
        Self {
            fonts,
            text: TextStyle::new(12.0, FOREGROUND),
        }
    }

    pub fn measure(&self, popup: &Popup) -> Size {
        match popup {
            Popup::Menu(entries) => {
                let widest = entries
                    .iter()
                    .filter_map(|e| match e {
                        MenuEntry::Item { label, .. } => Some(self.fonts.measure(label, &self.text).width),
                        MenuEntry::Separator => None,
                    })
                    .fold(0.0, f32::max);
                let height: f32 = entries.iter().map(row_height).sum();
                Size::new(
                    (widest + PADDING * 4.0).max(MIN_MENU_WIDTH).ceil() as i32,
                    (height + PADDING).ceil() as i32,
                )
            }
            Popup::Tooltip(lines) => {
                let widest = lines
                    .iter()
                    .map(|l| self.fonts.measure(l, &self.text).width)
                    .fold(0.0, f32::max);
                Size::new(
                    (widest + PADDING * 2.0).ceil() as i32,
                    (lines.len() as f32 * LINE_HEIGHT + PADDING).ceil() as i32,
                )
            }
            Popup::Preview { title, image } => {
                let (w, h) = image
                    .as_ref()
                    .map(|i| fit(i.width, i.height, PREVIEW_MAX))
                    .unwrap_or((PREVIEW_MAX, PREVIEW_MAX / 2));
                let title_width = self.fonts.measure(title, &self.text).width.ceil() as u32;
                Size::new(
                    (w.max(title_width) as f32 + PADDING * 2.0) as i32,
                    (h as f32 + LINE_HEIGHT + PADDING * 3.0) as i32,
                )
            }
        }
    }

    /// Paint `popup` filling a `size` surface. `hovered` is a menu entry
    /// index.
    pub fn paint(&self, canvas: &mut dyn Canvas, popup: &Popup, size: Size, hovered: Option<usize>) {
        let (w, h) = (size.width as f32, size.height as f32);
        canvas.fill_rounded_rect(0.0, 0.0, w, h, 6.0, BACKGROUND);

        match popup {
            Popup::Menu(entries) => {
                let mut y = PADDING / 2.0;
                for (index, entry) in entries.iter().enumerate() {
                    let row = row_height(entry);
                    match entry {
                        MenuEntry::Item { label, .. } => {
                            if hovered == Some(index) {
                                canvas.fill_rect(2.0, y, w - 4.0, row, HIGHLIGHT);
                            }
                            let text_h = canvas.measure_text(label, &self.text).height;
                            canvas.draw_text(label, PADDING * 2.0, y + (row - text_h) / 2.0, &self.text);
                        }
                        MenuEntry::Separator => {
                            canvas.fill_rect(PADDING, y + row / 2.0, w - PADDING * 2.0, 1.0, RULE);
                        }
                    }
                    y += row;
                }
            }
            Popup::Tooltip(lines) => {
                for (i, line) in lines.iter().enumerate() {
                    canvas.draw_text(line, PADDING, PADDING / 2.0 + i as f32 * LINE_HEIGHT, &self.text);
                }
            }
            Popup::Preview { title, image } => {
                canvas.draw_text(title, PADDING, PADDING, &self.text);
                let top = PADDING * 2.0 + LINE_HEIGHT;
                match image {
                    Some(image) => {
                        let (iw, ih) = fit(image.width, image.height, PREVIEW_MAX);
                        let x = (w - iw as f32) / 2.0;
                        canvas.draw_image(image, x, top, iw as f32, ih as f32);
                    }
                    None => canvas.fill_rect(PADDING, top, w - PADDING * 2.0, h - top - PADDING, RULE),
                }
            }
        }
    }

    /// Menu entry under `y`, separators excluded.
    pub fn item_at(&self, popup: &Popup, y: f32) -> Option<usize> {
        let Popup::Menu(entries) = popup else {
            return None;
        };
        let mut top = PADDING / 2.0;
        for (index, entry) in entries.iter().enumerate() {
            let bottom = top + row_height(entry);
            if y >= top && y < bottom {
                return matches!(entry, MenuEntry::Item { .. }).then_some(index);
            }
            top = bottom;
        }
        None
    }

    /// Action of the menu entry at `index`.
    pub fn action<'a>(&self, popup: &'a Popup, index: usize) -> Option<&'a str> {
        match popup {
            Popup::Menu(entries) => match entries.get(index)? {
                MenuEntry::Item { action, .. } => Some(action),
                MenuEntry::Separator => None,
            },
            _ => None,
        }
    }
}

fn row_height(entry: &MenuEntry) -> f32 {
    match entry {
        MenuEntry::Item { .. } => ITEM_HEIGHT,
        MenuEntry::Separator => SEPARATOR_HEIGHT,
    }
}

/// Scale `(width, height)` down to fit a `max` square, keeping aspect.
fn fit(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = max as f32 / width.max(height) as f32;
    (
        ((width as f32 * scale).round() as u32).max(1),
        ((height as f32 * scale).round() as u32).max(1),
    )
}
