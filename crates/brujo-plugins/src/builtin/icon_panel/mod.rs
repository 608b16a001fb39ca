//! Running and pinned applications.
//!
//! The panel owns the [`IconRegistry`] and the [`WindowMonitor`] feeding
//! it. Each icon gets a fixed-size cell; the panel's preferred size is its
//! own row layout, and pointer input inside the slot is routed to a cell
//! through an [`InputRouter`] over that same layout.

mod config;


pub use config::{HintMode, IconPanelConfig};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use brujo_common::{Color, PlatformError, PluginError, Size, WindowId};
use brujo_config::{PinnedApps, SettingsForm};
use brujo_panel::{
    normalize, ApplicationIcon, GroupChange, HoverChange, IconRegistry, InputRouter, WindowMonitor,
};
use brujo_platform::{DesktopEntry, DesktopIndex, WindowEvent, WindowImage, WindowSystem};
use brujo_renderer::{paint_badge, Canvas, IconResolver, MenuEntry, Popup};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::builtin::BuiltinEnv;
use crate::context::PluginContext;
use crate::plugin::Plugin;

const ACTIVE_FILL: Color = Color::from_rgba(128, 128, 128, 204);
const HOVER_FILL: Color = Color::from_rgba(0, 0, 0, 204);
const TOOLTIP_TITLES: usize = 5;

pub struct IconPanel {
    config: IconPanelConfig,
    registry: IconRegistry,
    monitor: WindowMonitor,
    resolver: IconResolver,
    images: HashMap<String, Arc<WindowImage>>,
    index: DesktopIndex,
    application_dirs: Vec<PathBuf>,
    pinned_file: PathBuf,
    pinned: PinnedApps,
    router: InputRouter<String>,
}

impl IconPanel {
    pub fn new(env: &BuiltinEnv) -> Self {
        let config = IconPanelConfig::default();
        Self {
            resolver: IconResolver::new(env.icon_theme.clone(), env.fonts.clone(), config.icon_size as u32),
            config,
            registry: IconRegistry::new(),
            monitor: WindowMonitor::with_proc(env.own_pid, env.proc.clone()),
            images: HashMap::new(),
            index: DesktopIndex::default(),
            application_dirs: env.application_dirs.clone(),
            pinned_file: env.pinned_file.clone(),
            pinned: PinnedApps::new(Vec::new()),
            router: InputRouter::new(),
        }
    }

    pub fn registry(&self) -> &IconRegistry {
        &self.registry
    }

    pub fn config(&self) -> &IconPanelConfig {
        &self.config
    }

    fn update_layout(&mut self) {
        let (cell_w, cell_h) = self.config.cell();
        let cells: Vec<(String, Size)> = self
            .registry
            .iter()
            .map(|icon| (icon.identifier.clone(), Size::new(cell_w, cell_h)))
            .collect();
        self.router.set_layout(self.config.layout_engine().compute(&cells));
    }

    /// Resolve pixels for every icon and drop those of vanished icons.
    fn refresh_images(&mut self, windows: &dyn WindowSystem) {
        let registry = &self.registry;
        self.images.retain(|identifier, _| registry.get(identifier).is_some());
        for icon in registry.iter() {
            let first = icon.windows().first().map(|w| w.id);
            let image = self.resolver.resolve(icon, |size| {
                let id = first?;
                windows.window_icon(id, size).unwrap_or_else(|e| {
                    debug!(window = %id, "window icon unavailable: {e}");
                    None
                })
            });
            match image {
                Some(image) => {
                    self.images.insert(icon.identifier.clone(), image);
                }
                None => debug!(identifier = %icon.identifier, "no icon image"),
            }
        }
    }

    /// Give icons created from windows the launcher that matches them, so
    /// they can be pinned and show the entry's name and icon.
    fn adopt_launcher(&mut self, identifier: &str) {
        let Some(icon) = self.registry.get_mut(identifier) else {
            return;
        };
        if icon.desktop_path.is_some() {
            return;
        }
        let Some(entry) = find_launcher(&self.index, identifier) else {
            return;
        };
        debug!(%identifier, entry = %entry.path.display(), "launcher adopted");
        icon.desktop_path = Some(entry.path.clone());
        if let Some(name) = entry.icon.as_deref().filter(|n| !n.is_empty()) {
            icon.icon_name = name.to_string();
        }
        if !entry.name.is_empty() {
            icon.display_name = entry.name.clone();
        }
    }

    fn apply_changes(&mut self, ctx: &mut PluginContext<'_>, before: usize, changes: Vec<GroupChange>) {
        if changes.is_empty() {
            return;
        }
        for change in &changes {
            match change {
                GroupChange::Changed { identifier, .. } => self.adopt_launcher(identifier),
                GroupChange::Removed { identifier } => self.resolver.invalidate(identifier),
                GroupChange::ActiveChanged => {}
            }
        }
        self.refresh_images(ctx.windows());

        if self.registry.len() == before {
            ctx.redraw();
            return;
        }
        let hovered_gone = self
            .router
            .hovered()
            .is_some_and(|id| self.registry.get(id).is_none());
        if hovered_gone {
            ctx.hide_popup();
        }
        self.update_layout();
        ctx.relayout();
    }

    fn forget(&mut self, ctx: &mut PluginContext<'_>, id: WindowId) {
        let before = self.registry.len();
        let changes = self.monitor.forget(id, &mut self.registry);
        self.apply_changes(ctx, before, changes);
    }

    /// Activate `id`, or minimize it when it already is the active window.
    fn toggle(&mut self, ctx: &mut PluginContext<'_>, id: WindowId) -> Result<(), PluginError> {
        let windows = ctx.windows();
        let active = windows.active_window().unwrap_or_else(|e| {
            debug!("active window unavailable: {e}");
            None
        });
        let result = if active == Some(id) {
            windows.minimize(id)
        } else {
            windows.activate(id)
        };
        match result {
            Ok(()) => Ok(()),
            Err(PlatformError::WindowGone(_)) => {
                debug!(window = %id, "window vanished before it could be toggled");
                self.forget(ctx, id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn launch(&self, ctx: &mut PluginContext<'_>, icon: &ApplicationIcon) {
        let entry = icon.desktop_path.as_deref().and_then(|path| {
            self.index
                .by_path(path)
                .cloned()
                .or_else(|| DesktopEntry::load(path))
        });
        match entry.and_then(|e| e.command()) {
            Some(command) => {
                info!(identifier = %icon.identifier, %command, "launching");
                ctx.launch(command);
            }
            None => warn!(identifier = %icon.identifier, "nothing to launch"),
        }
    }

    fn window_chooser(&self, ctx: &PluginContext<'_>, icon: &ApplicationIcon) -> Vec<MenuEntry> {
        let windows = ctx.windows();
        icon.windows()
            .iter()
            .filter_map(|w| windows.window_info(w.id).ok())
            .map(|info| {
                let label = if info.title.is_empty() {
                    ctx.tr("Nameless").to_string()
                } else {
                    info.title
                };
                MenuEntry::item(label, format!("window:{}", info.id.0))
            })
            .collect()
    }

    fn context_menu(&self, ctx: &PluginContext<'_>, icon: &ApplicationIcon) -> Vec<MenuEntry> {
        let id = &icon.identifier;
        let mut entries = vec![if icon.pinned {
            MenuEntry::item(ctx.tr("Unpin"), format!("unpin:{id}"))
        } else {
            MenuEntry::item(ctx.tr("Pin"), format!("pin:{id}"))
        }];
        if icon.is_running() {
            entries.push(MenuEntry::Separator);
            entries.push(MenuEntry::item(ctx.tr("Close All"), format!("close_all:{id}")));
        }
        entries.push(MenuEntry::Separator);
        entries.push(MenuEntry::item(ctx.tr("Settings"), "settings"));
        entries
    }

    fn hint(&self, ctx: &PluginContext<'_>, icon: &ApplicationIcon) -> Option<Popup> {
        if self.config.hint_mode == HintMode::None {
            return None;
        }
        let Some(first) = icon.windows().first().map(|w| w.id) else {
            return Some(Popup::Tooltip(vec![icon.display_name.clone()]));
        };
        let windows = ctx.windows();
        if self.config.hint_mode == HintMode::Preview {
            let title = windows
                .window_info(first)
                .map(|info| info.title)
                .unwrap_or_else(|_| icon.display_name.clone());
            let image = windows.capture_thumbnail(first).unwrap_or_else(|e| {
                debug!(window = %first, "no thumbnail: {e}");
                None
            });
            return Some(Popup::Preview { title, image });
        }

        let titles: Vec<String> = icon
            .windows()
            .iter()
            .filter_map(|w| windows.window_info(w.id).ok())
            .map(|info| {
                if info.title.is_empty() {
                    ctx.tr("Nameless").to_string()
                } else {
                    info.title
                }
            })
            .collect();
        let hidden = titles.len().saturating_sub(TOOLTIP_TITLES);
        let mut lines: Vec<String> = titles.into_iter().take(TOOLTIP_TITLES).collect();
        if hidden > 0 {
            lines.push(ctx.tr("... and {n} more").replace("{n}", &hidden.to_string()));
        }
        if lines.is_empty() {
            lines.push(icon.display_name.clone());
        }
        Some(Popup::Tooltip(lines))
    }

    fn anchor(&self, identifier: &str) -> f64 {
        self.router
            .layout()
            .slot(&identifier.to_string())
            .map(|slot| slot.rect.x as f64 + slot.rect.width as f64 / 2.0)
            .unwrap_or_default()
    }

    fn icon_at(&self, x: f64, y: f64) -> Option<&ApplicationIcon> {
        let slot = self.router.locate(x, y)?;
        self.registry.get(&slot.key)
    }

    fn pin(&mut self, ctx: &mut PluginContext<'_>, identifier: &str) -> Result<(), PluginError> {
        let Some(icon) = self.registry.get(identifier) else {
            return Ok(());
        };
        let path = match &icon.desktop_path {
            Some(path) => path.clone(),
            None => find_launcher(&self.index, identifier)
                .map(|entry| entry.path.clone())
                .ok_or_else(|| PlatformError::PathError(format!("no desktop entry for {identifier}")))?,
        };
        self.registry.pin(identifier, &path);
        self.pinned.add(path);
        self.pinned.save(&self.pinned_file)?;
        info!(%identifier, "pinned");
        ctx.redraw();
        Ok(())
    }

    fn unpin(&mut self, ctx: &mut PluginContext<'_>, identifier: &str) -> Result<(), PluginError> {
        let Some(icon) = self.registry.get(identifier) else {
            return Ok(());
        };
        if let Some(path) = icon.desktop_path.clone() {
            self.pinned.remove(&path);
            self.pinned.save(&self.pinned_file)?;
        }
        info!(%identifier, "unpinned");
        if self.registry.unpin(identifier) {
            self.resolver.invalidate(identifier);
            self.images.remove(identifier);
            ctx.hide_popup();
            self.update_layout();
            ctx.relayout();
        } else {
            ctx.redraw();
        }
        Ok(())
    }

    fn close_all(&mut self, ctx: &mut PluginContext<'_>, identifier: &str) -> Result<(), PluginError> {
        let Some(icon) = self.registry.get(identifier) else {
            return Ok(());
        };
        let ids: Vec<WindowId> = icon.windows().iter().map(|w| w.id).collect();
        let windows = ctx.windows();
        for id in ids {
            match windows.close(id) {
                Ok(()) => {}
                Err(PlatformError::WindowGone(_)) => self.forget(ctx, id),
                Err(e) => warn!(window = %id, "close failed: {e}"),
            }
        }
        Ok(())
    }
}

/// Desktop entry whose class hint normalizes to `identifier`, or whose
/// file stem or `StartupWMClass` equals it ignoring case.
fn find_launcher<'a>(index: &'a DesktopIndex, identifier: &str) -> Option<&'a DesktopEntry> {
    index.find(|entry| {
        normalize(entry.class_hint()) == identifier
            || entry.stem().eq_ignore_ascii_case(identifier)
            || entry
                .startup_wm_class
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(identifier))
    })
}

impl Plugin for IconPanel {
    fn name(&self) -> &str {
        "icon_panel"
    }

    fn description(&self) -> &str {
        "Running and pinned applications"
    }

    fn settings_form(&self) -> SettingsForm {
        config::form()
    }

    fn on_init(&mut self, ctx: &mut PluginContext<'_>, settings: &Map<String, Value>) -> Result<(), PluginError> {
        self.config = IconPanelConfig::from_settings(settings);
        self.resolver.set_size(self.config.icon_size as u32);
        self.pinned = PinnedApps::load(&self.pinned_file);
        self.registry = IconRegistry::with_pinned(self.pinned.entries());
        self.index = DesktopIndex::scan(&self.application_dirs);

        let windows = ctx.windows();
        self.monitor.scan(windows, &mut self.registry);
        let identifiers: Vec<String> = self.registry.iter().map(|i| i.identifier.clone()).collect();
        for identifier in &identifiers {
            self.adopt_launcher(identifier);
        }
        self.refresh_images(windows);
        self.update_layout();
        info!(
            icons = self.registry.len(),
            windows = self.monitor.visible_count(),
            "icon panel ready"
        );
        ctx.relayout();
        Ok(())
    }

    fn on_destroy(&mut self) {
        self.images.clear();
        self.registry = IconRegistry::new();
    }

    /// Always one cell tall, even with no icons.
    fn preferred_size(&self) -> Size {
        Size::new(self.router.layout().width, self.config.cell().1)
    }

    fn on_draw(&mut self, canvas: &mut dyn Canvas, _width: i32, _height: i32) -> Result<(), PluginError> {
        let config = &self.config;
        let size = config.icon_size as f32;
        let bar = config.bar_height() as f32;
        for slot in &self.router.layout().slots {
            let Some(icon) = self.registry.get(&slot.key) else {
                continue;
            };
            let (x, y) = (slot.rect.x as f32, slot.rect.y as f32);
            let (w, h) = (slot.rect.width as f32, slot.rect.height as f32);

            if icon.active {
                canvas.fill_rect(x, y, w, h, ACTIVE_FILL);
            } else if icon.hovered {
                canvas.fill_rect(x, y, w, h, HOVER_FILL);
            }
            if icon.is_running() && bar > 0.0 {
                canvas.fill_rect(x, y + h - bar, w, bar, config.highlight_color);
            }
            if let Some(image) = self.images.get(&icon.identifier) {
                let left = x + config.icon_padding_x as f32;
                let top = y + config.icon_padding_top as f32;
                canvas.draw_image(image, left, top, size, size);
            }
            paint_badge(canvas, x + w, y, icon.window_count());
        }
        Ok(())
    }

    fn on_click(&mut self, ctx: &mut PluginContext<'_>, x: f64, y: f64) -> Result<(), PluginError> {
        let Some(icon) = self.icon_at(x, y) else {
            return Ok(());
        };
        let ids: Vec<WindowId> = icon.windows().iter().map(|w| w.id).collect();
        match ids.as_slice() {
            [] => {
                self.launch(ctx, icon);
                Ok(())
            }
            [id] => {
                let id = *id;
                self.toggle(ctx, id)
            }
            _ => {
                let entries = self.window_chooser(ctx, icon);
                let anchor = self.anchor(&icon.identifier);
                ctx.hide_popup();
                ctx.show_menu(entries, anchor);
                Ok(())
            }
        }
    }

    fn on_right_click(&mut self, ctx: &mut PluginContext<'_>, x: f64, y: f64) -> Result<(), PluginError> {
        let Some(icon) = self.icon_at(x, y) else {
            return Ok(());
        };
        let entries = self.context_menu(ctx, icon);
        let anchor = self.anchor(&icon.identifier);
        ctx.hide_popup();
        ctx.show_menu(entries, anchor);
        Ok(())
    }

    fn on_hover(&mut self, ctx: &mut PluginContext<'_>, x: f64, y: f64) -> Result<(), PluginError> {
        let HoverChange::Moved { entered, .. } = self.router.pointer_moved(x, y) else {
            return Ok(());
        };
        self.registry.set_hovered(entered.as_deref());
        let hint = entered.as_deref().and_then(|identifier| {
            let icon = self.registry.get(identifier)?;
            Some((self.hint(ctx, icon)?, self.anchor(identifier)))
        });
        match hint {
            Some((popup, anchor)) => ctx.show_popup(popup, anchor),
            None => ctx.hide_popup(),
        }
        ctx.redraw();
        Ok(())
    }

    fn on_leave(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        if let HoverChange::Moved { .. } = self.router.pointer_left() {
            self.registry.set_hovered(None);
            ctx.hide_popup();
            ctx.redraw();
        }
        Ok(())
    }

    fn on_settings_changed(
        &mut self,
        ctx: &mut PluginContext<'_>,
        settings: &Map<String, Value>,
    ) -> Result<(), PluginError> {
        self.config = IconPanelConfig::from_settings(settings);
        self.resolver.set_size(self.config.icon_size as u32);
        self.images.clear();
        self.refresh_images(ctx.windows());
        self.update_layout();
        ctx.relayout();
        Ok(())
    }

    fn on_window_event(&mut self, ctx: &mut PluginContext<'_>, event: WindowEvent) -> Result<(), PluginError> {
        let before = self.registry.len();
        let changes = self.monitor.handle(event, ctx.windows(), &mut self.registry);
        self.apply_changes(ctx, before, changes);
        Ok(())
    }

    fn on_menu_action(&mut self, ctx: &mut PluginContext<'_>, action: &str) -> Result<(), PluginError> {
        if action == "settings" {
            ctx.open_settings();
            return Ok(());
        }
        let Some((verb, target)) = action.split_once(':') else {
            debug!(%action, "unknown menu action");
            return Ok(());
        };
        match verb {
            "window" => {
                let Some(id) = target.parse::<u64>().ok().map(WindowId) else {
                    debug!(%action, "malformed window action");
                    return Ok(());
                };
                if self.monitor.window_ref(id).is_none() {
                    debug!(window = %id, "chosen window is gone");
                    return Ok(());
                }
                self.toggle(ctx, id)
            }
            "pin" => self.pin(ctx, target),
            "unpin" => self.unpin(ctx, target),
            "close_all" => self.close_all(ctx, target),
            _ => {
                debug!(%action, "unknown menu action");
                Ok(())
            }
        }
    }
}
