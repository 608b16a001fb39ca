//! The ordered set of dock icons.
//!
//! Insertion order is display order. Pinned launchers are seeded first,
//! in the order of `pinned.json`, and running applications append after
//! them. Icons never move once placed.


use std::path::{Path, PathBuf};

use brujo_common::WindowRef;
use brujo_platform::DesktopEntry;
use tracing::{debug, warn};

use crate::app_icon::ApplicationIcon;

/// What [`IconRegistry::remove_window`] did to the owning icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub identifier: String,
    /// The icon left the dock, so geometry must be recomputed.
    pub destroyed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct IconRegistry {
    icons: Vec<ApplicationIcon>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding one pinned icon per readable desktop entry.
    pub fn with_pinned(paths: &[PathBuf]) -> Self {
        let mut registry = Self::new();
        for path in paths {
            match DesktopEntry::load(path) {
                Some(entry) => registry.insert_pinned(&entry),
                None => debug!("skipping unreadable pinned entry {}", path.display()),
            }
        }
        registry
    }

    /// Add a pinned launcher, or pin the icon already holding its identifier.
    pub fn insert_pinned(&mut self, entry: &DesktopEntry) {
        let icon = ApplicationIcon::from_desktop_entry(entry, true);
        match self.get_mut(&icon.identifier) {
            Some(existing) => {
                warn!(
                    identifier = %icon.identifier,
                    "{} duplicates an existing launcher",
                    entry.path.display()
                );
                existing.pinned = true;
                existing.desktop_path.get_or_insert_with(|| entry.path.clone());
            }
            None => self.icons.push(icon),
        }
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApplicationIcon> {
        self.icons.iter()
    }

    pub fn icons(&self) -> &[ApplicationIcon] {
        &self.icons
    }

    pub fn get(&self, identifier: &str) -> Option<&ApplicationIcon> {
        self.icons.iter().find(|i| i.identifier == identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut ApplicationIcon> {
        self.icons.iter_mut().find(|i| i.identifier == identifier)
    }

    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.icons.iter().position(|i| i.identifier == identifier)
    }

    /// Attach `window` to the icon for `identifier`, creating the icon if
    /// needed. Adding a window twice is a no-op. A window moves out of any
    /// other icon that held it.
    pub fn resolve_or_create(
        &mut self,
        identifier: &str,
        display_name: &str,
        window: WindowRef,
    ) -> &ApplicationIcon {
        let held_elsewhere = self
            .icons
            .iter()
            .any(|i| i.has_window(window) && i.identifier != identifier);
        if held_elsewhere {
            self.remove_window(window);
        }

        let index = match self.position(identifier) {
            Some(index) => index,
            None => {
                let name = if display_name.is_empty() { identifier } else { display_name };
                self.icons.push(ApplicationIcon::new(identifier, name));
                self.icons.len() - 1
            }
        };
        let icon = &mut self.icons[index];
        icon.add_window(window);
        icon
    }

    /// Detach `window` from whichever icon holds it. Returns `None` if no
    /// icon did.
    pub fn remove_window(&mut self, window: WindowRef) -> Option<Removal> {
        let index = self.icons.iter().position(|i| i.has_window(window))?;
        let icon = &mut self.icons[index];
        icon.remove_window(window);
        let identifier = icon.identifier.clone();
        let destroyed = icon.is_disposable();
        if destroyed {
            self.icons.remove(index);
        }
        Some(Removal { identifier, destroyed })
    }

    /// Mark the icon pinned and remember its launcher. Returns `false` for
    /// unknown identifiers.
    pub fn pin(&mut self, identifier: &str, desktop_path: &Path) -> bool {
        match self.get_mut(identifier) {
            Some(icon) => {
                icon.pinned = true;
                icon.desktop_path = Some(desktop_path.to_path_buf());
                true
            }
            None => false,
        }
    }

    /// Clear the pinned flag. Returns whether the icon was destroyed
    /// because it had no windows left.
    pub fn unpin(&mut self, identifier: &str) -> bool {
        let Some(index) = self.position(identifier) else {
            return false;
        };
        self.icons[index].pinned = false;
        if self.icons[index].is_disposable() {
            self.icons.remove(index);
            return true;
        }
        false
    }

    /// Clear every active flag, then set it on the icon holding `window`.
    pub fn set_active(&mut self, window: Option<WindowRef>) {
        for icon in &mut self.icons {
            let active = window.is_some_and(|w| icon.has_window(w));
            icon.active = active;
        }
    }

    pub fn active(&self) -> Option<&ApplicationIcon> {
        self.icons.iter().find(|i| i.active)
    }

    /// Hover exactly one icon, or none.
    pub fn set_hovered(&mut self, identifier: Option<&str>) {
        for icon in &mut self.icons {
            icon.hovered = identifier == Some(icon.identifier.as_str());
        }
    }

    pub fn hovered(&self) -> Option<&ApplicationIcon> {
        self.icons.iter().find(|i| i.hovered)
    }
}
