//! The dock's own menu, opened with Ctrl + right click anywhere on the bar.

use brujo_renderer::MenuEntry;

/// Popup owner reported for entries of this menu.
pub const OWNER: &str = "dock";

const PLUGIN_PREFIX: &str = "plugin:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockMenuAction {
    About,
    Settings,
    PluginSettings(String),
    Reload,
    Quit,
}

impl DockMenuAction {
    pub fn parse(action: &str) -> Option<Self> {
        if let Some(name) = action.strip_prefix(PLUGIN_PREFIX) {
            return (!name.is_empty()).then(|| Self::PluginSettings(name.to_string()));
        }
        match action {
            "about" => Some(Self::About),
            "settings" => Some(Self::Settings),
            "reload" => Some(Self::Reload),
            "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Menu entries. `plugins` holds `(name, description)` in dock order.
pub fn entries<'a>(tr: impl Fn(&'a str) -> &'a str, plugins: &[(&'a str, &'a str)]) -> Vec<MenuEntry> {
    let mut entries = vec![
        MenuEntry::item(tr("About"), "about"),
        MenuEntry::item(tr("Settings"), "settings"),
    ];
    entries.extend(plugins.iter().map(|(name, description)| {
        MenuEntry::item(
            format!("{}: {}", tr("Settings"), tr(description)),
            format!("{PLUGIN_PREFIX}{name}"),
        )
    }));
    entries.push(MenuEntry::Separator);
    entries.push(MenuEntry::item(tr("Reload plugins"), "reload"));
    entries.push(MenuEntry::item(tr("Quit"), "quit"));
    entries
}

/// Tooltip text for "About".
pub fn about_lines() -> Vec<String> {
    vec![
        format!("BrujoDock {}", env!("CARGO_PKG_VERSION")),
        env!("CARGO_PKG_DESCRIPTION").to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_parse() {
        assert_eq!(DockMenuAction::parse("about"), Some(DockMenuAction::About));
        assert_eq!(DockMenuAction::parse("quit"), Some(DockMenuAction::Quit));
        assert_eq!(
            DockMenuAction::parse("plugin:clock"),
            Some(DockMenuAction::PluginSettings("clock".into()))
        );
        assert_eq!(DockMenuAction::parse("plugin:"), None);
        assert_eq!(DockMenuAction::parse("launch"), None);
    }

    #[test]
    fn one_settings_entry_per_plugin() {
        let menu = entries(|s| s, &[("clock", "Clock"), ("sysmon", "System monitor")]);
        assert_eq!(menu.len(), 7);
        assert_eq!(menu[2], MenuEntry::item("Settings: Clock", "plugin:clock"));
        assert_eq!(menu[3], MenuEntry::item("Settings: System monitor", "plugin:sysmon"));
        assert_eq!(menu[4], MenuEntry::Separator);
        assert_eq!(menu[6], MenuEntry::item("Quit", "quit"));
    }

    #[test]
    fn about_names_the_version() {
        assert!(about_lines()[0].contains(env!("CARGO_PKG_VERSION")));
    }
}
