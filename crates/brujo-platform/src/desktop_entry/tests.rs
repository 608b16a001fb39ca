use super::*;
use std::path::PathBuf;
use tempfile::TempDir;

const FIREFOX: &str = "\
[Desktop Entry]
Version=1.0
Name=Firefox Web Browser
Name[de]=Firefox-Webbrowser
Exec=firefox %u
Icon=firefox
Type=Application
StartupWMClass=firefox

[Desktop Action new-window]
Name=New Window
Exec=firefox --new-window %u
";

#[test]
fn strips_field_codes() {
    assert_eq!(strip_field_codes("firefox %u"), "firefox");
    assert_eq!(strip_field_codes("code --new-window %F"), "code --new-window");
    assert_eq!(strip_field_codes("app %i %c %k --flag"), "app --flag");
    assert_eq!(strip_field_codes("printf 100%%"), "printf 100%");
    assert_eq!(strip_field_codes("plain"), "plain");
}

#[test]
fn parses_main_group_only() {
    let entry = parse::parse(PathBuf::from("/x/firefox.desktop").as_path(), FIREFOX).unwrap();
    assert_eq!(entry.name, "Firefox Web Browser");
    assert_eq!(entry.icon.as_deref(), Some("firefox"));
    assert_eq!(entry.exec.as_deref(), Some("firefox %u"));
    assert_eq!(entry.command().as_deref(), Some("firefox"));
    assert_eq!(entry.class_hint(), "firefox");
    assert!(entry.is_visible());
}

#[test]
fn rejects_non_applications() {
    let src = "[Desktop Entry]\nName=Docs\nType=Link\nURL=https://example.org\n";
    assert!(parse::parse(std::path::Path::new("/x/docs.desktop"), src).is_none());
}

#[test]
fn class_hint_falls_back_to_stem() {
    let src = "[Desktop Entry]\nName=Terminal\nExec=gnome-terminal\nType=Application\n";
    let entry = parse::parse(std::path::Path::new("/x/org.gnome.Terminal.desktop"), src).unwrap();
    assert_eq!(entry.stem(), "org.gnome.Terminal");
    assert_eq!(entry.class_hint(), "org.gnome.Terminal");
    assert!(entry.icon.is_none());
}

#[test]
fn hidden_entries_are_parsed_but_invisible() {
    let src = "[Desktop Entry]\nName=Helper\nType=Application\nNoDisplay=true\n";
    let entry = parse::parse(std::path::Path::new("/x/helper.desktop"), src).unwrap();
    assert!(!entry.is_visible());
}

#[test]
fn index_shadows_lower_priority_dirs() {
    let user = TempDir::new().unwrap();
    let system = TempDir::new().unwrap();
    std::fs::write(
        user.path().join("firefox.desktop"),
        "[Desktop Entry]\nName=My Firefox\nType=Application\n",
    )
    .unwrap();
    std::fs::write(system.path().join("firefox.desktop"), FIREFOX).unwrap();
    std::fs::write(
        system.path().join("terminal.desktop"),
        "[Desktop Entry]\nName=Terminal\nType=Application\nExec=xterm\n",
    )
    .unwrap();
    std::fs::write(system.path().join("notes.txt"), "ignored").unwrap();

    let index = DesktopIndex::scan(&[user.path().into(), system.path().into(), "/missing".into()]);
    assert_eq!(index.entries().len(), 2);
    let firefox = index.find(|e| e.stem() == "firefox").unwrap();
    assert_eq!(firefox.name, "My Firefox");
    assert!(index.by_path(&system.path().join("terminal.desktop")).is_some());
}

#[test]
fn load_missing_file() {
    assert!(DesktopEntry::load(std::path::Path::new("/nonexistent.desktop")).is_none());
}
