//! Maps window-manager classes to application identifiers.
//!
//! Two windows share a dock icon exactly when they map to the same
//! identifier. Most applications only need the alias table; LibreOffice
//! and Chromium-style browsers run several logical applications in one
//! class and get special handling.

use brujo_platform::{ProcReader, WindowInfo};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Vendor and packaging variants that should group with their base name.
const CLASS_ALIASES: &[(&str, &str)] = &[
    ("vivaldi-stable", "vivaldi"),
    ("vivaldi-snapshot", "vivaldi"),
    ("vivaldi-nightly", "vivaldi"),
    ("gnome-terminal-server", "gnome-terminal"),
    ("jetbrains-pycharm", "pycharm"),
    ("jetbrains-pycharm-ce", "pycharm"),
    ("jetbrains-idea", "idea"),
    ("jetbrains-clion", "clion"),
    ("thunderbird-bin", "thunderbird"),
    ("firefox-bin", "firefox"),
    ("google-chrome", "chrome"),
    ("chromium-browser", "chromium"),
    ("code", "vscode"),
    ("code-oss", "vscode"),
    ("doublecmd64", "doublecmd"),
];

/// Identifiers whose icon theme name differs from the identifier.
const ICON_ALIASES: &[(&str, &str)] = &[
    ("libreoffice-calc-fallback", "libreoffice"),
    ("vscode", "visual-studio-code"),
    ("gnome-terminal", "org.gnome.Terminal"),
];

/// Browsers that can host `--app=<url>` windows under their own class.
const CHROMIUM_FAMILY: &[&str] = &["chromium", "chrome", "vivaldi", "brave-browser", "microsoft-edge"];

/// `(substring, identifier)` in match order. `writer` is the fallback.
const LIBREOFFICE_PARTS: &[(&str, &str)] = &[
    ("calc", "libreoffice-calc"),
    ("base", "libreoffice-base"),
    ("impress", "libreoffice-impress"),
    ("draw", "libreoffice-draw"),
    ("math", "libreoffice-math"),
    ("writer", "libreoffice-writer"),
];

pub fn normalize(raw_class: &str) -> String {
    let key = raw_class.to_lowercase();
    CLASS_ALIASES
        .iter()
        .find(|(from, _)| *from == key)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or(key)
}

pub fn icon_name_for_identifier(identifier: &str) -> &str {
    ICON_ALIASES
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, name)| *name)
        .unwrap_or(identifier)
}

/// Pick the LibreOffice component from the instance name, then the title.
pub fn resolve_libreoffice_variant(instance: &str, title: &str) -> &'static str {
    let instance = instance.to_lowercase();
    if let Some((_, id)) = LIBREOFFICE_PARTS
        .iter()
        .find(|(part, _)| instance.contains(part))
    {
        return id;
    }
    let title = title.to_lowercase();
    LIBREOFFICE_PARTS[..5]
        .iter()
        .find(|(part, _)| title.contains(part))
        .map(|(_, id)| *id)
        .unwrap_or("libreoffice-writer")
}

/// `base-NNN` for a browser process started with `--app=<url>`, `base`
/// otherwise. Unreadable process info falls back to `base`.
pub fn resolve_chromium_app_id(base: &str, pid: Option<u32>, proc: &ProcReader) -> String {
    let Some(pid) = pid else {
        return base.to_string();
    };
    match proc.cmdline(pid) {
        Ok(args) => chromium_app_id(base, &args).unwrap_or_else(|| base.to_string()),
        Err(e) => {
            debug!(pid, "cmdline unavailable, using class: {e}");
            base.to_string()
        }
    }
}

fn chromium_app_id(base: &str, args: &[String]) -> Option<String> {
    let url = args
        .iter()
        .find_map(|arg| arg.strip_prefix("--app="))
        .map(|url| url.trim_matches('"'))
        .filter(|url| !url.is_empty())?;
    Some(format!("{base}-{}", url_suffix(url)))
}

/// Stable across runs, unlike a per-process hasher.
fn url_suffix(url: &str) -> u64 {
    let digest = Sha256::digest(url.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head) % 1000
}

/// Identifier for a client window.
pub fn identify(info: &WindowInfo, proc: &ProcReader) -> String {
    let class = if info.class_name.is_empty() {
        &info.class_instance
    } else {
        &info.class_name
    };
    let lower = class.to_lowercase();
    if lower.contains("libreoffice") || lower.contains("soffice") {
        return resolve_libreoffice_variant(&info.class_instance, &info.title).to_string();
    }
    let base = normalize(class);
    if CHROMIUM_FAMILY.contains(&base.as_str()) {
        return resolve_chromium_app_id(&base, info.pid, proc);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use brujo_common::WindowId;

    fn write_cmdline(root: &std::path::Path, pid: u32, args: &[&str]) {
        let dir = root.join(pid.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        let mut raw = Vec::new();
        for arg in args {
            raw.extend_from_slice(arg.as_bytes());
            raw.push(0);
        }
        std::fs::write(dir.join("cmdline"), raw).unwrap();
    }

    #[test]
    fn aliases_are_case_insensitive() {
        assert_eq!(normalize("VIVALDI-STABLE"), "vivaldi");
        assert_eq!(normalize("vivaldi-stable"), "vivaldi");
        assert_eq!(normalize("jetbrains-pycharm-ce"), "pycharm");
    }

    #[test]
    fn unknown_class_is_lowercased() {
        assert_eq!(normalize("Gimp-2.10"), "gimp-2.10");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn icon_names() {
        assert_eq!(icon_name_for_identifier("libreoffice-calc-fallback"), "libreoffice");
        assert_eq!(icon_name_for_identifier("libreoffice-calc"), "libreoffice-calc");
        assert_eq!(icon_name_for_identifier("gimp"), "gimp");
    }

    #[test]
    fn libreoffice_instance_wins_over_title() {
        assert_eq!(
            resolve_libreoffice_variant("libreoffice-calc", "Untitled Impress"),
            "libreoffice-calc"
        );
        assert_eq!(resolve_libreoffice_variant("soffice", "Slides - LibreOffice Impress"), "libreoffice-impress");
        assert_eq!(resolve_libreoffice_variant("soffice", "notes.odt"), "libreoffice-writer");
        assert_eq!(resolve_libreoffice_variant("swriter", "Calc sheet"), "libreoffice-writer");
    }

    #[test]
    fn chromium_app_flag_adds_stable_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        write_cmdline(tmp.path(), 42, &["/usr/bin/chromium", "--app=https://mail.example.com"]);
        let proc = ProcReader::new(tmp.path());

        let id = resolve_chromium_app_id("chromium", Some(42), &proc);
        assert!(id.starts_with("chromium-"));
        assert_eq!(id, resolve_chromium_app_id("chromium", Some(42), &proc));

        let suffix: u64 = id["chromium-".len()..].parse().unwrap();
        assert!(suffix < 1000);
    }

    #[test]
    fn chromium_without_app_flag_keeps_base() {
        let tmp = tempfile::tempdir().unwrap();
        write_cmdline(tmp.path(), 7, &["/usr/bin/chromium", "--incognito"]);
        let proc = ProcReader::new(tmp.path());
        assert_eq!(resolve_chromium_app_id("chromium", Some(7), &proc), "chromium");
    }

    #[test]
    fn unreadable_process_degrades_to_base() {
        let tmp = tempfile::tempdir().unwrap();
        let proc = ProcReader::new(tmp.path());
        assert_eq!(resolve_chromium_app_id("chrome", Some(99), &proc), "chrome");
        assert_eq!(resolve_chromium_app_id("chrome", None, &proc), "chrome");
    }

    #[test]
    fn identify_dispatches_on_class() {
        let tmp = tempfile::tempdir().unwrap();
        let proc = ProcReader::new(tmp.path());

        let mut info = WindowInfo {
            id: WindowId(1),
            class_instance: "libreoffice-impress".into(),
            class_name: "libreoffice-impress".into(),
            title: "talk.odp".into(),
            ..Default::default()
        };
        assert_eq!(identify(&info, &proc), "libreoffice-impress");

        info.class_instance = "vivaldi-stable".into();
        info.class_name = "Vivaldi-stable".into();
        assert_eq!(identify(&info, &proc), "vivaldi");

        info.class_name.clear();
        info.class_instance = "Gedit".into();
        assert_eq!(identify(&info, &proc), "gedit");
    }
}
