use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::DesktopEntry;

static FIELD_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%[fFuUdDnNickvm]").unwrap());

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Remove `%f`, `%U` and friends from an `Exec` line. A literal `%%`
/// becomes `%`.
pub fn strip_field_codes(exec: &str) -> String {
    let escaped = exec.replace("%%", "\u{0}");
    let stripped = FIELD_CODE.replace_all(&escaped, "");
    let collapsed = SPACES.replace_all(stripped.trim(), " ");
    collapsed.replace('\u{0}', "%")
}

pub(super) fn parse(path: &Path, content: &str) -> Option<DesktopEntry> {
    let mut entry = DesktopEntry {
        path: path.to_path_buf(),
        ..Default::default()
    };
    let mut in_entry = false;
    let mut name = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            if in_entry {
                break;
            }
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Type" if value != "Application" => return None,
            "Name" => name = Some(value.to_string()),
            "Icon" if !value.is_empty() => entry.icon = Some(value.to_string()),
            "Exec" if !value.is_empty() => entry.exec = Some(value.to_string()),
            "StartupWMClass" if !value.is_empty() => {
                entry.startup_wm_class = Some(value.to_string())
            }
            "NoDisplay" => entry.no_display = value.eq_ignore_ascii_case("true"),
            "Hidden" => entry.hidden = value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    if !in_entry && name.is_none() {
        return None;
    }
    entry.name = name.unwrap_or_else(|| entry.stem().to_string());
    Some(entry)
}
