use std::path::PathBuf;

use brujo_common::PlatformError;

pub(super) const APP_NAME: &str = "brujo-dock";

/// `$XDG_DATA_HOME/brujo-dock` (defaults to `~/.local/share/brujo-dock`).
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine data directory".into()))?
        .join(APP_NAME))
}

/// Located at `data_dir()/logs`.
pub fn log_dir() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("logs"))
}

/// XDG data directories, user directory first.
pub(super) fn data_search_dirs(data_home: Option<PathBuf>, data_dirs: Option<String>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = data_home.into_iter().collect();
    let system = data_dirs.unwrap_or_else(|| "/usr/local/share:/usr/share".into());
    out.extend(
        system
            .split(':')
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
    );
    out.dedup();
    out
}

fn xdg_data_dirs() -> Vec<PathBuf> {
    data_search_dirs(dirs::data_dir(), std::env::var("XDG_DATA_DIRS").ok())
}

/// Directories scanned for `.desktop` files, highest priority first.
pub fn application_dirs() -> Vec<PathBuf> {
    xdg_data_dirs()
        .into_iter()
        .map(|d| d.join("applications"))
        .collect()
}

/// Roots of the `icons/` hierarchy (`~/.icons` first, as per the icon
/// theme spec).
pub fn icon_theme_dirs() -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = dirs::home_dir()
        .map(|h| h.join(".icons"))
        .into_iter()
        .collect();
    out.extend(xdg_data_dirs().into_iter().map(|d| d.join("icons")));
    out
}

pub fn pixmap_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("/usr/share/pixmaps")]
}
