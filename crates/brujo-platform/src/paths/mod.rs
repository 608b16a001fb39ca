mod ensure;
mod resolve;

pub use ensure::ensure_dirs;
pub use resolve::{application_dirs, data_dir, icon_theme_dirs, log_dir, pixmap_dirs};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_ends_with_app_name() {
        if let Ok(path) = data_dir() {
            assert!(path.ends_with("brujo-dock"), "got: {path:?}");
        }
    }

    #[test]
    fn log_dir_is_inside_data_dir() {
        let (Ok(log), Ok(data)) = (log_dir(), data_dir()) else {
            return;
        };
        assert!(log.starts_with(&data));
        assert_eq!(log.file_name().unwrap().to_str().unwrap(), "logs");
    }

    #[test]
    fn xdg_data_dirs_are_split_and_ordered() {
        let dirs = resolve::data_search_dirs(
            Some("/home/u/.local/share".into()),
            Some("/usr/local/share:/usr/share:".into()),
        );
        assert_eq!(
            dirs,
            vec![
                std::path::PathBuf::from("/home/u/.local/share"),
                "/usr/local/share".into(),
                "/usr/share".into(),
            ]
        );
    }

    #[test]
    fn xdg_data_dirs_default() {
        let dirs = resolve::data_search_dirs(None, None);
        assert_eq!(
            dirs,
            vec![
                std::path::PathBuf::from("/usr/local/share"),
                "/usr/share".into()
            ]
        );
    }

    #[test]
    fn application_dirs_end_with_applications() {
        for dir in application_dirs() {
            assert!(dir.ends_with("applications"));
        }
    }
}
