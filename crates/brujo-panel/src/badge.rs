/// Text of the window-count badge, or `None` when no badge is shown.
pub fn badge_text(window_count: usize) -> Option<String> {
    match window_count {
        0 | 1 => None,
        2..=9 => Some(window_count.to_string()),
        _ => Some("9+".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_rule() {
        assert_eq!(badge_text(0), None);
        assert_eq!(badge_text(1), None);
        assert_eq!(badge_text(2).as_deref(), Some("2"));
        assert_eq!(badge_text(9).as_deref(), Some("9"));
        assert_eq!(badge_text(10).as_deref(), Some("9+"));
        assert_eq!(badge_text(15).as_deref(), Some("9+"));
    }
}
