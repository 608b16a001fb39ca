//! strftime rendering and zone offsets.
//!
//! chrono panics while displaying a format string it cannot parse, so
//! every format is checked with [`validate`] before it is used.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset};

use brujo_common::PluginError;

/// Reject formats containing specifiers chrono does not know.
pub fn validate(format: &str) -> Result<(), PluginError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(PluginError::Settings(format!("invalid time format {format:?}")));
    }
    Ok(())
}

/// Render `time` with `format`. `%p` gives `AM`/`PM` and `%P` gives
/// `am`/`pm`.
pub fn render(time: &DateTime<FixedOffset>, format: &str) -> Result<String, PluginError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(PluginError::Settings(format!("invalid time format {format:?}")));
    }
    let mut out = String::new();
    write!(out, "{}", time.format_with_items(items.iter()))
        .map_err(|_| PluginError::Draw(format!("cannot render {format:?}")))?;
    Ok(out)
}

/// A timezone the tooltip can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    /// `local`, `UTC`/`GMT`, or `UTC±H[H][:MM]`. Named zones are not
    /// supported.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.eq_ignore_ascii_case("local") {
            return Some(Self::Local);
        }
        let upper = spec.to_ascii_uppercase();
        let rest = upper.strip_prefix("UTC").or_else(|| upper.strip_prefix("GMT"))?;
        if rest.is_empty() {
            return FixedOffset::east_opt(0).map(Self::Fixed);
        }
        let (sign, rest) = match rest.as_bytes()[0] {
            b'+' => (1, &rest[1..]),
            b'-' => (-1, &rest[1..]),
            _ => return None,
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None => (rest, "0"),
        };
        if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hours: i32 = hours.parse().ok()?;
        let minutes: i32 = minutes.parse().ok()?;
        if hours > 14 || minutes > 59 {
            return None;
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(Self::Fixed)
    }

    pub fn at(self, local: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => *local,
            Self::Fixed(offset) => local.with_timezone(&offset),
        }
    }
}

/// `UTC+03:00` style label for an offset.
pub fn offset_label(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.abs();
    format!("UTC{sign}{:02}:{:02}", seconds / 3600, seconds % 3600 / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn evening() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 9, 19, 5, 7)
            .unwrap()
    }

    #[test]
    fn renders_twelve_hour_clock() {
        assert_eq!(render(&evening(), "%-I:%M:%S %p").unwrap(), "7:05:07 PM");
        assert_eq!(render(&evening(), "%-I:%M %P").unwrap(), "7:05 pm");
        assert_eq!(render(&evening(), "%d.%m.%y").unwrap(), "09.03.24");
    }

    #[test]
    fn bad_format_is_an_error_not_a_panic() {
        assert!(validate("%Q").is_err());
        assert!(render(&evening(), "%H:%Q").is_err());
        assert!(validate("%H:%M").is_ok());
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(Zone::parse("local"), Some(Zone::Local));
        assert_eq!(Zone::parse("UTC"), Some(Zone::Fixed(FixedOffset::east_opt(0).unwrap())));
        assert_eq!(
            Zone::parse("utc+5:30"),
            Some(Zone::Fixed(FixedOffset::east_opt(5 * 3600 + 1800).unwrap()))
        );
        assert_eq!(Zone::parse("GMT-8"), Some(Zone::Fixed(FixedOffset::west_opt(8 * 3600).unwrap())));
        assert_eq!(Zone::parse("Europe/Madrid"), None);
        assert_eq!(Zone::parse("UTC+99"), None);
    }

    #[test]
    fn converts_between_zones() {
        let utc = Zone::parse("UTC").unwrap().at(&evening());
        assert_eq!(render(&utc, "%H:%M").unwrap(), "16:05");
    }

    #[test]
    fn labels_offsets() {
        assert_eq!(offset_label(FixedOffset::east_opt(3 * 3600).unwrap()), "UTC+03:00");
        assert_eq!(offset_label(FixedOffset::west_opt(5 * 3600 + 1800).unwrap()), "UTC-05:30");
        assert_eq!(offset_label(FixedOffset::east_opt(0).unwrap()), "UTC");
    }
}
