use std::path::PathBuf;

use clap::Parser;

/// BrujoDock, a dock for X11 desktops.
#[derive(Parser, Debug)]
#[command(name = "brujo-dock", version, about)]
pub struct Args {
    /// Config directory override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive (debug, info, brujo_plugins=trace, ...).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Interface language, overriding the settings file.
    #[arg(long)]
    pub language: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_overrides() {
        let args = Args::try_parse_from([
            "brujo-dock",
            "--config",
            "/tmp/dock",
            "--log-level",
            "debug",
            "--language",
            "ru",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/dock")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.language.as_deref(), Some("ru"));
    }

    #[test]
    fn everything_is_optional() {
        let args = Args::try_parse_from(["brujo-dock"]).unwrap();
        assert!(args.config.is_none() && args.log_level.is_none() && args.language.is_none());
    }
}
