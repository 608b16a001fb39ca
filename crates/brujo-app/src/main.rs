mod app;
mod cli;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use brujo_common::DockError;
use brujo_config::{
    available_languages, default_locale_dirs, detect_language, read_settings, ConfigPaths, LanguageInfo,
    Translator,
};

use app::DockApp;

/// `--language`, then the settings file, then the environment.
fn pick_language(
    cli: Option<&str>,
    configured: Option<&str>,
    detect: impl FnOnce() -> String,
) -> String {
    cli.or(configured)
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
        .unwrap_or_else(detect)
}

fn languages_in(dirs: &[PathBuf]) -> Vec<LanguageInfo> {
    let mut all: Vec<LanguageInfo> = Vec::new();
    for info in dirs.iter().flat_map(|dir| available_languages(dir)) {
        if !all.iter().any(|known| known.code == info.code) {
            all.push(info);
        }
    }
    all
}

fn run(args: cli::Args) -> Result<(), DockError> {
    let paths = match &args.config {
        Some(dir) => ConfigPaths::new(dir),
        None => ConfigPaths::default_location()?,
    };
    // Problems are held back until the subscriber chosen by `log_mode` is up.
    let (settings, problems) = read_settings(&paths);

    logging::init(settings.log_mode, args.log_level.as_deref())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), config = %paths.root().display(), "starting BrujoDock");
    for problem in &problems {
        tracing::warn!("settings: {problem}");
    }

    if let Err(e) = brujo_platform::ensure_dirs() {
        tracing::warn!("cannot create data directories: {e}");
    }

    let locale_dirs = default_locale_dirs(paths.root());
    let language = pick_language(args.language.as_deref(), settings.language.as_deref(), || {
        detect_language(&languages_in(&locale_dirs))
    });
    let translator = Translator::load(&language, &locale_dirs);
    tracing::debug!(%language, "translations loaded");

    DockApp::new(paths, settings, translator)?.run()
}

fn main() -> ExitCode {
    let args = cli::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("brujo-dock: {e}");
            ExitCode::FAILURE
        }
    }
}
