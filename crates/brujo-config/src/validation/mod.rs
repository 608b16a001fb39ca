//! Settings validation.
//!
//! Checks numeric ranges and the language code, collecting every problem
//! into a single `ConfigError`. Plugin names are not checked here; the
//! plugin host warns about names it cannot resolve.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::DockSettings;
use brujo_common::ConfigError;
use helpers::{validate_language, validate_range};

/// Run all validations, collecting all errors.
pub fn validate(settings: &DockSettings) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(&mut errors, "default_height", settings.default_height, 16, 256);
    validate_range(&mut errors, "dock_padding_x", settings.dock_padding_x, 0, 128);
    validate_range(&mut errors, "dock_padding_y", settings.dock_padding_y, 0, 64);
    validate_range(&mut errors, "corner_radius", settings.corner_radius, 0, 128);
    validate_range(&mut errors, "dock_spacing", settings.dock_spacing, 0, 64);

    if let Some(lang) = &settings.language {
        validate_language(&mut errors, lang);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
