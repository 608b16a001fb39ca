use super::*;
use crate::schema::DockSettings;

#[test]
fn default_settings_validate() {
    assert!(validate(&DockSettings::default()).is_ok());
}

#[test]
fn catches_height_too_small() {
    let settings = DockSettings {
        default_height: 8,
        ..Default::default()
    };
    let err = validate(&settings).unwrap_err().to_string();
    assert!(err.contains("default_height = 8"));
}

#[test]
fn catches_spacing_too_large() {
    let settings = DockSettings {
        dock_spacing: 100,
        ..Default::default()
    };
    let err = validate(&settings).unwrap_err().to_string();
    assert!(err.contains("dock_spacing"));
}

#[test]
fn collects_multiple_errors() {
    let settings = DockSettings {
        default_height: 1000,
        dock_padding_y: 99,
        ..Default::default()
    };
    let err = validate(&settings).unwrap_err().to_string();
    assert!(err.contains("default_height"));
    assert!(err.contains("dock_padding_y"));
    assert!(err.contains("; "));
}

#[test]
fn language_codes() {
    for ok in ["en", "ru", "pt_BR", "zh-Hans", "fil"] {
        let settings = DockSettings {
            language: Some(ok.into()),
            ..Default::default()
        };
        assert!(validate(&settings).is_ok(), "{ok} should be accepted");
    }
    for bad in ["", "english", "EN", "en_", "../etc"] {
        let settings = DockSettings {
            language: Some(bad.into()),
            ..Default::default()
        };
        assert!(validate(&settings).is_err(), "{bad} should be rejected");
    }
}

#[test]
fn null_language_is_fine() {
    let settings = DockSettings {
        language: None,
        ..Default::default()
    };
    assert!(validate(&settings).is_ok());
}
