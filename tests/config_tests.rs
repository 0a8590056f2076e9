// Host-side tests for page configuration and query-string overrides.

use mobrave_core::{AppConfig, ConfigError, DEFAULT_CONSOLE_CAP, DEFAULT_STEP_THRESHOLD};

#[test]
fn defaults() {
    let c = AppConfig::default();
    assert_eq!(c.weights_url, "/v1_test_weights.bin");
    assert_eq!(c.patcher_url, "/patch.export.json");
    assert_eq!(c.midi_manifest_url, "/midi/manifest.json");
    assert_eq!(c.metrics_interval_ms, 33);
    assert_eq!(c.step_threshold, DEFAULT_STEP_THRESHOLD);
    assert_eq!(c.console_cap_bytes, DEFAULT_CONSOLE_CAP);
    assert_eq!(c.console_cap_bytes, 65536);
}

#[test]
fn every_override_key_is_accepted() {
    let mut c = AppConfig::default();
    c.apply_override("weights", "/models/v2.bin").unwrap();
    c.apply_override("patcher", "/alt.export.json").unwrap();
    c.apply_override("midi", "/m/list.json").unwrap();
    c.apply_override("metrics_ms", " 100 ").unwrap();
    c.apply_override("step_threshold", "8.5").unwrap();
    assert_eq!(c.weights_url, "/models/v2.bin");
    assert_eq!(c.patcher_url, "/alt.export.json");
    assert_eq!(c.midi_manifest_url, "/m/list.json");
    assert_eq!(c.metrics_interval_ms, 100);
    assert_eq!(c.step_threshold, 8.5);
    assert_eq!(AppConfig::OVERRIDE_KEYS.len(), 5);
}

#[test]
fn invalid_values_keep_the_previous_value() {
    let mut c = AppConfig::default();
    assert!(matches!(
        c.apply_override("metrics_ms", "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(c.apply_override("metrics_ms", "fast").is_err());
    assert!(c.apply_override("step_threshold", "-1").is_err());
    assert!(c.apply_override("step_threshold", "inf").is_err());
    assert!(c.apply_override("weights", "  ").is_err());
    assert_eq!(c, AppConfig::default());
}

#[test]
fn unknown_keys_are_rejected() {
    let mut c = AppConfig::default();
    let err = c.apply_override("volume", "11").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "volume"));
}

#[test]
fn with_overrides_skips_failures() {
    let c = AppConfig::default().with_overrides([
        ("metrics_ms", "50"),
        ("metrics_ms", "nope"),
        ("bogus", "1"),
    ]);
    assert_eq!(c.metrics_interval_ms, 50);
}
