use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "NGPOST_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults are valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.postal_codes_path.is_none());
    assert_eq!(cfg.geocoder_base_url, "https://nominatim.openstreetmap.org/");
    assert_eq!(cfg.geocoder_user_agent, "NigerianPostalCodeFinder/1.0");
    assert_eq!(cfg.geocoder_timeout_secs, 10);
    assert_eq!(cfg.geocoder_min_interval_ms, 2000);
    assert_eq!(cfg.viability, ViabilityThresholds::default());
    assert_eq!(cfg.api_rate_limit_per_minute, 120);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("NGPOST_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NGPOST_BIND_ADDR"),
        "expected InvalidEnvVar(NGPOST_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn geocoder_min_interval_override() {
    let mut map = HashMap::new();
    map.insert("NGPOST_GEOCODER_MIN_INTERVAL_MS", "500");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.geocoder_min_interval_ms, 500);
}

#[test]
fn geocoder_timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("NGPOST_GEOCODER_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NGPOST_GEOCODER_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn geocoder_timeout_non_numeric_is_rejected() {
    let mut map = HashMap::new();
    map.insert("NGPOST_GEOCODER_TIMEOUT_SECS", "ten");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn viability_thresholds_override() {
    let mut map = HashMap::new();
    map.insert("NGPOST_VIABLE_SUCCESS_RATE", "0.9");
    map.insert("NGPOST_CONDITIONAL_SUCCESS_RATE", "0.6");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.viability.viable - 0.9).abs() < f64::EPSILON);
    assert!((cfg.viability.conditional - 0.6).abs() < f64::EPSILON);
}

#[test]
fn viability_threshold_out_of_range_is_rejected() {
    let mut map = HashMap::new();
    map.insert("NGPOST_VIABLE_SUCCESS_RATE", "1.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NGPOST_VIABLE_SUCCESS_RATE"),
        "got: {result:?}"
    );
}

#[test]
fn conditional_above_viable_is_rejected() {
    let mut map = HashMap::new();
    map.insert("NGPOST_VIABLE_SUCCESS_RATE", "0.5");
    map.insert("NGPOST_CONDITIONAL_SUCCESS_RATE", "0.7");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NGPOST_CONDITIONAL_SUCCESS_RATE"),
        "got: {result:?}"
    );
}

#[test]
fn blank_postal_codes_path_is_ignored() {
    let mut map = HashMap::new();
    map.insert("NGPOST_POSTAL_CODES_PATH", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.postal_codes_path.is_none());
}

#[test]
fn postal_codes_path_override() {
    let mut map = HashMap::new();
    map.insert("NGPOST_POSTAL_CODES_PATH", "./data/custom.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.postal_codes_path.as_deref(),
        Some(std::path::Path::new("./data/custom.yaml"))
    );
}

#[test]
fn debug_output_lists_fields() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(rendered.contains("geocoder_user_agent"));
    assert!(rendered.contains("NigerianPostalCodeFinder/1.0"));
}
