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

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("YOUTUBE_API_KEY", "yt-test-key");
    m
}

fn with_airtable<'a>(mut m: HashMap<&'a str, &'a str>) -> HashMap<&'a str, &'a str> {
    m.insert("AIRTABLE_API_KEY", "pat-test");
    m.insert("AIRTABLE_BASE_ID", "appBase123");
    m.insert("AIRTABLE_TABLE_NAME", "Comments");
    m
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "YOUTUBE_API_KEY"),
        "expected MissingEnvVar(YOUTUBE_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("YOUTUBE_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.youtube_api_key, "yt-test-key");
    assert_eq!(
        cfg.youtube_api_base_url,
        "https://www.googleapis.com/youtube/v3/"
    );
    assert_eq!(cfg.log_level, "warn");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "ytlens/0.1 (channel-analytics)");
    assert_eq!(cfg.comment_page_size, 100);
    assert_eq!(cfg.inter_page_delay_ms, 100);
    assert!(cfg.airtable.is_none());
}

#[test]
fn request_timeout_override() {
    let mut map = full_env();
    map.insert("YTLENS_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("YTLENS_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YTLENS_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(YTLENS_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn request_timeout_zero_is_rejected() {
    let mut map = full_env();
    map.insert("YTLENS_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YTLENS_REQUEST_TIMEOUT_SECS")
    );
}

#[test]
fn comment_page_size_override() {
    let mut map = full_env();
    map.insert("YTLENS_COMMENT_PAGE_SIZE", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.comment_page_size, 25);
}

#[test]
fn comment_page_size_above_api_limit_is_rejected() {
    let mut map = full_env();
    map.insert("YTLENS_COMMENT_PAGE_SIZE", "101");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YTLENS_COMMENT_PAGE_SIZE"),
        "expected InvalidEnvVar(YTLENS_COMMENT_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn comment_page_size_zero_is_rejected() {
    let mut map = full_env();
    map.insert("YTLENS_COMMENT_PAGE_SIZE", "0");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn inter_page_delay_override() {
    let mut map = full_env();
    map.insert("YTLENS_INTER_PAGE_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.inter_page_delay_ms, 0);
}

#[test]
fn airtable_enabled_when_all_credentials_present() {
    let map = with_airtable(full_env());
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let airtable = cfg.airtable.expect("airtable should be configured");
    assert_eq!(airtable.base_id, "appBase123");
    assert_eq!(airtable.table_name, "Comments");
    assert_eq!(airtable.api_base_url, "https://api.airtable.com/v0/");
}

#[test]
fn airtable_disabled_when_credentials_partial() {
    let mut map = with_airtable(full_env());
    map.remove("AIRTABLE_TABLE_NAME");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.airtable.is_none());
}

#[test]
fn debug_output_redacts_secrets() {
    let map = with_airtable(full_env());
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("yt-test-key"), "{rendered}");
    assert!(!rendered.contains("pat-test"), "{rendered}");
    assert!(rendered.contains("[redacted]"));
}
