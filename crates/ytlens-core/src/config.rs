use crate::app_config::{AirtableConfig, AppConfig};
use crate::ConfigError;

/// Upper bound the Data API accepts for `maxResults` on `commentThreads.list`.
pub const MAX_COMMENT_PAGE_SIZE: u32 = 100;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let youtube_api_key = require("YOUTUBE_API_KEY")?;
    let youtube_api_base_url = or_default(
        "YTLENS_API_BASE_URL",
        "https://www.googleapis.com/youtube/v3/",
    );
    let log_level = or_default("YTLENS_LOG_LEVEL", "warn");
    let request_timeout_secs = parse_u64("YTLENS_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "YTLENS_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("YTLENS_USER_AGENT", "ytlens/0.1 (channel-analytics)");

    let comment_page_size = parse_u32("YTLENS_COMMENT_PAGE_SIZE", "100")?;
    if !(1..=MAX_COMMENT_PAGE_SIZE).contains(&comment_page_size) {
        return Err(ConfigError::InvalidEnvVar {
            var: "YTLENS_COMMENT_PAGE_SIZE".to_string(),
            reason: format!("must be between 1 and {MAX_COMMENT_PAGE_SIZE}"),
        });
    }
    let inter_page_delay_ms = parse_u64("YTLENS_INTER_PAGE_DELAY_MS", "100")?;

    let airtable = match (
        optional("AIRTABLE_API_KEY"),
        optional("AIRTABLE_BASE_ID"),
        optional("AIRTABLE_TABLE_NAME"),
    ) {
        (Some(api_key), Some(base_id), Some(table_name)) => Some(AirtableConfig {
            api_key,
            base_id,
            table_name,
            api_base_url: or_default("AIRTABLE_API_BASE_URL", "https://api.airtable.com/v0/"),
        }),
        _ => None,
    };

    Ok(AppConfig {
        youtube_api_key,
        youtube_api_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        comment_page_size,
        inter_page_delay_ms,
        airtable,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
