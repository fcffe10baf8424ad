use crate::app_config::AppConfig;
use crate::ConfigError;

/// Hashtags tracked when `TAGSIGNAL_TAGS` is not set.
const DEFAULT_TAGS: &str = "nifty50,sensex,banknifty,intraday,stockmarketindia";

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

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let bearer_token = require("TAGSIGNAL_BEARER_TOKEN")?;

    let tags = parse_tags(&or_default("TAGSIGNAL_TAGS", DEFAULT_TAGS))?;

    let total_post_target = parse_usize("TAGSIGNAL_TOTAL_POST_TARGET", "2000")?;
    let lookback_days = parse_i64("TAGSIGNAL_LOOKBACK_DAYS", "1")?;
    if lookback_days < 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TAGSIGNAL_LOOKBACK_DAYS".to_string(),
            reason: "must be non-negative".to_string(),
        });
    }

    let since_date = lookup("TAGSIGNAL_SINCE_DATE").ok();

    let api_base_url = or_default("TAGSIGNAL_API_BASE_URL", "https://api.x.com");
    let request_timeout_secs = parse_u64("TAGSIGNAL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TAGSIGNAL_USER_AGENT", "tagsignal/0.1");

    let data_dir = PathBuf::from(or_default("TAGSIGNAL_DATA_DIR", "./data"));
    let raw_path = lookup("TAGSIGNAL_RAW_PATH")
        .map_or_else(|_| data_dir.join("raw_posts.csv"), PathBuf::from);
    let processed_path = lookup("TAGSIGNAL_PROCESSED_PATH")
        .map_or_else(|_| data_dir.join("signals.parquet"), PathBuf::from);

    Ok(AppConfig {
        bearer_token,
        tags,
        total_post_target,
        lookback_days,
        since_date,
        api_base_url,
        request_timeout_secs,
        user_agent,
        data_dir,
        raw_path,
        processed_path,
    })
}

/// Parse a comma-separated tag list. Leading `#` prefixes are stripped so
/// that `#nifty50` and `nifty50` configure the same tag.
fn parse_tags(raw: &str) -> Result<Vec<String>, ConfigError> {
    let tags: Vec<String> = raw
        .split(',')
        .map(|t| t.trim().trim_start_matches('#').to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "TAGSIGNAL_TAGS".to_string(),
            reason: "no tags configured".to_string(),
        });
    }
    Ok(tags)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
