use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const DEFAULT_AUTOTRADER_SEARCH_URL: &str = "https://www.autotrader.com/cars-for-sale/searchresults.xhtml?zip=30301&searchRadius=50&sortBy=relevance&numRecords=100&firstRecord={offset}";

pub const DEFAULT_AUTOTRADER_OWNER_URL: &str =
    "https://www.autotrader.com/car-dealers/dealer-details?dealerId=";

pub const DEFAULT_CARS_SEARCH_URL: &str = "https://www.cars.com/for-sale/searchresults.action/?zip=30301&radius=50&perPage=100&page={page}";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{other}\""),
            }),
        }
    };

    let template = |var: &str, default: &str, placeholder: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.contains(placeholder) {
            Ok(raw)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("URL template must contain {placeholder}"),
            })
        }
    };

    let env = parse_environment(&or_default("PSCRAPER_ENV", "development"))?;
    let log_level = or_default("PSCRAPER_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("PSCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PSCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let strict_http_status = parse_bool("PSCRAPER_STRICT_HTTP_STATUS", "false")?;

    let autotrader_search_url = template(
        "PSCRAPER_AUTOTRADER_SEARCH_URL",
        DEFAULT_AUTOTRADER_SEARCH_URL,
        "{offset}",
    )?;
    let autotrader_owner_url =
        or_default("PSCRAPER_AUTOTRADER_OWNER_URL", DEFAULT_AUTOTRADER_OWNER_URL);
    let cars_search_url = template("PSCRAPER_CARS_SEARCH_URL", DEFAULT_CARS_SEARCH_URL, "{page}")?;

    // An empty webhook is the same as no webhook.
    let slack_webhook_url = lookup("SLACK_WEBHOOK_URL")
        .ok()
        .filter(|url| !url.trim().is_empty());

    Ok(AppConfig {
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        strict_http_status,
        autotrader_search_url,
        autotrader_owner_url,
        cars_search_url,
        slack_webhook_url,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PSCRAPER_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
