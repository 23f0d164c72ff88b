use crate::app_config::{AppConfig, Environment, ViabilityThresholds};
use crate::ConfigError;

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
/// Decoupled from the real environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_rate = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let rate = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(invalid(var, format!("{rate} is outside 0.0..=1.0")))
        }
    };

    let env = parse_environment(&or_default("NGPOST_ENV", "development"))?;
    let bind_addr = parse_addr("NGPOST_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("NGPOST_LOG_LEVEL", "info");
    let postal_codes_path = lookup("NGPOST_POSTAL_CODES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let geocoder_base_url = or_default(
        "NGPOST_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org/",
    );
    let geocoder_user_agent = or_default(
        "NGPOST_GEOCODER_USER_AGENT",
        "NigerianPostalCodeFinder/1.0",
    );
    let geocoder_timeout_secs = parse_u64("NGPOST_GEOCODER_TIMEOUT_SECS", "10")?;
    if geocoder_timeout_secs == 0 {
        return Err(invalid(
            "NGPOST_GEOCODER_TIMEOUT_SECS",
            "timeout must be at least one second".to_string(),
        ));
    }
    let geocoder_min_interval_ms = parse_u64("NGPOST_GEOCODER_MIN_INTERVAL_MS", "2000")?;

    let viable = parse_rate("NGPOST_VIABLE_SUCCESS_RATE", "0.8")?;
    let conditional = parse_rate("NGPOST_CONDITIONAL_SUCCESS_RATE", "0.5")?;
    if conditional > viable {
        return Err(invalid(
            "NGPOST_CONDITIONAL_SUCCESS_RATE",
            format!("{conditional} exceeds the viable threshold {viable}"),
        ));
    }

    let api_rate_limit_per_minute = parse_usize("NGPOST_API_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        postal_codes_path,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_min_interval_ms,
        viability: ViabilityThresholds {
            viable,
            conditional,
        },
        api_rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NGPOST_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
