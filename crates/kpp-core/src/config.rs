use crate::app_config::{AppConfig, Environment, ListLayout, SelectionMode};
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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
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

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let env = parse_environment(&or_default("KPP_ENV", "development"))?;
    let data_source = or_default("KPP_DATA_SOURCE", "data/checkpoints.geojson");
    if data_source.trim().is_empty() {
        return Err(invalid("KPP_DATA_SOURCE", "must not be empty".to_string()));
    }
    let fields_path = lookup("KPP_FIELDS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let log_level = or_default("KPP_LOG_LEVEL", "info");

    let search_debounce_ms = parse_u64("KPP_SEARCH_DEBOUNCE_MS", "120")?;
    let list_limit = parse_usize("KPP_LIST_LIMIT", "200")?;
    if list_limit == 0 {
        return Err(invalid("KPP_LIST_LIMIT", "must be at least 1".to_string()));
    }
    let list_layout = parse_list_layout(&or_default("KPP_LIST_LAYOUT", "flat"))?;
    let selection_mode = parse_selection_mode(&or_default("KPP_SELECTION_MODE", "multi"))?;

    let cluster_radius = parse_u32("KPP_CLUSTER_RADIUS", "46")?;
    let cluster_max_zoom = parse_u32("KPP_CLUSTER_MAX_ZOOM", "9")?;
    let focus_min_zoom = parse_f64("KPP_FOCUS_MIN_ZOOM", "7")?;
    let map_ready_timeout_ms = parse_u64("KPP_MAP_READY_TIMEOUT_MS", "0")?;

    let http_timeout_secs = parse_u64("KPP_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("KPP_USER_AGENT", "kpp/0.1 (checkpoint-map)");

    Ok(AppConfig {
        env,
        data_source,
        fields_path,
        log_level,
        search_debounce_ms,
        list_limit,
        list_layout,
        selection_mode,
        cluster_radius,
        cluster_max_zoom,
        focus_min_zoom,
        map_ready_timeout_ms,
        http_timeout_secs,
        user_agent,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "KPP_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

fn parse_selection_mode(s: &str) -> Result<SelectionMode, ConfigError> {
    match s {
        "multi" => Ok(SelectionMode::Multi),
        "single" => Ok(SelectionMode::Single),
        other => Err(ConfigError::InvalidEnvVar {
            var: "KPP_SELECTION_MODE".to_string(),
            reason: format!("expected multi or single, got '{other}'"),
        }),
    }
}

fn parse_list_layout(s: &str) -> Result<ListLayout, ConfigError> {
    match s {
        "flat" => Ok(ListLayout::Flat),
        "grouped" => Ok(ListLayout::GroupedByCountry),
        other => Err(ConfigError::InvalidEnvVar {
            var: "KPP_LIST_LAYOUT".to_string(),
            reason: format!("expected flat or grouped, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
