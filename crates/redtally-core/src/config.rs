use crate::app_config::AppConfig;
use crate::channels::normalize_channel;
use crate::ConfigError;

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
/// Decoupled from the process environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let reddit_client_id = require("REDDIT_CLIENT_ID")?;
    let reddit_client_secret = require("REDDIT_CLIENT_SECRET")?;
    let reddit_user_agent = or_default("REDDIT_USER_AGENT", "redtally/0.1 (mention-tracking)");

    let log_level = or_default("REDTALLY_LOG_LEVEL", "info");
    let games_path = PathBuf::from(or_default("REDTALLY_GAMES_PATH", "./config/games.yaml"));
    let subreddits = parse_subreddit_list(&or_default("REDTALLY_SUBREDDITS", ""));

    let request_timeout_secs = parse_u64("REDTALLY_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("REDTALLY_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("REDTALLY_RETRY_BACKOFF_BASE_MS", "1000")?;
    let coverage_ceiling = parse_usize("REDTALLY_COVERAGE_CEILING", "250")?;

    if coverage_ceiling == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REDTALLY_COVERAGE_CEILING".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        reddit_client_id,
        reddit_client_secret,
        reddit_user_agent,
        log_level,
        games_path,
        subreddits,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        coverage_ceiling,
    })
}

/// Split a comma-separated subreddit list, normalizing each entry and
/// dropping blanks.
fn parse_subreddit_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_channel)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
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

    /// Returns a map with all required env vars populated.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("REDDIT_CLIENT_ID", "client-id");
        m.insert("REDDIT_CLIENT_SECRET", "client-secret");
        m
    }

    #[test]
    fn build_app_config_fails_without_client_id() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "REDDIT_CLIENT_ID"),
            "expected MissingEnvVar(REDDIT_CLIENT_ID), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_treats_blank_secret_as_missing() {
        let mut map = full_env();
        map.insert("REDDIT_CLIENT_SECRET", "   ");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "REDDIT_CLIENT_SECRET"),
            "expected MissingEnvVar(REDDIT_CLIENT_SECRET), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.reddit_user_agent, "redtally/0.1 (mention-tracking)");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.games_path.to_str(), Some("./config/games.yaml"));
        assert!(cfg.subreddits.is_empty());
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_ms, 1000);
        assert_eq!(cfg.coverage_ceiling, 250);
    }

    #[test]
    fn subreddit_list_is_normalized() {
        let mut map = full_env();
        map.insert("REDTALLY_SUBREDDITS", " r/gaming, indiegaming ,,r/pcgaming");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.subreddits, vec!["gaming", "indiegaming", "pcgaming"]);
    }

    #[test]
    fn coverage_ceiling_override() {
        let mut map = full_env();
        map.insert("REDTALLY_COVERAGE_CEILING", "1000");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.coverage_ceiling, 1000);
    }

    #[test]
    fn coverage_ceiling_zero_is_rejected() {
        let mut map = full_env();
        map.insert("REDTALLY_COVERAGE_CEILING", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REDTALLY_COVERAGE_CEILING"),
            "expected InvalidEnvVar(REDTALLY_COVERAGE_CEILING), got: {result:?}"
        );
    }

    #[test]
    fn max_retries_invalid() {
        let mut map = full_env();
        map.insert("REDTALLY_MAX_RETRIES", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REDTALLY_MAX_RETRIES"),
            "expected InvalidEnvVar(REDTALLY_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn debug_redacts_credentials() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("client-secret"));
        assert!(!rendered.contains("client-id"));
    }
}
