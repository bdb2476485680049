use std::str::FromStr;

use anyhow::{bail, Context, Result};

pub const DEFAULT_EVALUATION_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub evaluation_api_base_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Study hours per week sent with each evaluation.
    pub weekly_hours: f64,
    /// Plan length in weeks sent with each evaluation (1 – 52).
    pub plan_weeks: u32,
    /// No timeout when unset.
    pub evaluation_timeout_secs: Option<u64>,
    /// Idle time after which a wizard session is dropped.
    pub session_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            evaluation_api_base_url: DEFAULT_EVALUATION_API_BASE_URL.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            weekly_hours: 10.0,
            plan_weeks: 4,
            evaluation_timeout_secs: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let config = Config {
            evaluation_api_base_url: optional_env("EVALUATION_API_BASE_URL")
                .unwrap_or(defaults.evaluation_api_base_url),
            port: parse_env("PORT")?.unwrap_or(defaults.port),
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            weekly_hours: parse_env("WEEKLY_HOURS")?.unwrap_or(defaults.weekly_hours),
            plan_weeks: parse_env("PLAN_WEEKS")?.unwrap_or(defaults.plan_weeks),
            evaluation_timeout_secs: parse_env("EVALUATION_TIMEOUT_SECS")?,
            session_ttl_secs: parse_env("SESSION_TTL_SECS")?.unwrap_or(defaults.session_ttl_secs),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.weekly_hours > 0.0 && self.weekly_hours <= 24.0 * 7.0) {
            bail!("WEEKLY_HOURS must be > 0 and at most 168");
        }
        if !(1..=52).contains(&self.plan_weeks) {
            bail!("PLAN_WEEKS must be between 1 and 52");
        }
        if self.session_ttl_secs == 0 {
            bail!("SESSION_TTL_SECS must be greater than 0");
        }
        Ok(())
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional_env(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.evaluation_api_base_url, "http://127.0.0.1:5000");
        assert_eq!(config.port, 8080);
        assert_eq!(config.plan_weeks, 4);
        assert!(config.evaluation_timeout_secs.is_none());
        assert_eq!(config.session_ttl_secs, 1800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let config = Config {
            plan_weeks: 60,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            weekly_hours: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            session_ttl_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_reports_key_on_bad_value() {
        std::env::set_var("SKETCH_TEST_BAD_PORT", "eighty");
        let err = parse_env::<u16>("SKETCH_TEST_BAD_PORT").unwrap_err();
        assert!(err.to_string().contains("SKETCH_TEST_BAD_PORT"));
        std::env::remove_var("SKETCH_TEST_BAD_PORT");
    }

    #[test]
    fn test_parse_env_missing_is_none() {
        assert!(parse_env::<u64>("SKETCH_TEST_UNSET_VARIABLE").unwrap().is_none());
    }
}
