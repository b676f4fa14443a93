use anyhow::{anyhow, Context, Result};
use std::time::Duration;

const DEFAULT_INTERVAL_SECS: u64 = 3600;
const DEFAULT_CLASSIFIER_MODEL: &str = "claude-haiku-4-5-20251001";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Database. Only needed when records go to Postgres.
    pub database_url: Option<String>,

    // Apify
    pub apify_api_key: String,
    pub apify_base_url: Option<String>,

    // Classifier
    pub anthropic_api_key: String,
    pub classifier_model: String,

    // Scheduling
    pub sync_interval: Duration,
    pub classify_interval: Duration,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: optional_env("DATABASE_URL"),
            apify_api_key: required_env("APIFY_API_KEY")?,
            apify_base_url: optional_env("APIFY_BASE_URL"),
            anthropic_api_key: required_env("ANTHROPIC_API_KEY")?,
            classifier_model: optional_env("CLASSIFIER_MODEL")
                .unwrap_or_else(|| DEFAULT_CLASSIFIER_MODEL.to_string()),
            sync_interval: interval_env("SYNC_INTERVAL_SECS")?,
            classify_interval: interval_env("CLASSIFY_INTERVAL_SECS")?,
        };

        config.log_keys();
        Ok(config)
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL environment variable is required"))
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().take(5).map(char::len_utf8).sum();
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!(
            "  DATABASE_URL: {}",
            if self.database_url.is_some() { "<set>" } else { "<unset>" }
        );
        tracing::info!("  APIFY_API_KEY: {}", preview(&self.apify_api_key));
        tracing::info!(
            "  APIFY_BASE_URL: {}",
            self.apify_base_url.as_deref().unwrap_or("<default>")
        );
        tracing::info!("  ANTHROPIC_API_KEY: {}", preview(&self.anthropic_api_key));
        tracing::info!("  CLASSIFIER_MODEL: {}", self.classifier_model);
        tracing::info!("  SYNC_INTERVAL_SECS: {}", self.sync_interval.as_secs());
        tracing::info!("  CLASSIFY_INTERVAL_SECS: {}", self.classify_interval.as_secs());
    }
}

fn required_env(key: &str) -> Result<String> {
    optional_env(key).ok_or_else(|| anyhow!("{key} environment variable is required"))
}

/// Unset and blank values are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn interval_env(key: &str) -> Result<Duration> {
    let secs = match optional_env(key) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds"))?,
        None => DEFAULT_INTERVAL_SECS,
    };
    if secs == 0 {
        return Err(anyhow!("{key} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required() {
        std::env::set_var("DATABASE_URL", "postgres://localhost/contextlink");
        std::env::set_var("APIFY_API_KEY", "apify_api_abcdef");
        std::env::set_var("ANTHROPIC_API_KEY", "sk-ant-123456");
    }

    fn clear_all() {
        for key in [
            "DATABASE_URL",
            "APIFY_API_KEY",
            "APIFY_BASE_URL",
            "ANTHROPIC_API_KEY",
            "CLASSIFIER_MODEL",
            "SYNC_INTERVAL_SECS",
            "CLASSIFY_INTERVAL_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_when_optional_keys_missing() {
        clear_all();
        set_required();

        let config = Config::from_env().unwrap();
        assert_eq!(config.sync_interval, Duration::from_secs(3600));
        assert_eq!(config.classify_interval, Duration::from_secs(3600));
        assert_eq!(config.classifier_model, DEFAULT_CLASSIFIER_MODEL);
        assert!(config.apify_base_url.is_none());
        clear_all();
    }

    #[test]
    #[serial]
    fn database_url_is_optional_until_required() {
        clear_all();
        set_required();
        std::env::remove_var("DATABASE_URL");

        let config = Config::from_env().unwrap();
        assert!(config.database_url.is_none());
        let err = config.require_database_url().unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        std::env::set_var("DATABASE_URL", "postgres://localhost/contextlink");
        let config = Config::from_env().unwrap();
        assert_eq!(
            config.require_database_url().unwrap(),
            "postgres://localhost/contextlink"
        );
        clear_all();
    }

    #[test]
    #[serial]
    fn missing_required_key_is_an_error() {
        clear_all();
        set_required();
        std::env::remove_var("APIFY_API_KEY");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("APIFY_API_KEY"));
        clear_all();
    }

    #[test]
    #[serial]
    fn blank_required_key_counts_as_missing() {
        clear_all();
        set_required();
        std::env::set_var("ANTHROPIC_API_KEY", "   ");

        assert!(Config::from_env().is_err());
        clear_all();
    }

    #[test]
    #[serial]
    fn intervals_are_parsed_and_validated() {
        clear_all();
        set_required();
        std::env::set_var("SYNC_INTERVAL_SECS", "120");
        assert_eq!(
            Config::from_env().unwrap().sync_interval,
            Duration::from_secs(120)
        );

        std::env::set_var("SYNC_INTERVAL_SECS", "0");
        assert!(Config::from_env().is_err());

        std::env::set_var("SYNC_INTERVAL_SECS", "hourly");
        assert!(Config::from_env().is_err());
        clear_all();
    }
}
