use crate::error::ConfigError;
use core_types::RuleId;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// Environment variable consulted when `api.access_token` is not set in the file.
pub const ACCESS_TOKEN_ENV: &str = "MONZO_ACCESS_TOKEN";

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Connection settings for the bank API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token. Falls back to the `MONZO_ACCESS_TOKEN` environment variable.
    pub access_token: Option<String>,
}

/// Parameters for the polling loop and the commit phase.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// When true, proposed transfers are only logged.
    pub dry_run: bool,
    /// Pause between two polling cycles.
    pub poll_interval_ms: u64,
    /// Pause after every external transfer call, to respect the bank's rate limits.
    pub transfer_pause_ms: u64,
    pub fetch_retry_attempts: u32,
    pub fetch_retry_delay_ms: u64,
    /// How far back the snapshot looks for pot transactions.
    pub transaction_window_hours: i64,
    /// Rules to run for every account, in execution order.
    pub rules: Vec<RuleId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<String>,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml and still have it work.

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.monzo.com".to_string(),
            access_token: None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            poll_interval_ms: 2_000,
            transfer_pause_ms: 2_000,
            fetch_retry_attempts: 5,
            fetch_retry_delay_ms: 5_000,
            transaction_window_hours: 24,
            rules: RuleId::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.rules.is_empty() {
            return Err(ConfigError::ValidationError(
                "engine.rules must name at least one rule".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for rule in &self.engine.rules {
            if !seen.insert(rule) {
                return Err(ConfigError::ValidationError(format!(
                    "rule '{}' is listed more than once in engine.rules",
                    rule
                )));
            }
        }
        if self.engine.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "engine.poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.engine.fetch_retry_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "engine.fetch_retry_attempts must be at least 1".to_string(),
            ));
        }
        if self.engine.transaction_window_hours <= 0 {
            return Err(ConfigError::ValidationError(
                "engine.transaction_window_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl ApiConfig {
    /// Resolves the bearer token from the file or the environment.
    pub fn access_token(&self) -> Result<String, ConfigError> {
        if let Some(token) = self.access_token.as_ref().filter(|t| !t.is_empty()) {
            return Ok(token.clone());
        }
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingAccessToken(ACCESS_TOKEN_ENV))
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn transfer_pause(&self) -> Duration {
        Duration::from_millis(self.transfer_pause_ms)
    }

    pub fn fetch_retry_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_retry_delay_ms)
    }
}
