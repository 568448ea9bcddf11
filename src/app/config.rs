use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::authorization::{Backoff, DEFAULT_APPROVAL_MESSAGE, RetryPolicy};
use crate::domain::Currency;
use crate::notify::DEFAULT_QUEUE;

pub const CONFIG_PATH_VAR: &str = "WALLETPAY_CONFIG";
pub const AUTHORIZER_URI_VAR: &str = "AUTHORIZER_URI";
pub const LOG_LEVEL_VAR: &str = "RUST_LOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub log_json: bool,
    pub default_currency: String,
    /// Requests processed at once by the CLI
    pub concurrency: usize,
    /// How long in-flight work may run after a shutdown signal
    pub shutdown_grace_ms: u64,
    /// Stop at the first bad seed row instead of skipping it
    pub abort_on_seed_error: bool,
    pub authorizer: AuthorizerConfig,
    pub notifier: NotifierConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            default_currency: Currency::Ngn.code().to_string(),
            concurrency: 8,
            shutdown_grace_ms: 5_000,
            abort_on_seed_error: false,
            authorizer: AuthorizerConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AuthorizerConfig {
    pub uri: String,
    pub approval_message: String,
    pub max_attempts: u32,
    pub retry_statuses: Vec<u16>,
    /// Also retry timeouts and failed connections
    pub retry_transport_errors: bool,
    pub backoff_ms: u64,
    /// When set, backoff doubles per retry up to this cap
    pub max_backoff_ms: Option<u64>,
    pub timeout_ms: u64,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost:8081/authorize".to_string(),
            approval_message: DEFAULT_APPROVAL_MESSAGE.to_string(),
            max_attempts: 3,
            retry_statuses: vec![500],
            retry_transport_errors: true,
            backoff_ms: 400,
            max_backoff_ms: None,
            timeout_ms: 5_000,
        }
    }
}

impl AuthorizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let base = Duration::from_millis(self.backoff_ms);
        let backoff = match self.max_backoff_ms {
            Some(max) => Backoff::Exponential {
                base,
                max: Duration::from_millis(max),
            },
            None => Backoff::Fixed(base),
        };

        RetryPolicy::new(self.max_attempts, self.retry_statuses.iter().copied(), backoff)
            .with_attempt_timeout(self.timeout())
            .with_transport_retries(self.retry_transport_errors)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NotifierConfig {
    pub queue: String,
    pub capacity: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            queue: DEFAULT_QUEUE.to_string(),
            capacity: 1_024,
        }
    }
}

impl AppConfig {
    /// Load from `WALLETPAY_CONFIG` (if set) and apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides looked up by variable name
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(uri) = lookup(AUTHORIZER_URI_VAR).filter(|v| !v.trim().is_empty()) {
            self.authorizer.uri = uri;
        }
        if let Some(level) = lookup(LOG_LEVEL_VAR).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
    }

    pub fn default_currency(&self) -> Result<Currency, ConfigError> {
        self.default_currency
            .parse()
            .map_err(|e: crate::domain::ValidationError| ConfigError::Invalid {
                field: "default_currency",
                reason: e.reason,
            })
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_currency()?;

        if self.authorizer.uri.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "authorizer.uri",
                reason: "must not be empty".to_string(),
            });
        }
        if self.authorizer.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "authorizer.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_match_authorizer_wiring() {
        let config = AppConfig::default();
        assert_eq!(config.default_currency().unwrap(), Currency::Ngn);
        assert_eq!(config.authorizer.retry_policy(), RetryPolicy::default());
        assert_eq!(config.authorizer.approval_message, "Autorizado");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str(
            "
log_json: true
authorizer:
  uri: http://decider/check
  max_backoff_ms: 2000
",
        )
        .unwrap();

        assert!(config.log_json);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.authorizer.uri, "http://decider/check");
        assert_eq!(config.authorizer.max_attempts, 3);
        assert_eq!(
            config.authorizer.retry_policy().backoff(),
            Backoff::Exponential {
                base: Duration::from_millis(400),
                max: Duration::from_millis(2_000)
            }
        );
        assert_eq!(config.notifier, NotifierConfig::default());
    }

    #[test]
    fn transport_retries_follow_config() {
        let config = AppConfig::from_yaml_str(
            "
authorizer:
  retry_transport_errors: false
",
        )
        .unwrap();

        let policy = config.authorizer.retry_policy();
        assert!(!policy.should_retry_error(1));
        assert!(policy.should_retry(500, 1));
    }

    #[test]
    fn environment_overrides_file() {
        let vars: HashMap<&str, &str> = [
            (AUTHORIZER_URI_VAR, "http://override/authorize"),
            (LOG_LEVEL_VAR, "walletpay=debug"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.authorizer.uri, "http://override/authorize");
        assert_eq!(config.log_level, "walletpay=debug");
    }

    #[test]
    fn rejects_unknown_currency() {
        let config = AppConfig {
            default_currency: "EUR".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "default_currency",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_attempts() {
        let mut config = AppConfig::default();
        config.authorizer.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn reads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_currency: USD\nconcurrency: 2").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_currency().unwrap(), Currency::Usd);
        assert_eq!(config.concurrency, 2);
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            AppConfig::from_file(Path::new("/definitely/not/here.yaml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
