//! Application configuration settings
//!
//! Environment-driven settings, optionally seeded from a `.env` file

use crate::providers::ProviderKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Provider selection and request defaults
    pub provider: ProviderSettings,
    /// Provider credentials
    pub api_keys: ApiKeys,
    /// Dataset location
    pub dataset: DatasetConfig,
    /// Batching configuration
    pub batch: BatchConfig,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Provider selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider name (nvidia, deepinfra, cerebras, sambanova)
    pub name: String,
    /// Model override; the provider default is used when unset
    pub model: Option<String>,
    /// System prompt override
    pub system_prompt: Option<String>,
    /// Per-request timeout in seconds
    pub timeout: u64,
}

/// Provider API keys, one per supported vendor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    pub nvidia: Option<String>,
    pub deepinfra: Option<String>,
    pub cerebras: Option<String>,
    pub sambanova: Option<String>,
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Directory scanned (non-recursively) for dataset files
    pub dir: PathBuf,
}

/// Batching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Records per batch, also the number of concurrent requests
    pub batch_size: usize,
    /// Pause between batches in milliseconds
    pub batch_delay_ms: u64,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per record; `None` retries until a completion arrives
    pub max_retries: Option<u32>,
    /// Lower bound of the randomized backoff in milliseconds
    pub min_delay_ms: u64,
    /// Upper bound of the randomized backoff in milliseconds
    pub max_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from the process environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// `new` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let settings = Self {
            provider: ProviderSettings {
                name: get_or("PROVIDER", "deepinfra"),
                model: non_empty("MODEL"),
                system_prompt: non_empty("SYSTEM_PROMPT"),
                timeout: get_or("REQUEST_TIMEOUT", "30")
                    .parse()
                    .context("Invalid request timeout")?,
            },
            api_keys: ApiKeys {
                nvidia: non_empty(ProviderKind::Nvidia.api_key_env()),
                deepinfra: non_empty(ProviderKind::DeepInfra.api_key_env()),
                cerebras: non_empty(ProviderKind::Cerebras.api_key_env()),
                sambanova: non_empty(ProviderKind::Sambanova.api_key_env()),
            },
            dataset: DatasetConfig {
                dir: PathBuf::from(get_or("DATASET_FILES_DIR", "./dataset_files")),
            },
            batch: BatchConfig {
                batch_size: get_or("BATCH_SIZE", "3")
                    .parse()
                    .context("Invalid batch size")?,
                batch_delay_ms: get_or("BATCH_DELAY_MS", "2000")
                    .parse()
                    .context("Invalid batch delay")?,
            },
            retry: RetryConfig {
                max_retries: parse_max_retries(&get_or("MAX_RETRIES", "10"))?,
                min_delay_ms: get_or("RETRY_MIN_DELAY_MS", "2000")
                    .parse()
                    .context("Invalid minimum retry delay")?,
                max_delay_ms: get_or("RETRY_MAX_DELAY_MS", "5000")
                    .parse()
                    .context("Invalid maximum retry delay")?,
            },
            logging: LoggingConfig {
                level: get_or("RUST_LOG", "info"),
                format: get_or("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        self.provider_kind()?;

        if self.provider.timeout == 0 {
            anyhow::bail!("Request timeout cannot be 0");
        }

        if self.batch.batch_size == 0 {
            anyhow::bail!("Batch size cannot be 0");
        }

        if self.retry.max_retries == Some(0) {
            anyhow::bail!("Max retries cannot be 0, use 'unbounded' to retry forever");
        }

        if self.retry.min_delay_ms > self.retry.max_delay_ms {
            anyhow::bail!(
                "Minimum retry delay ({}ms) exceeds maximum retry delay ({}ms)",
                self.retry.min_delay_ms,
                self.retry.max_delay_ms
            );
        }

        tracing_subscriber::EnvFilter::try_new(&self.logging.level)
            .with_context(|| format!("Invalid log level: {}", self.logging.level))?;

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// Selected provider
    pub fn provider_kind(&self) -> Result<ProviderKind> {
        self.provider.name.parse()
    }

    /// API key for a provider; a missing key is a startup error
    pub fn api_key_for(&self, kind: ProviderKind) -> Result<String> {
        let key = match kind {
            ProviderKind::Nvidia => &self.api_keys.nvidia,
            ProviderKind::DeepInfra => &self.api_keys.deepinfra,
            ProviderKind::Cerebras => &self.api_keys.cerebras,
            ProviderKind::Sambanova => &self.api_keys.sambanova,
        };

        let key = key
            .clone()
            .with_context(|| format!("{} environment variable not set", kind.api_key_env()))?;

        if key.contains(char::is_whitespace) {
            anyhow::bail!("{} cannot contain whitespace characters", kind.api_key_env());
        }

        Ok(key)
    }

    /// Check that the dataset directory exists
    pub fn ensure_dataset_dir(&self) -> Result<&Path> {
        let dir = self.dataset.dir.as_path();
        if !dir.is_dir() {
            anyhow::bail!("Dataset directory not found: {}", dir.display());
        }
        Ok(dir)
    }
}

/// Parse `MAX_RETRIES`; `unbounded` (or `forever`/`none`) disables the limit
pub fn parse_max_retries(value: &str) -> Result<Option<u32>> {
    match value.trim().to_lowercase().as_str() {
        "unbounded" | "forever" | "none" => Ok(None),
        other => other
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid max retries value: {}", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.provider.name, "deepinfra");
        assert_eq!(settings.provider.timeout, 30);
        assert_eq!(settings.batch.batch_size, 3);
        assert_eq!(settings.batch.batch_delay_ms, 2000);
        assert_eq!(settings.retry.max_retries, Some(10));
        assert_eq!(settings.retry.min_delay_ms, 2000);
        assert_eq!(settings.retry.max_delay_ms, 5000);
        assert_eq!(settings.dataset.dir, PathBuf::from("./dataset_files"));
        assert!(settings.provider.model.is_none());
    }

    #[test]
    fn test_parse_max_retries() {
        assert_eq!(parse_max_retries("10").unwrap(), Some(10));
        assert_eq!(parse_max_retries("unbounded").unwrap(), None);
        assert_eq!(parse_max_retries("Forever").unwrap(), None);
        assert!(parse_max_retries("ten").is_err());
    }

    #[test]
    fn test_log_filter_directives() {
        let settings = settings_from(&[("RUST_LOG", "info,dataset_augmenter=debug")]).unwrap();
        assert_eq!(settings.logging.level, "info,dataset_augmenter=debug");
        assert!(settings_from(&[("RUST_LOG", "dataset_augmenter=debug")]).is_ok());

        let err = settings_from(&[("RUST_LOG", "dataset_augmenter=loud")]).unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_zero_retries_rejected() {
        assert!(settings_from(&[("MAX_RETRIES", "0")]).is_err());
    }

    #[test]
    fn test_api_key_lookup() {
        let settings = settings_from(&[("NVIDIA_API_KEY", "nvapi-test-key")]).unwrap();
        assert_eq!(settings.api_key_for(ProviderKind::Nvidia).unwrap(), "nvapi-test-key");

        let err = settings.api_key_for(ProviderKind::Sambanova).unwrap_err();
        assert!(err.to_string().contains("SAMBANOVA_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let settings = settings_from(&[("CEREBRAS_API_KEY", "   ")]).unwrap();
        assert!(settings.api_key_for(ProviderKind::Cerebras).is_err());
    }
}
