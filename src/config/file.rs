//! File-based configuration loading
//!
//! Optional JSON file with per-provider request overrides

use crate::providers::ProviderKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration loaded from JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Overrides keyed by provider name
    #[serde(default)]
    pub providers: HashMap<String, ProviderOverrides>,
}

/// Per-provider request overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderOverrides {
    /// Base URL for the provider API (the `/chat/completions` suffix is appended)
    #[serde(rename = "baseUrl", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model to request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Maximum tokens to generate
    #[serde(rename = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// System prompt
    #[serde(rename = "systemPrompt", skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl AppConfig {
    /// Load configuration from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: AppConfig =
            serde_json::from_str(&content).with_context(|| "Failed to parse config JSON")?;

        config.validate()?;

        debug!("Loaded overrides for {} providers", config.providers.len());
        Ok(config)
    }

    /// Load configuration from default locations
    /// Searches in order:
    /// 1. ~/.config/dataset-augmenter/augmenter.json
    /// 2. ./augmenter.json
    ///
    /// Falls back to built-in provider defaults when neither exists.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                debug!("No configuration file found, using provider defaults");
                Ok(Self::default())
            }
        }
    }

    /// First existing config file among the default locations
    pub fn default_path() -> Option<PathBuf> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home
                .join(".config")
                .join("dataset-augmenter")
                .join("augmenter.json");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        let local_path = PathBuf::from("augmenter.json");
        local_path.exists().then_some(local_path)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        for (name, overrides) in &self.providers {
            name.parse::<ProviderKind>()
                .with_context(|| format!("Unknown provider '{}' in config file", name))?;

            if let Some(base_url) = &overrides.base_url {
                if !base_url.starts_with("http") {
                    anyhow::bail!("Invalid base URL for provider '{}': {}", name, base_url);
                }
            }

            if let Some(temperature) = overrides.temperature {
                if !(0.0..=2.0).contains(&temperature) {
                    anyhow::bail!("Temperature for provider '{}' must be within 0.0..=2.0", name);
                }
            }

            if let Some(top_p) = overrides.top_p {
                if !(0.0..=1.0).contains(&top_p) {
                    anyhow::bail!("topP for provider '{}' must be within 0.0..=1.0", name);
                }
            }

            if overrides.max_tokens == Some(0) {
                anyhow::bail!("maxTokens for provider '{}' cannot be 0", name);
            }
        }

        Ok(())
    }

    /// Overrides for a provider, matching names case-insensitively
    pub fn overrides_for(&self, kind: ProviderKind) -> Option<&ProviderOverrides> {
        self.providers
            .iter()
            .find(|(name, _)| name.parse::<ProviderKind>().ok() == Some(kind))
            .map(|(_, overrides)| overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = write_config(
            r#"{
                "providers": {
                    "DeepInfra": {
                        "model": "Qwen/Qwen3-32B",
                        "maxTokens": 1024,
                        "temperature": 0.2
                    },
                    "nvidia": {
                        "baseUrl": "http://localhost:9000/v1",
                        "systemPrompt": "Answer tersely."
                    }
                }
            }"#,
        );

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.providers.len(), 2);

        let deepinfra = config.overrides_for(ProviderKind::DeepInfra).unwrap();
        assert_eq!(deepinfra.model.as_deref(), Some("Qwen/Qwen3-32B"));
        assert_eq!(deepinfra.max_tokens, Some(1024));

        let nvidia = config.overrides_for(ProviderKind::Nvidia).unwrap();
        assert_eq!(nvidia.base_url.as_deref(), Some("http://localhost:9000/v1"));
        assert_eq!(nvidia.system_prompt.as_deref(), Some("Answer tersely."));

        assert!(config.overrides_for(ProviderKind::Cerebras).is_none());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let file = write_config("{}");
        let config = AppConfig::load(file.path()).unwrap();
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_validation_unknown_provider() {
        let file = write_config(r#"{"providers": {"openrouter": {}}}"#);
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let file = write_config(r#"{"providers": {"nvidia": {"baseUrl": "ftp://x"}}}"#);
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_validation_out_of_range_sampling() {
        let file = write_config(r#"{"providers": {"nvidia": {"topP": 1.5}}}"#);
        assert!(AppConfig::load(file.path()).is_err());

        let file = write_config(r#"{"providers": {"nvidia": {"temperature": -0.1}}}"#);
        assert!(AppConfig::load(file.path()).is_err());
    }
}
