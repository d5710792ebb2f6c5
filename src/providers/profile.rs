//! Resolved provider profile
//!
//! Everything a provider needs to issue requests, merged from catalog
//! defaults, the override file, and settings (highest precedence last).

use super::catalog::{MaxTokensField, ProviderKind, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};
use crate::config::{AppConfig, Settings};
use anyhow::Result;
use tracing::debug;

/// Fully resolved request parameters for one provider
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub kind: ProviderKind,
    /// API base URL without the `/chat/completions` suffix
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub max_tokens_field: MaxTokensField,
    pub temperature: f32,
    pub top_p: f32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl ProviderProfile {
    /// Catalog defaults for a provider
    pub fn defaults(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            base_url: kind.default_base_url().to_string(),
            api_key: api_key.into(),
            model: kind.default_model().to_string(),
            system_prompt: kind.default_system_prompt().to_string(),
            max_tokens: kind.default_max_tokens(),
            max_tokens_field: kind.max_tokens_field(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            timeout_secs: 30,
        }
    }

    /// Resolve the profile for the selected provider.
    ///
    /// Fails when the API key is missing or the model is not offered by
    /// the vendor. Model names are not checked against the catalog when the
    /// base URL is overridden, since the endpoint may serve other models.
    pub fn resolve(settings: &Settings, file_config: &AppConfig) -> Result<Self> {
        let kind = settings.provider_kind()?;
        let mut profile = Self::defaults(kind, settings.api_key_for(kind)?);
        profile.timeout_secs = settings.provider.timeout;

        let mut custom_endpoint = false;
        if let Some(overrides) = file_config.overrides_for(kind) {
            if let Some(base_url) = &overrides.base_url {
                profile.base_url = base_url.clone();
                custom_endpoint = true;
            }
            if let Some(model) = &overrides.model {
                profile.model = model.clone();
            }
            if let Some(max_tokens) = overrides.max_tokens {
                profile.max_tokens = max_tokens;
            }
            if let Some(temperature) = overrides.temperature {
                profile.temperature = temperature;
            }
            if let Some(top_p) = overrides.top_p {
                profile.top_p = top_p;
            }
            if let Some(system_prompt) = &overrides.system_prompt {
                profile.system_prompt = system_prompt.clone();
            }
        }

        if let Some(model) = &settings.provider.model {
            profile.model = model.clone();
        }
        if let Some(system_prompt) = &settings.provider.system_prompt {
            profile.system_prompt = system_prompt.clone();
        }

        if !custom_endpoint && !kind.supports_model(&profile.model) {
            anyhow::bail!(
                "Invalid model: {}. Choose from: {:?}",
                profile.model,
                kind.available_models()
            );
        }

        debug!("Resolved {} profile with model {}", kind, profile.model);
        Ok(profile)
    }

    /// Chat completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
