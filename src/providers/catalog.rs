//! Provider catalog
//!
//! Static facts about each supported vendor: endpoint, credential variable,
//! models and request defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const NVIDIA_MODELS: &[&str] = &["meta/llama3-70b-instruct"];

const DEEPINFRA_MODELS: &[&str] = &[
    "deepseek-ai/DeepSeek-R1-0528",
    "deepseek-ai/DeepSeek-R1",
    "deepseek-ai/DeepSeek-R1-Distill-Llama-70B",
    "deepseek-ai/DeepSeek-R1-Distill-Qwen-32B",
    "deepseek-ai/DeepSeek-R1-Turbo",
    "deepseek-ai/DeepSeek-V3",
    "deepseek-ai/DeepSeek-Prover-V2-671B",
    "google/gemma-2-27b-it",
    "google/gemma-2-9b-it",
    "google/gemma-3-12b-it",
    "google/gemma-3-27b-it",
    "google/gemma-3-4b-it",
    "meta-llama/Llama-3.3-70B-Instruct",
    "meta-llama/Llama-3.3-70B-Instruct-Turbo",
    "meta-llama/Llama-4-Maverick-17B-128E-Instruct-FP8",
    "meta-llama/Llama-4-Scout-17B-16E-Instruct",
    "meta-llama/Llama-Guard-4-12B",
    "meta-llama/Meta-Llama-3.1-8B-Instruct",
    "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo",
    "microsoft/Phi-4-multimodal-instruct",
    "microsoft/WizardLM-2-8x22B",
    "microsoft/phi-4",
    "microsoft/phi-4-reasoning-plus",
    "mistralai/Mistral-Small-24B-Instruct-2501",
    "nvidia/Llama-3.1-Nemotron-70B-Instruct",
    "Qwen/QwQ-32B",
    "Qwen/Qwen2.5-72B-Instruct",
    "Qwen/Qwen2.5-Coder-32B-Instruct",
    "Qwen/Qwen3-14B",
    "Qwen/Qwen3-30B-A3B",
    "Qwen/Qwen3-32B",
    "Qwen/Qwen3-235B-A22B",
];

const CEREBRAS_MODELS: &[&str] = &[
    "llama3.1-8b",
    "llama-3.3-70b",
    "qwen-3-32b",
    "qwen-3-235b-a22b-instruct-2507",
    "qwen-3-235b-a22b-thinking-2507",
    "gpt-oss-120b",
    "zai-glm-4.6",
];

const SAMBANOVA_MODELS: &[&str] = &[
    "Meta-Llama-3.1-8B-Instruct",
    "Meta-Llama-3.1-70B-Instruct",
    "Meta-Llama-3.1-405B-Instruct",
    "DeepSeek-R1-Distill-Llama-70B",
    "Llama-3.1-Tulu-3-405B",
    "Meta-Llama-3.2-1B-Instruct",
    "Meta-Llama-3.2-3B-Instruct",
    "Meta-Llama-3.3-70B-Instruct",
    "Qwen2.5-72B-Instruct",
    "Qwen2.5-Coder-32B-Instruct",
    "QwQ-32B-Preview",
];

/// Default sampling temperature shared by all vendors
pub const DEFAULT_TEMPERATURE: f32 = 0.75;

/// Default nucleus sampling parameter shared by all vendors
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Which request field carries the token limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxTokensField {
    /// `max_tokens`
    MaxTokens,
    /// `max_completion_tokens`
    MaxCompletionTokens,
}

/// Supported model vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Nvidia,
    DeepInfra,
    Cerebras,
    Sambanova,
}

impl ProviderKind {
    /// All vendors, in display order
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Nvidia,
        ProviderKind::DeepInfra,
        ProviderKind::Cerebras,
        ProviderKind::Sambanova,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Nvidia => "nvidia",
            ProviderKind::DeepInfra => "deepinfra",
            ProviderKind::Cerebras => "cerebras",
            ProviderKind::Sambanova => "sambanova",
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_env(self) -> &'static str {
        match self {
            ProviderKind::Nvidia => "NVIDIA_API_KEY",
            ProviderKind::DeepInfra => "DEEPINFRA_API_KEY",
            ProviderKind::Cerebras => "CEREBRAS_API_KEY",
            ProviderKind::Sambanova => "SAMBANOVA_API_KEY",
        }
    }

    /// API base URL; requests go to `{base_url}/chat/completions`
    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Nvidia => "https://integrate.api.nvidia.com/v1",
            ProviderKind::DeepInfra => "https://api.deepinfra.com/v1/openai",
            ProviderKind::Cerebras => "https://api.cerebras.ai/v1",
            ProviderKind::Sambanova => "https://api.sambanova.ai/v1",
        }
    }

    pub fn available_models(self) -> &'static [&'static str] {
        match self {
            ProviderKind::Nvidia => NVIDIA_MODELS,
            ProviderKind::DeepInfra => DEEPINFRA_MODELS,
            ProviderKind::Cerebras => CEREBRAS_MODELS,
            ProviderKind::Sambanova => SAMBANOVA_MODELS,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Nvidia => "meta/llama3-70b-instruct",
            ProviderKind::DeepInfra => "meta-llama/Llama-3.3-70B-Instruct-Turbo",
            ProviderKind::Cerebras => "llama-3.3-70b",
            ProviderKind::Sambanova => "Meta-Llama-3.3-70B-Instruct",
        }
    }

    pub fn default_max_tokens(self) -> u32 {
        match self {
            ProviderKind::Nvidia | ProviderKind::Sambanova => 4096,
            ProviderKind::DeepInfra | ProviderKind::Cerebras => 2048,
        }
    }

    pub fn default_system_prompt(self) -> &'static str {
        match self {
            ProviderKind::Sambanova => "You are a helpful AI assistant.",
            _ => "You are a helpful assistant.",
        }
    }

    pub fn max_tokens_field(self) -> MaxTokensField {
        match self {
            ProviderKind::Cerebras => MaxTokensField::MaxCompletionTokens,
            _ => MaxTokensField::MaxTokens,
        }
    }

    /// Whether `model` is in the vendor's model list
    pub fn supports_model(self, model: &str) -> bool {
        self.available_models().contains(&model)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = ProviderKind::ALL.iter().map(|k| k.name()).collect();
                anyhow::anyhow!("Invalid provider: {}. Choose from: {:?}", s, names)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("DeepInfra".parse::<ProviderKind>().unwrap(), ProviderKind::DeepInfra);
        assert_eq!(" NVIDIA ".parse::<ProviderKind>().unwrap(), ProviderKind::Nvidia);
        assert_eq!("sambanova".parse::<ProviderKind>().unwrap(), ProviderKind::Sambanova);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "openrouter".parse::<ProviderKind>().unwrap_err();
        assert!(err.to_string().contains("Invalid provider: openrouter"));
    }

    #[test]
    fn test_default_models_are_available() {
        for kind in ProviderKind::ALL {
            assert!(kind.supports_model(kind.default_model()), "{}", kind);
        }
    }

    #[test]
    fn test_cerebras_uses_completion_tokens_field() {
        assert_eq!(ProviderKind::Cerebras.max_tokens_field(), MaxTokensField::MaxCompletionTokens);
        assert_eq!(ProviderKind::Nvidia.max_tokens_field(), MaxTokensField::MaxTokens);
    }
}
