//! OpenAI-compatible chat completions provider
//!
//! All supported vendors expose the same chat completions shape; they differ
//! only in the data carried by [`ProviderProfile`].

use super::catalog::MaxTokensField;
use super::profile::ProviderProfile;
use super::ModelClient;
use crate::models::chat::{ChatErrorResponse, ChatMessage, ChatRequest, ChatResponse};
use crate::utils::error::{ProviderError, ProviderResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// Chat completions provider
#[derive(Debug, Clone)]
pub struct ChatCompletionsProvider {
    client: Client,
    profile: ProviderProfile,
    endpoint: String,
}

impl ChatCompletionsProvider {
    /// Create a provider for a resolved profile
    pub fn new(profile: ProviderProfile) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(profile.timeout_secs))
            .user_agent(concat!("dataset-augmenter/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let endpoint = profile.endpoint();
        Ok(Self {
            client,
            profile,
            endpoint,
        })
    }

    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    /// Build the request body for a prompt
    fn build_request(&self, prompt: &str) -> ChatRequest {
        let (max_tokens, max_completion_tokens) = match self.profile.max_tokens_field {
            MaxTokensField::MaxTokens => (Some(self.profile.max_tokens), None),
            MaxTokensField::MaxCompletionTokens => (None, Some(self.profile.max_tokens)),
        };

        ChatRequest {
            model: self.profile.model.clone(),
            messages: vec![
                ChatMessage::system(self.profile.system_prompt.clone()),
                ChatMessage::user(prompt.trim()),
            ],
            temperature: Some(self.profile.temperature),
            top_p: Some(self.profile.top_p),
            max_tokens,
            max_completion_tokens,
            stream: false,
        }
    }
}

#[async_trait]
impl ModelClient for ChatCompletionsProvider {
    fn name(&self) -> &str {
        self.profile.kind.name()
    }

    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        debug!("Sending {} chat completion request", self.name());

        let request = self.build_request(prompt);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.profile.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let body = match serde_json::from_str::<ChatErrorResponse>(&error_text) {
                Ok(error_response) => error_response.error.message,
                Err(_) => error_text,
            };
            error!("{} API request failed: {} - {}", self.name(), status, body);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(format!("{}: {}", e, body)))?;

        let content = chat_response
            .first_content()
            .ok_or_else(|| ProviderError::MalformedResponse("response has no choices".to_string()))?;

        debug!("{} request completed successfully", self.name());
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderKind;

    #[test]
    fn test_provider_creation() {
        let provider = ChatCompletionsProvider::new(ProviderProfile::defaults(ProviderKind::Nvidia, "k"));
        assert!(provider.is_ok());
    }

    #[test]
    fn test_provider_name() {
        let provider =
            ChatCompletionsProvider::new(ProviderProfile::defaults(ProviderKind::Sambanova, "k")).unwrap();
        assert_eq!(provider.name(), "sambanova");
    }

    #[test]
    fn test_build_request() {
        let provider =
            ChatCompletionsProvider::new(ProviderProfile::defaults(ProviderKind::DeepInfra, "k")).unwrap();
        let request = provider.build_request("  What is entropy?\n");

        assert_eq!(request.model, "meta-llama/Llama-3.3-70B-Instruct-Turbo");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content.as_deref(), Some("You are a helpful assistant."));
        assert_eq!(request.messages[1].content.as_deref(), Some("What is entropy?"));
        assert_eq!(request.max_tokens, Some(2048));
        assert!(request.max_completion_tokens.is_none());
        assert!(!request.stream);
    }

    #[test]
    fn test_build_request_cerebras_token_field() {
        let provider =
            ChatCompletionsProvider::new(ProviderProfile::defaults(ProviderKind::Cerebras, "k")).unwrap();
        let request = provider.build_request("hi");

        assert!(request.max_tokens.is_none());
        assert_eq!(request.max_completion_tokens, Some(2048));
    }
}
