//! Provider module
//!
//! Defines the ModelClient trait and the HTTP provider behind it

pub mod catalog;
pub mod openai;
pub mod profile;

use crate::utils::error::ProviderResult;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Text completion capability.
///
/// The completion task and batch driver depend only on this trait.
/// Implementations are shared across concurrent tasks, so they must not
/// keep per-call mutable state.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Turn a prompt into completion text.
    ///
    /// An empty string is a valid return; callers decide whether to retry.
    async fn generate(&self, prompt: &str) -> ProviderResult<String>;
}

/// Build the shared client for a resolved profile
pub fn build_client(profile: ProviderProfile) -> Result<Arc<dyn ModelClient>> {
    info!(
        "Initialized {} client (model: {}, endpoint: {})",
        profile.kind,
        profile.model,
        profile.endpoint()
    );
    Ok(Arc::new(ChatCompletionsProvider::new(profile)?))
}

pub use catalog::ProviderKind;
pub use openai::ChatCompletionsProvider;
pub use profile::ProviderProfile;
