//! Dataset Augmenter Library
//!
//! Fills the `output` field of instruction datasets with completions from
//! OpenAI-compatible chat APIs, checkpointing each file as it goes

pub mod config;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::{AppConfig, Settings};
pub use models::Record;
pub use providers::{ModelClient, ProviderKind, ProviderProfile};
pub use services::{BatchDriver, CompletionOutcome, DatasetStore, DriverConfig, RetryPolicy};
pub use utils::error::{DatasetError, ProviderError};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
