//! Configuration management module
//!
//! Loads settings from environment variables and the optional provider override file

pub mod file;
pub mod settings;

pub use file::{AppConfig, ProviderOverrides};
pub use settings::Settings;
