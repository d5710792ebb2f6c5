//! Dataset Augmenter CLI
//!
//! Scans a directory of JSON datasets and fills in missing outputs using
//! the selected model provider

use anyhow::{Context, Result};
use clap::Parser;
use dataset_augmenter::config::{AppConfig, Settings};
use dataset_augmenter::providers::{self, ProviderKind, ProviderProfile};
use dataset_augmenter::services::{BatchDriver, DriverConfig, RetryPolicy};
use dataset_augmenter::utils::logging::init_logging;
use dataset_augmenter::version_info;
use std::path::PathBuf;
use tracing::{info, warn};

/// Command line arguments; each flag overrides the matching environment setting
#[derive(Parser, Debug)]
#[command(version, about = "Fill instruction datasets with LLM completions")]
struct Cli {
    /// Provider name (nvidia, deepinfra, cerebras, sambanova)
    #[arg(short, long)]
    provider: Option<String>,

    /// Records per batch (also the number of concurrent requests)
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Directory containing *.json dataset files
    #[arg(short, long)]
    dataset_dir: Option<PathBuf>,

    /// Model to request from the provider
    #[arg(short, long)]
    model: Option<String>,

    /// System prompt sent with every request
    #[arg(long)]
    system_prompt: Option<String>,

    /// Attempts per record before leaving it for a later run
    #[arg(long, conflicts_with = "retry_forever")]
    max_retries: Option<u32>,

    /// Retry each record until a completion arrives
    #[arg(long)]
    retry_forever: bool,

    /// Path to a provider override file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the models offered by the selected provider and exit
    #[arg(long)]
    list_models: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Apply command line overrides on top of environment settings
    fn apply(&self, settings: &mut Settings) -> Result<()> {
        if let Some(provider) = &self.provider {
            settings.provider.name = provider.clone();
        }
        if let Some(batch_size) = self.batch_size {
            settings.batch.batch_size = batch_size;
        }
        if let Some(dir) = &self.dataset_dir {
            settings.dataset.dir = dir.clone();
        }
        if let Some(model) = &self.model {
            settings.provider.model = Some(model.clone());
        }
        if let Some(system_prompt) = &self.system_prompt {
            settings.provider.system_prompt = Some(system_prompt.clone());
        }
        if let Some(max_retries) = self.max_retries {
            settings.retry.max_retries = Some(max_retries);
        }
        if self.retry_forever {
            settings.retry.max_retries = None;
        }
        match self.verbose {
            0 => {}
            1 => settings.logging.level = "debug".to_string(),
            _ => settings.logging.level = "trace".to_string(),
        }
        if self.json {
            settings.logging.format = "json".to_string();
        }

        settings.validate()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::new().context("Failed to load settings")?;
    cli.apply(&mut settings).context("Invalid command line options")?;

    init_logging(&settings.logging.level, &settings.logging.format)?;
    info!("{}", version_info());

    if cli.list_models {
        let kind: ProviderKind = settings.provider_kind()?;
        for model in kind.available_models() {
            println!("{}", model);
        }
        return Ok(());
    }

    let file_config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default().context("Failed to load provider configuration")?,
    };

    let profile = ProviderProfile::resolve(&settings, &file_config)
        .context("Failed to configure provider")?;
    let client = providers::build_client(profile)?;

    let dataset_dir = settings.ensure_dataset_dir()?.to_path_buf();

    let policy = RetryPolicy::from(&settings.retry);
    if policy.max_retries.is_none() {
        warn!("Unbounded retries enabled; an unreachable endpoint will stall the run");
    }

    let driver = BatchDriver::new(client, DriverConfig::from(&settings.batch), policy);
    let summary = driver.process_directory(&dataset_dir).await?;

    info!(
        "All files processed: {} outputs generated, {} records left without output",
        summary.completed(),
        summary.failed()
    );

    Ok(())
}
