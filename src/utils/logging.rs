//! Logging utilities
//!
//! Subscriber setup and helpers for keeping log lines short

use anyhow::Result;

/// Initialize the global tracing subscriber.
///
/// `level` is an `EnvFilter` directive (e.g. `info`, `dataset_augmenter=debug`),
/// `format` is `text` or `json`.
pub fn init_logging(level: &str, format: &str) -> Result<()> {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if format == "json" {
        // JSON format logs (batch jobs shipped to a collector)
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(level)
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .finish(),
        )
    } else {
        // Human readable format
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(level)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(())
}

/// Truncate text for log output, noting how much was dropped.
///
/// Counts characters, not bytes, so multi-byte text never splits.
pub fn preview(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}... ({} chars truncated)", head, total - max_chars)
    } else {
        text.to_string()
    }
}
