//! Batch driver
//!
//! Walks a dataset file in fixed-size batches. Each batch fans out one
//! completion task per unfinished record, waits for all of them, merges the
//! results back by index and checkpoints the file before moving on.

use super::completion::{complete, CompletionOutcome, FailureReason, RetryPolicy};
use super::store::DatasetStore;
use crate::config::settings::BatchConfig;
use crate::models::Record;
use crate::providers::ModelClient;
use crate::utils::error::{DatasetError, DatasetResult};
use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Dataset file extension picked up by directory scans
pub const DATASET_EXTENSION: &str = "json";

/// Batching parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Records per batch; also the number of concurrent requests
    pub batch_size: usize,
    /// Pause between processed batches
    pub batch_delay: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            batch_delay: Duration::from_secs(2),
        }
    }
}

impl From<&BatchConfig> for DriverConfig {
    fn from(config: &BatchConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        }
    }
}

/// How a file run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// All batches were visited
    Processed,
    /// The file was missing or unreadable as a dataset
    Skipped(String),
}

/// Per-file result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    /// Records in the file
    pub total: usize,
    /// Records that already had output when the run started
    pub already_complete: usize,
    /// Records completed during this run
    pub completed: usize,
    /// Records left without output after this run
    pub failed: usize,
    /// Batches skipped because every record had output
    pub batches_skipped: usize,
    /// Times the file was rewritten
    pub checkpoints: usize,
}

impl FileReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Processed,
            total: 0,
            already_complete: 0,
            completed: 0,
            failed: 0,
            batches_skipped: 0,
            checkpoints: 0,
        }
    }

    fn skipped(path: &Path, reason: &DatasetError) -> Self {
        Self {
            status: FileStatus::Skipped(reason.to_string()),
            ..Self::new(path)
        }
    }
}

/// Totals across a directory run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
    /// Files that failed with an I/O error
    pub errors: Vec<(PathBuf, String)>,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.files.iter().map(|f| f.completed).sum()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().map(|f| f.failed).sum()
    }

    pub fn files_skipped(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Skipped(_)))
            .count()
    }
}

/// Runs completion tasks over dataset files
pub struct BatchDriver {
    client: Arc<dyn ModelClient>,
    store: DatasetStore,
    config: DriverConfig,
    policy: RetryPolicy,
}

impl BatchDriver {
    /// Create a driver; a zero batch size is treated as 1
    pub fn new(client: Arc<dyn ModelClient>, config: DriverConfig, policy: RetryPolicy) -> Self {
        let config = DriverConfig {
            batch_size: config.batch_size.max(1),
            ..config
        };
        Self {
            client,
            store: DatasetStore::new(),
            config,
            policy,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Dataset files directly inside `dir`, sorted by name
    pub fn dataset_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read dataset directory: {}", dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to list dataset directory: {}", dir.display()))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == DATASET_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Process every dataset file in `dir`, one file at a time.
    ///
    /// A file that fails does not stop the others; its error is recorded in
    /// the summary.
    pub async fn process_directory(&self, dir: &Path) -> Result<RunSummary> {
        let files = Self::dataset_files(dir)?;
        info!("Found {} dataset files in {}", files.len(), dir.display());

        let mut summary = RunSummary::default();
        for path in files {
            match self.process_file(&path).await {
                Ok(report) => summary.files.push(report),
                Err(e) => {
                    error!("Failed to process {}: {}", path.display(), e);
                    summary.errors.push((path, e.to_string()));
                }
            }
        }

        info!(
            files = summary.files.len(),
            skipped = summary.files_skipped(),
            errors = summary.errors.len(),
            completed = summary.completed(),
            failed = summary.failed(),
            "Run finished"
        );
        Ok(summary)
    }

    /// Process one dataset file.
    ///
    /// Missing or corrupt files are logged and reported as skipped; only
    /// I/O failures (including failed checkpoints) are returned as errors.
    pub async fn process_file(&self, path: &Path) -> DatasetResult<FileReport> {
        info!("Processing dataset file: {}", path.display());

        let mut records = match self.store.load(path) {
            Ok(records) => records,
            Err(e) if e.is_skippable() => {
                warn!("Skipping {}: {}", path.display(), e);
                return Ok(FileReport::skipped(path, &e));
            }
            Err(e) => return Err(e),
        };

        let mut report = FileReport::new(path);
        report.total = records.len();
        report.already_complete = records.iter().filter(|r| r.is_complete()).count();

        let batch_size = self.config.batch_size;
        let batch_count = records.len().div_ceil(batch_size);
        let mut dispatched_any = false;

        for batch_index in 0..batch_count {
            let start = batch_index * batch_size;
            let range = start..(start + batch_size).min(records.len());

            if records[range.clone()].iter().all(Record::is_complete) {
                report.batches_skipped += 1;
                continue;
            }

            if dispatched_any && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
            dispatched_any = true;

            info!(
                "Processing items {} to {} / {}",
                range.start + 1,
                range.end,
                records.len()
            );

            let outcomes = self.run_batch(&records, range).await;

            let mut new_outputs = 0;
            for (index, outcome) in outcomes {
                match outcome {
                    CompletionOutcome::Completed { text, attempts } => {
                        info!(attempts, "Output generated for item {}", index + 1);
                        records[index].set_output(text);
                        new_outputs += 1;
                    }
                    CompletionOutcome::Failed { reason, attempts } => {
                        error!(attempts, "Failed for item {}: {}", index + 1, reason);
                        report.failed += 1;
                    }
                }
            }

            if new_outputs > 0 {
                self.store.save(path, &records)?;
                report.checkpoints += 1;
                info!("Progress saved after batch {}", batch_index + 1);
            }
            report.completed += new_outputs;
        }

        info!(
            total = report.total,
            completed = report.completed,
            failed = report.failed,
            "Finished {}",
            path.display()
        );
        Ok(report)
    }

    /// Run one batch concurrently, returning `(record index, outcome)` pairs
    /// in completion order.
    ///
    /// Records that already have output are not resubmitted. A panicking
    /// task only fails its own record.
    pub async fn run_batch(&self, records: &[Record], range: Range<usize>) -> Vec<(usize, CompletionOutcome)> {
        let mut pending = FuturesUnordered::new();

        for index in range {
            let record = &records[index];
            if record.is_complete() {
                continue;
            }

            let record = record.clone();
            let client = Arc::clone(&self.client);
            let policy = self.policy.clone();
            let handle =
                tokio::spawn(async move { complete(&record, client.as_ref(), &policy).await });

            pending.push(async move { (index, handle.await) });
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        while let Some((index, joined)) = pending.next().await {
            let outcome = joined.unwrap_or_else(|e| CompletionOutcome::Failed {
                reason: FailureReason::TaskAborted(e.to_string()),
                attempts: 0,
            });
            outcomes.push((index, outcome));
        }
        outcomes
    }
}
