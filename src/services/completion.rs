//! Completion task
//!
//! Turns one record into a prompt and asks the model client for a
//! completion, retrying with randomized backoff until a non-empty answer
//! arrives or the retry budget runs out.

use crate::config::settings::RetryConfig;
use crate::models::Record;
use crate::providers::ModelClient;
use crate::utils::logging::preview;
use rand::Rng;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Retry policy for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts before giving up; `None` retries indefinitely
    pub max_retries: Option<u32>,
    /// Lower bound of the backoff between attempts
    pub backoff_min: Duration,
    /// Upper bound of the backoff between attempts
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: Some(10),
            backoff_min: Duration::from_secs(2),
            backoff_max: Duration::from_secs(5),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_min: Duration::from_millis(config.min_delay_ms),
            backoff_max: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Policy without backoff, for tests and local endpoints
    pub fn immediate(max_retries: Option<u32>) -> Self {
        Self {
            max_retries,
            backoff_min: Duration::ZERO,
            backoff_max: Duration::ZERO,
        }
    }

    /// Uniformly sampled wait before the next attempt
    pub fn backoff_delay(&self) -> Duration {
        if self.backoff_max <= self.backoff_min {
            return self.backoff_min;
        }
        let min = self.backoff_min.as_millis() as u64;
        let max = self.backoff_max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    /// Whether `attempts` has used up the budget
    fn exhausted(&self, attempts: u32) -> bool {
        self.max_retries.is_some_and(|max| attempts >= max)
    }
}

/// Why an attempt is worth repeating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// The provider call failed with a transient error
    ProviderError(String),
    /// The provider answered with blank text
    EmptyCompletion,
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReason::ProviderError(msg) => write!(f, "provider error: {}", msg),
            RetryReason::EmptyCompletion => f.write_str("empty completion"),
        }
    }
}

/// Result of a single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// Trimmed, non-empty completion
    Success(String),
    /// Try again after backoff
    Retryable(RetryReason),
    /// Further attempts cannot succeed
    Terminal(String),
}

/// Why a record ended without output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Every attempt in the budget was retryable and none succeeded
    RetryBudgetExhausted { last: RetryReason },
    /// The provider rejected the request outright
    NonRetryable(String),
    /// The task did not run to completion
    TaskAborted(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::RetryBudgetExhausted { last } => {
                write!(f, "retry budget exhausted (last: {})", last)
            }
            FailureReason::NonRetryable(msg) => write!(f, "non-retryable error: {}", msg),
            FailureReason::TaskAborted(msg) => write!(f, "task aborted: {}", msg),
        }
    }
}

/// Final outcome for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completed { text: String, attempts: u32 },
    Failed { reason: FailureReason, attempts: u32 },
}

impl CompletionOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            CompletionOutcome::Completed { text, .. } => Some(text),
            CompletionOutcome::Failed { .. } => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            CompletionOutcome::Completed { attempts, .. } | CompletionOutcome::Failed { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Prompt for a record: the instruction alone, or instruction and input
/// on two labelled lines when the input is non-empty
pub fn build_prompt(record: &Record) -> String {
    let input = record.input_text();
    if input.is_empty() {
        record.instruction().to_string()
    } else {
        format!("Instruction: {}\nInput: {}", record.instruction(), input)
    }
}

/// Run one attempt and classify the result
pub async fn attempt(client: &dyn ModelClient, prompt: &str) -> AttemptResult {
    match client.generate(prompt).await {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                AttemptResult::Retryable(RetryReason::EmptyCompletion)
            } else {
                AttemptResult::Success(trimmed.to_string())
            }
        }
        Err(e) if e.is_retryable() => AttemptResult::Retryable(RetryReason::ProviderError(e.to_string())),
        Err(e) => AttemptResult::Terminal(e.to_string()),
    }
}

/// Complete a record, retrying per `policy`.
///
/// Never returns an error: exhausting the budget yields
/// [`CompletionOutcome::Failed`] so the caller can leave the record for a
/// later run.
pub async fn complete(record: &Record, client: &dyn ModelClient, policy: &RetryPolicy) -> CompletionOutcome {
    let prompt = build_prompt(record);
    let label = preview(record.instruction(), 40);
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        let reason = match attempt(client, &prompt).await {
            AttemptResult::Success(text) => {
                debug!(attempts, "Completion received for '{}'", label);
                return CompletionOutcome::Completed { text, attempts };
            }
            AttemptResult::Terminal(msg) => {
                error!(attempts, "Giving up on '{}': {}", label, msg);
                return CompletionOutcome::Failed {
                    reason: FailureReason::NonRetryable(msg),
                    attempts,
                };
            }
            AttemptResult::Retryable(reason) => reason,
        };

        if policy.exhausted(attempts) {
            error!(attempts, "Retry budget exhausted for '{}': {}", label, reason);
            return CompletionOutcome::Failed {
                reason: FailureReason::RetryBudgetExhausted { last: reason },
                attempts,
            };
        }

        let wait = policy.backoff_delay();
        warn!(
            attempts,
            max = ?policy.max_retries,
            "Attempt failed for '{}' ({}), retrying in {:.1}s",
            label,
            reason,
            wait.as_secs_f32()
        );
        tokio::time::sleep(wait).await;
    }
}
