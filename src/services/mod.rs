//! Service layer module
//!
//! Contains the dataset store, the per-record completion task and the batch driver

pub mod completion;
pub mod driver;
pub mod store;

pub use completion::{build_prompt, complete, CompletionOutcome, FailureReason, RetryPolicy};
pub use driver::{BatchDriver, DriverConfig, FileReport, FileStatus, RunSummary};
pub use store::DatasetStore;
