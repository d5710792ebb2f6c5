//! Utilities module
//!
//! Contains error types and logging helpers

pub mod error;
pub mod logging;
