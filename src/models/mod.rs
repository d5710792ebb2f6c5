//! Data models module
//!
//! Dataset records and the chat completion wire format

pub mod chat;
pub mod record;

pub use record::Record;
