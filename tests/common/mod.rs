//! Shared test helpers

#![allow(dead_code)]

use async_trait::async_trait;
use dataset_augmenter::providers::ModelClient;
use dataset_augmenter::utils::error::{ProviderError, ProviderResult};
use dataset_augmenter::{DatasetStore, Record};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

type Responder = dyn Fn(&str) -> ProviderResult<String> + Send + Sync;

/// Model client whose answers are computed from the prompt.
///
/// Records every call and the order in which calls finished.
pub struct MockClient {
    respond: Box<Responder>,
    delays: HashMap<String, Duration>,
    calls: Mutex<HashMap<String, u32>>,
    finished: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str) -> ProviderResult<String> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            delays: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
            finished: Mutex::new(Vec::new()),
        }
    }

    /// Answers `"A" + prompt`
    pub fn echo() -> Self {
        Self::new(|prompt| Ok(format!("A{}", prompt)))
    }

    /// Fails every call for `failing_prompt`, echoes the rest
    pub fn failing_on(failing_prompt: &str) -> Self {
        let failing_prompt = failing_prompt.to_string();
        Self::new(move |prompt| {
            if prompt == failing_prompt {
                Err(ProviderError::Status {
                    status: 500,
                    body: "internal error".to_string(),
                })
            } else {
                Ok(format!("A{}", prompt))
            }
        })
    }

    /// Delay the answer for one prompt
    pub fn with_delay(mut self, prompt: &str, delay: Duration) -> Self {
        self.delays.insert(prompt.to_string(), delay);
        self
    }

    pub fn calls_for(&self, prompt: &str) -> u32 {
        self.calls.lock().unwrap().get(prompt).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> u32 {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn finish_order(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        *self.calls.lock().unwrap().entry(prompt.to_string()).or_insert(0) += 1;

        if let Some(delay) = self.delays.get(prompt) {
            tokio::time::sleep(*delay).await;
        }

        let result = (self.respond)(prompt);
        self.finished.lock().unwrap().push(prompt.to_string());
        result
    }
}

/// Write records to `dir/name` and return the path
pub fn write_dataset(dir: &Path, name: &str, records: &[Record]) -> PathBuf {
    let path = dir.join(name);
    DatasetStore::new().save(&path, records).unwrap();
    path
}

/// Records with the given instructions and no output
pub fn instructions(items: &[&str]) -> Vec<Record> {
    items.iter().map(|i| Record::new(*i)).collect()
}
