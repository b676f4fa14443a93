//! Scriptable fakes for the pipeline seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;

use crate::classifier::{Classification, Classifier};
use crate::error::PipelineError;
use crate::record::{NewRawRecord, RawRecord};
use crate::source::DatasetSource;
use crate::store::{InMemoryRecordStore, RawRecordStore};

/// Dataset source backed by a fixed map. Datasets listed in `failing`
/// error on fetch; `list_fails` makes listing error.
#[derive(Default)]
pub struct FakeSource {
    pub ids: Vec<String>,
    pub items: HashMap<String, Vec<Value>>,
    pub failing: Vec<String>,
    pub list_fails: bool,
    pub fetches: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_dataset(mut self, id: &str, items: Vec<Value>) -> Self {
        self.ids.push(id.to_string());
        self.items.insert(id.to_string(), items);
        self
    }

    pub fn with_failing_dataset(mut self, id: &str) -> Self {
        self.ids.push(id.to_string());
        self.failing.push(id.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl DatasetSource for FakeSource {
    async fn list_dataset_ids(&self) -> Result<Vec<String>, PipelineError> {
        if self.list_fails {
            return Err(PipelineError::Upstream("listing unavailable".into()));
        }
        Ok(self.ids.clone())
    }

    async fn fetch_all(&self, dataset_id: &str) -> Result<Vec<Value>, PipelineError> {
        self.fetches.lock().unwrap().push(dataset_id.to_string());
        if self.failing.iter().any(|id| id == dataset_id) {
            return Err(PipelineError::Upstream(format!("{dataset_id} unavailable")));
        }
        Ok(self.items.get(dataset_id).cloned().unwrap_or_default())
    }
}

/// In-memory store whose Nth `create` call (1-based) fails.
pub struct FlakyStore {
    pub inner: InMemoryRecordStore,
    pub fail_on_call: usize,
    pub calls: AtomicUsize,
}

impl FlakyStore {
    pub fn failing_on(call: usize) -> Self {
        Self {
            inner: InMemoryRecordStore::new(),
            fail_on_call: call,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RawRecordStore for FlakyStore {
    async fn create(&self, record: &NewRawRecord) -> Result<RawRecord, PipelineError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on_call {
            return Err(PipelineError::Store("connection reset".into()));
        }
        self.inner.create(record).await
    }

    async fn find_all(&self) -> Result<Vec<RawRecord>, PipelineError> {
        self.inner.find_all().await
    }
}

/// Store whose reads always fail.
pub struct UnreadableStore;

#[async_trait]
impl RawRecordStore for UnreadableStore {
    async fn create(&self, _record: &NewRawRecord) -> Result<RawRecord, PipelineError> {
        Err(PipelineError::Store("read-only".into()))
    }

    async fn find_all(&self) -> Result<Vec<RawRecord>, PipelineError> {
        Err(PipelineError::Store("relation does not exist".into()))
    }
}

/// Classifier that records every text it sees and fails on texts listed
/// in `fail_on`.
#[derive(Default)]
pub struct RecordingClassifier {
    pub fail_on: Vec<String>,
    pub seen: Mutex<Vec<String>>,
}

impl RecordingClassifier {
    pub fn failing_on(text: &str) -> Self {
        Self {
            fail_on: vec![text.to_string()],
            ..Default::default()
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for RecordingClassifier {
    async fn classify(&self, text: &str) -> anyhow::Result<Classification> {
        self.seen.lock().unwrap().push(text.to_string());
        if self.fail_on.iter().any(|t| t == text) {
            return Err(anyhow!("classifier overloaded"));
        }
        Ok(Classification {
            category: "other".into(),
            is_relevant: true,
            confidence: 0.9,
            summary: text.to_string(),
        })
    }
}
