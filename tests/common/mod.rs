#![allow(dead_code)]

use async_trait::async_trait;
use entity_aggregator::{EntitySource, Identifier, MemorySource, SourceError};
use serde_json::{json, Value};
use std::sync::Mutex;

/// Wraps a source and records every call made to it
pub struct RecordingSource {
    inner: MemorySource,
    prepare_calls: Mutex<Vec<Vec<String>>>,
    get_calls: Mutex<Vec<String>>,
}

impl RecordingSource {
    pub fn new(inner: MemorySource) -> Self {
        Self {
            inner,
            prepare_calls: Mutex::new(Vec::new()),
            get_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn prepare_calls(&self) -> Vec<Vec<String>> {
        self.prepare_calls.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.get_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntitySource for RecordingSource {
    async fn prepare(&self, ids: &[Identifier]) -> Result<(), SourceError> {
        self.prepare_calls
            .lock()
            .unwrap()
            .push(ids.iter().map(|id| id.to_string()).collect());
        self.inner.prepare(ids).await
    }

    async fn get(&self, id: &Identifier) -> Result<Option<Value>, SourceError> {
        self.get_calls.lock().unwrap().push(id.to_string());
        self.inner.get(id).await
    }
}

/// Source whose every call fails
pub struct BrokenSource;

#[async_trait]
impl EntitySource for BrokenSource {
    async fn prepare(&self, _ids: &[Identifier]) -> Result<(), SourceError> {
        Err(SourceError::message("connection refused"))
    }

    async fn get(&self, _id: &Identifier) -> Result<Option<Value>, SourceError> {
        Err(SourceError::message("connection refused"))
    }
}

/// Source that accepts every batch but fails each lookup
pub struct LookupFailingSource;

#[async_trait]
impl EntitySource for LookupFailingSource {
    async fn prepare(&self, _ids: &[Identifier]) -> Result<(), SourceError> {
        Ok(())
    }

    async fn get(&self, _id: &Identifier) -> Result<Option<Value>, SourceError> {
        Err(SourceError::message("lookup failed"))
    }
}

pub fn users() -> MemorySource {
    MemorySource::by_id(vec![
        json!({"id": "A", "name": "Andy"}),
        json!({"id": "B", "name": "Bea"}),
        json!({"id": "C", "name": "Cleo"}),
    ])
}

pub fn todos() -> MemorySource {
    MemorySource::from_pairs(vec![
        ("T1", json!({"task": "Study"})),
        ("T2", json!({"task": "Cook"})),
    ])
}
