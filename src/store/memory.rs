use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, ScoutError};
use crate::models::EventRecord;
use crate::store::EventStore;

/// Process-local store used for dry runs and tests
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<EventRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<EventRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EventRecord>> {
        // Records are pushed whole, so a poisoned lock still holds valid data
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn exists(&self, ticket_url: &str) -> Result<bool> {
        Ok(self.lock().iter().any(|r| r.ticket_url == ticket_url))
    }

    async fn insert(&self, record: &EventRecord) -> Result<()> {
        let mut records = self.lock();
        if records.iter().any(|r| r.ticket_url == record.ticket_url) {
            return Err(ScoutError::Duplicate(record.ticket_url.clone()));
        }
        records.push(record.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
