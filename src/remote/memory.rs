// File: src/remote/memory.rs
use crate::remote::record::{RawRecord, RecordClass, RecordQuery, remove_matching, upsert};
use crate::remote::RemoteStore;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// In-process store, used by tests and by embedders without a backend.
#[derive(Debug)]
pub struct MemoryStore {
    class: RecordClass,
    records: Mutex<Vec<RawRecord>>,
}

impl MemoryStore {
    pub fn new(class: RecordClass) -> Self {
        Self {
            class,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Pre-populated store, e.g. with records written by an older client.
    pub fn with_records(class: RecordClass, records: Vec<RawRecord>) -> Self {
        Self {
            class,
            records: Mutex::new(records),
        }
    }

    pub async fn records(&self) -> Vec<RawRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn fetch_all(&self, user: &str) -> Result<Vec<RawRecord>> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|r| r.user() == Some(user))
            .cloned()
            .collect())
    }

    async fn save(&self, record: RawRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        upsert(&mut records, self.class, record)
    }

    async fn delete(&self, query: RecordQuery) -> Result<()> {
        let mut records = self.records.lock().await;
        let removed = remove_matching(&mut records, self.class, &query);
        log::debug!(
            "Deleted {} {} record(s) for {}",
            removed,
            self.class.class_name(),
            query.record_id
        );
        Ok(())
    }
}
