// File: src/remote/file.rs
// Record store kept in one JSON file per record class.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the on-disk wrapper below require incrementing STORE_FILE_VERSION.
use crate::context::AppContext;
use crate::remote::RemoteStore;
use crate::remote::record::{RawRecord, RecordClass, RecordQuery, remove_matching, upsert};
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const STORE_FILE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    #[serde(default)]
    version: u32,
    records: Vec<RawRecord>,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    class: RecordClass,
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path, class: RecordClass) -> Self {
        Self {
            class,
            path: dir.join(class.file_name()),
        }
    }

    /// Store under the context's data directory.
    pub fn for_context(ctx: &dyn AppContext, class: RecordClass) -> Result<Self> {
        Ok(Self::new(&ctx.get_data_dir()?, class))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file without locking. Callers hold the lock.
    fn load_internal(path: &Path) -> Result<Vec<RawRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let data: StoreFile = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(data.records)
    }

    fn write_internal(path: &Path, records: Vec<RawRecord>) -> Result<()> {
        let data = StoreFile {
            version: STORE_FILE_VERSION,
            records,
        };
        let json = serde_json::to_string_pretty(&data)?;
        LocalStorage::atomic_write(path, json)
    }

    /// Load, change and write back the record list under one lock.
    async fn modify<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<RawRecord>) -> Result<()> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            LocalStorage::with_lock(&path, || {
                let mut records = Self::load_internal(&path)?;
                f(&mut records)?;
                Self::write_internal(&path, records)
            })
        })
        .await?
    }
}

#[async_trait]
impl RemoteStore for FileStore {
    async fn fetch_all(&self, user: &str) -> Result<Vec<RawRecord>> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || {
            LocalStorage::with_lock(&path, || Self::load_internal(&path))
        })
        .await??;
        Ok(records
            .into_iter()
            .filter(|r| r.user() == Some(user))
            .collect())
    }

    async fn save(&self, record: RawRecord) -> Result<()> {
        let class = self.class;
        self.modify(move |records| upsert(records, class, record))
            .await
    }

    async fn delete(&self, query: RecordQuery) -> Result<()> {
        let class = self.class;
        self.modify(move |records| {
            remove_matching(records, class, &query);
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;
    use serde_json::json;

    fn task_record(user: &str, id: &str, name: &str) -> RawRecord {
        serde_json::from_value(json!({"UserName": user, "taskID": id, "taskName": name})).unwrap()
    }

    #[tokio::test]
    async fn records_survive_a_new_store_instance() {
        let ctx = TestContext::new();
        let store = FileStore::for_context(&ctx, RecordClass::Task).unwrap();
        store.save(task_record("me", "1", "first")).await.unwrap();
        store.save(task_record("me", "2", "second")).await.unwrap();
        store.save(task_record("you", "3", "other user")).await.unwrap();
        store.save(task_record("me", "1", "first, renamed")).await.unwrap();

        let reopened = FileStore::for_context(&ctx, RecordClass::Task).unwrap();
        let mine = reopened.fetch_all("me").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].get_str("taskName"), Some("first, renamed"));

        reopened
            .delete(RecordQuery {
                user: "me".to_string(),
                record_id: "2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(store.fetch_all("me").await.unwrap().len(), 1);
        assert_eq!(store.fetch_all("you").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_empty_and_corrupt_file_is_an_error() {
        let ctx = TestContext::new();
        let store = FileStore::for_context(&ctx, RecordClass::Location).unwrap();
        assert!(store.fetch_all("me").await.unwrap().is_empty());

        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.fetch_all("me").await.is_err());
    }
}
