// File: ./src/remote/mod.rs
//! Remote object store collaborators.
//!
//! The managers only see `RemoteStore`. Network transport, auth and the
//! backend's own persistence format live behind implementations of it.
pub mod file;
pub mod memory;
pub mod record;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::{RawRecord, RecordClass, RecordQuery, USER_KEY};

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every record owned by `user`.
    async fn fetch_all(&self, user: &str) -> Result<Vec<RawRecord>>;

    /// Inserts the record, or replaces the one with the same user and id.
    async fn save(&self, record: RawRecord) -> Result<()>;

    async fn delete(&self, query: RecordQuery) -> Result<()>;
}
