// File: ./src/manager/mod.rs
//! In-memory collections that echo every change to a `RemoteStore`.
//!
//! Mutations apply locally first and persist in a spawned tokio task. Failed
//! writes are logged and dropped; the in-memory state is never rolled back.
pub mod locations;
pub mod tasks;

pub use locations::{AddKind, LocationManager};
pub use tasks::TaskManager;

use crate::remote::{RawRecord, RecordClass, RecordQuery, RemoteStore};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub enum SyncError {
    RemoteFetch(anyhow::Error),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::RemoteFetch(e) => write!(f, "Failed to fetch records: {:#}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::RemoteFetch(e) => Some(&**e),
        }
    }
}

fn spawn_save(store: &Arc<dyn RemoteStore>, class: RecordClass, record: RawRecord) -> JoinHandle<()> {
    let store = Arc::clone(store);
    tokio::spawn(async move {
        let id = record.id(class).unwrap_or_default();
        match store.save(record).await {
            Ok(()) => log::debug!("Saved {} {}", class.class_name(), id),
            Err(e) => log::warn!("Failed to save {} {}: {:#}", class.class_name(), id, e),
        }
    })
}

fn spawn_delete(store: &Arc<dyn RemoteStore>, class: RecordClass, query: RecordQuery) -> JoinHandle<()> {
    let store = Arc::clone(store);
    tokio::spawn(async move {
        let id = query.record_id.clone();
        match store.delete(query).await {
            Ok(()) => log::debug!("Deleted {} {}", class.class_name(), id),
            Err(e) => log::warn!("Failed to delete {} {}: {:#}", class.class_name(), id, e),
        }
    })
}
