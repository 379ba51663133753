// File: ./src/manager/tasks.rs
use crate::manager::{SyncError, spawn_delete, spawn_save};
use crate::model::adapter::{convert_tasks, task_to_record};
use crate::model::item::Task;
use crate::model::parser::Vocabulary;
use crate::remote::{RecordClass, RecordQuery, RemoteStore};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The current user's tasks.
///
/// Mutating methods spawn onto the ambient tokio runtime and must be called
/// from within one. The returned handles may be dropped or awaited.
pub struct TaskManager {
    store: Arc<dyn RemoteStore>,
    user: String,
    tasks: Vec<Task>,
}

impl TaskManager {
    pub fn new(store: Arc<dyn RemoteStore>, user: impl Into<String>) -> Self {
        Self {
            store,
            user: user.into(),
            tasks: Vec::new(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// With `force_fetch`, replaces the in-memory list with the remote one.
    /// A failed fetch leaves the current list untouched.
    pub async fn all_tasks(&mut self, force_fetch: bool) -> Result<&[Task], SyncError> {
        if force_fetch {
            let records = self
                .store
                .fetch_all(&self.user)
                .await
                .map_err(SyncError::RemoteFetch)?;
            let total = records.len();
            self.tasks = convert_tasks(records);
            log::info!(
                "Fetched {} task(s) for {}, skipped {}",
                self.tasks.len(),
                self.user,
                total - self.tasks.len()
            );
        }
        Ok(&self.tasks)
    }

    /// Appends the task. A task whose id is already listed replaces that entry,
    /// matching the store's upsert.
    pub fn add(&mut self, task: Task) -> JoinHandle<()> {
        let record = task_to_record(&task, &self.user);
        match self.tasks.iter_mut().find(|t| t.id() == task.id()) {
            Some(existing) => {
                log::debug!("Task {} already listed, replacing it", task.id());
                *existing = task;
            }
            None => self.tasks.push(task),
        }
        spawn_save(&self.store, RecordClass::Task, record)
    }

    /// Replaces the task with the same id. Unknown ids are ignored.
    pub fn update(&mut self, task: Task) -> Option<JoinHandle<()>> {
        let Some(slot) = self.tasks.iter_mut().find(|t| t.id() == task.id()) else {
            log::warn!("Ignoring update for unknown task {}", task.id());
            return None;
        };
        let record = task_to_record(&task, &self.user);
        *slot = task;
        Some(spawn_save(&self.store, RecordClass::Task, record))
    }

    /// Removes the task now and deletes its record in the background.
    pub fn delete(&mut self, id: &str) -> Option<(Task, JoinHandle<()>)> {
        let Some(pos) = self.tasks.iter().position(|t| t.id() == id) else {
            log::warn!("Ignoring delete for unknown task {}", id);
            return None;
        };
        let task = self.tasks.remove(pos);
        let query = RecordQuery {
            user: self.user.clone(),
            record_id: task.id().to_string(),
        };
        let handle = spawn_delete(&self.store, RecordClass::Task, query);
        Some((task, handle))
    }

    /// Confirms text typed for `task`: re-extracts annotations from `raw_text`,
    /// strips them into the name and stores the result as a new or updated task.
    pub fn confirm_input(
        &mut self,
        mut task: Task,
        raw_text: &str,
        vocabulary: &Vocabulary,
        today: NaiveDate,
    ) -> Option<JoinHandle<()>> {
        task.apply_smart_input(raw_text, vocabulary, today);
        if self.find(task.id()).is_some() {
            self.update(task)
        } else {
            Some(self.add(task))
        }
    }
}
