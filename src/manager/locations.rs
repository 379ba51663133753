// File: ./src/manager/locations.rs
use crate::manager::{SyncError, spawn_delete, spawn_save};
use crate::model::adapter::{convert_locations, location_to_record};
use crate::model::location::Location;
use crate::remote::{RecordClass, RecordQuery, RemoteStore};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What `LocationManager::add` will do with a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddKind {
    Create,
    /// A location with the same coordinates exists; its labels get replaced.
    Edit,
}

/// The current user's saved locations, keyed by their coordinate id.
pub struct LocationManager {
    store: Arc<dyn RemoteStore>,
    user: String,
    locations: Vec<Location>,
}

impl LocationManager {
    pub fn new(store: Arc<dyn RemoteStore>, user: impl Into<String>) -> Self {
        Self {
            store,
            user: user.into(),
            locations: Vec::new(),
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id() == id)
    }

    pub async fn all_locations(&mut self, force_fetch: bool) -> Result<&[Location], SyncError> {
        if force_fetch {
            let records = self
                .store
                .fetch_all(&self.user)
                .await
                .map_err(SyncError::RemoteFetch)?;
            let total = records.len();
            self.locations = convert_locations(records);
            log::info!(
                "Fetched {} location(s) for {}, skipped {}",
                self.locations.len(),
                self.user,
                total - self.locations.len()
            );
        }
        Ok(&self.locations)
    }

    pub fn classify(&self, location: &Location) -> AddKind {
        if self.find(location.id()).is_some() {
            AddKind::Edit
        } else {
            AddKind::Create
        }
    }

    /// Inserts the location, or retitles the existing one at the same coordinates.
    pub fn add(&mut self, location: Location) -> (AddKind, JoinHandle<()>) {
        let (kind, record) = match self.locations.iter_mut().find(|l| l.id() == location.id()) {
            Some(existing) => {
                existing.title = location.title;
                existing.subtitle = location.subtitle;
                (AddKind::Edit, location_to_record(existing, &self.user))
            }
            None => {
                let record = location_to_record(&location, &self.user);
                self.locations.push(location);
                (AddKind::Create, record)
            }
        };
        (kind, spawn_save(&self.store, RecordClass::Location, record))
    }

    pub fn update(&mut self, location: Location) -> Option<JoinHandle<()>> {
        let Some(slot) = self.locations.iter_mut().find(|l| l.id() == location.id()) else {
            log::warn!("Ignoring update for unknown location {}", location.id());
            return None;
        };
        let record = location_to_record(&location, &self.user);
        *slot = location;
        Some(spawn_save(&self.store, RecordClass::Location, record))
    }

    pub fn delete(&mut self, id: &str) -> Option<(Location, JoinHandle<()>)> {
        let Some(pos) = self.locations.iter().position(|l| l.id() == id) else {
            log::warn!("Ignoring delete for unknown location {}", id);
            return None;
        };
        let location = self.locations.remove(pos);
        let query = RecordQuery {
            user: self.user.clone(),
            record_id: location.id().to_string(),
        };
        Some((location, spawn_delete(&self.store, RecordClass::Location, query)))
    }
}
