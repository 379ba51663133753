// File: src/model/location.rs
//! Geographic locations. Identity comes from the coordinate pair, never from a
//! server-assigned id, so two pins dropped on the same spot are one location.

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    id: String,
    latitude: f64,
    longitude: f64,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            id: Self::coordinate_id(latitude, longitude),
            latitude,
            longitude,
            title: None,
            subtitle: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Stable id for a coordinate pair. `-0.0` and `0.0` map to the same id.
    pub fn coordinate_id(latitude: f64, longitude: f64) -> String {
        format!("{},{}", latitude + 0.0, longitude + 0.0)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// How a task points at its location.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskLocation {
    /// A full copy of the location.
    Inline(Location),
    /// A location id, or the free-text place name stored by older records.
    Reference(String),
}

impl TaskLocation {
    pub fn id(&self) -> &str {
        match self {
            TaskLocation::Inline(loc) => loc.id(),
            TaskLocation::Reference(id) => id,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            TaskLocation::Inline(loc) => loc.title.as_deref(),
            TaskLocation::Reference(name) => Some(name),
        }
    }
}
