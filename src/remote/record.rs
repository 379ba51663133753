// File: src/remote/record.rs
//! Loosely typed records as the remote object store sees them.
//!
//! Getters return `None` for missing, `null` or wrongly typed values so that a
//! single bad field never fails a whole record.
use crate::model::location::Location;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const USER_KEY: &str = "UserName";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    Task,
    Location,
}

impl RecordClass {
    pub fn class_name(self) -> &'static str {
        match self {
            RecordClass::Task => "Task",
            RecordClass::Location => "Location",
        }
    }

    /// Field holding the record id for this class.
    pub fn id_key(self) -> &'static str {
        match self {
            RecordClass::Task => "taskID",
            RecordClass::Location => "locationID",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            RecordClass::Task => "tasks.json",
            RecordClass::Location => "locations.json",
        }
    }
}

/// Identifies the record(s) a delete applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub user: String,
    pub record_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<RawRecord> for Value {
    fn from(record: RawRecord) -> Self {
        Value::Object(record.0)
    }
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, treating `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        let value = self.get(key)?;
        if let Some(n) = value.as_i64() {
            return Some(n);
        }
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        let value = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|f| f.is_finite())
    }

    /// Nested object as its own record.
    pub fn get_record(&self, key: &str) -> Option<RawRecord> {
        self.get(key)?.as_object().cloned().map(RawRecord)
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key)?.as_array()
    }

    pub fn user(&self) -> Option<&str> {
        self.get_str(USER_KEY)
    }

    /// Record id as text. Ids stored as numbers or date objects are rendered to strings.
    /// Location records without a stored id are identified by their coordinates.
    pub fn id(&self, class: RecordClass) -> Option<String> {
        self.stored_id(class).or_else(|| match class {
            RecordClass::Location => Some(Location::coordinate_id(
                self.get_f64("latitude")?,
                self.get_f64("longitude")?,
            )),
            RecordClass::Task => None,
        })
    }

    fn stored_id(&self, class: RecordClass) -> Option<String> {
        let id = match self.get(class.id_key())? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Object(obj) => obj.get("iso")?.as_str()?.to_string(),
            _ => return None,
        };
        (!id.is_empty()).then_some(id)
    }

    pub fn matches(&self, class: RecordClass, query: &RecordQuery) -> bool {
        self.user() == Some(query.user.as_str())
            && self.id(class).as_deref() == Some(query.record_id.as_str())
    }
}

/// Replaces the record with the same user and id, or appends it.
pub fn upsert(records: &mut Vec<RawRecord>, class: RecordClass, record: RawRecord) -> Result<()> {
    let id = record
        .id(class)
        .ok_or_else(|| anyhow!("{} record has no {}", class.class_name(), class.id_key()))?;
    let query = RecordQuery {
        user: record.user().unwrap_or_default().to_string(),
        record_id: id,
    };
    if let Some(existing) = records.iter_mut().find(|r| r.matches(class, &query)) {
        *existing = record;
    } else {
        records.push(record);
    }
    Ok(())
}

/// Removes every record matching `query`. Returns how many went away.
pub fn remove_matching(records: &mut Vec<RawRecord>, class: RecordClass, query: &RecordQuery) -> usize {
    let before = records.len();
    records.retain(|r| !r.matches(class, query));
    before - records.len()
}
