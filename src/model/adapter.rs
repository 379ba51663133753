// File: src/model/adapter.rs
//! Conversion between tasks/locations and remote store records.
//!
//! Reading never fails on a single bad field: the field just comes back as
//! `None`. Only a record without an identity is rejected, since nothing could
//! update or delete it afterwards.
use crate::model::item::{Contact, MAX_PRIORITY, Recurrence, Task};
use crate::model::location::{Location, TaskLocation};
use crate::remote::record::{RawRecord, RecordClass, USER_KEY};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;
use std::fmt;

pub const TASK_ID: &str = "taskID";
pub const TASK_NAME: &str = "taskName";
pub const TASK_NAME_WITH_ANNOTATIONS: &str = "taskNameWithAnnotations";
pub const TASK_DATE: &str = "taskDate";
pub const TASK_FROM_DATE: &str = "taskFromDate";
pub const TASK_PRIORITY: &str = "taskPriority";
// Misspelling is part of the stored schema.
pub const TASK_RECURRENCE: &str = "taskReccurence";
pub const TASK_LIST: &str = "taskList";
pub const TASK_LOCATION: &str = "taskLocation";
pub const TASK_CONTACTS: &str = "taskContacts";
pub const TASK_SOCIAL_CONTACT: &str = "taskSocialContact";

pub const LOCATION_ID: &str = "locationID";
pub const LOCATION_LATITUDE: &str = "latitude";
pub const LOCATION_LONGITUDE: &str = "longitude";
pub const LOCATION_TITLE: &str = "title";
pub const LOCATION_SUBTITLE: &str = "subtitle";

pub const CONTACT_IDENTIFIER: &str = "identifier";
pub const CONTACT_NAME: &str = "name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    MissingId(RecordClass),
    MissingCoordinates,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::MissingId(class) => {
                write!(f, "{} record has no usable {}", class.class_name(), class.id_key())
            }
            ConversionError::MissingCoordinates => {
                write!(f, "Location record has no usable coordinates")
            }
        }
    }
}

impl std::error::Error for ConversionError {}

/// The two task layouts found in the store.
///
/// Older clients wrote `Flat` records: `taskLocation` holds a plain place name
/// and a single `taskSocialContact` string stands in for the contact list.
/// Current clients write `Structured` records with an embedded location object
/// and a `taskContacts` array. Both read into the same `Task`; writes always
/// produce the structured layout, so flat records migrate on their next save.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTaskRecord {
    Structured(RawRecord),
    Flat(RawRecord),
}

impl RawTaskRecord {
    pub fn classify(record: RawRecord) -> Self {
        if record.contains(TASK_SOCIAL_CONTACT) || record.get_str(TASK_LOCATION).is_some() {
            RawTaskRecord::Flat(record)
        } else {
            RawTaskRecord::Structured(record)
        }
    }

    pub fn record(&self) -> &RawRecord {
        match self {
            RawTaskRecord::Structured(record) | RawTaskRecord::Flat(record) => record,
        }
    }

    pub fn into_task(self) -> Result<Task, ConversionError> {
        let record = self.record();
        let id = record
            .id(RecordClass::Task)
            .ok_or(ConversionError::MissingId(RecordClass::Task))?;

        let mut task = Task::with_id(id);
        task.name = record.get_str(TASK_NAME).unwrap_or_default().to_string();
        task.name_with_annotations = record
            .get_str(TASK_NAME_WITH_ANNOTATIONS)
            .map(str::to_string)
            .unwrap_or_else(|| task.name.clone());
        task.date = read_date(record, TASK_DATE);
        task.from_date = read_date(record, TASK_FROM_DATE);
        task.priority = record
            .get_i64(TASK_PRIORITY)
            .and_then(|p| u8::try_from(p).ok())
            .filter(|p| (1..=MAX_PRIORITY).contains(p));
        task.label = read_text(record, TASK_LIST);
        task.recurrence = record
            .get_i64(TASK_RECURRENCE)
            .and_then(Recurrence::from_index);

        match &self {
            RawTaskRecord::Structured(record) => {
                task.location = record
                    .get_record(TASK_LOCATION)
                    .and_then(|obj| task_location_from_object(&obj));
                task.contacts = read_contact_array(record);
            }
            RawTaskRecord::Flat(record) => {
                task.location = match read_text(record, TASK_LOCATION) {
                    Some(name) => Some(TaskLocation::Reference(name)),
                    None => record
                        .get_record(TASK_LOCATION)
                        .and_then(|obj| task_location_from_object(&obj)),
                };
                task.contacts = read_text(record, TASK_SOCIAL_CONTACT)
                    .map(|name| Contact::new(name.clone(), name))
                    .into_iter()
                    .chain(read_contact_array(record))
                    .collect();
            }
        }
        Ok(task)
    }
}

/// Structured-layout record for `task`, owned by `user`.
pub fn task_to_record(task: &Task, user: &str) -> RawRecord {
    let mut record = RawRecord::new();
    record.set(USER_KEY, user);
    record.set(TASK_ID, task.id());
    record.set(TASK_NAME, task.name.as_str());
    record.set(TASK_NAME_WITH_ANNOTATIONS, task.name_with_annotations.as_str());

    if let Some(date) = task.date {
        record.set(TASK_DATE, write_date(date));
    }
    if let Some(date) = task.from_date {
        record.set(TASK_FROM_DATE, write_date(date));
    }
    if let Some(priority) = task.priority {
        record.set(TASK_PRIORITY, priority);
    }
    if let Some(label) = &task.label {
        record.set(TASK_LIST, label.as_str());
    }
    if let Some(recurrence) = task.recurrence {
        record.set(TASK_RECURRENCE, recurrence.index());
    }
    match &task.location {
        Some(TaskLocation::Inline(location)) => {
            record.set(TASK_LOCATION, location_fields(location));
        }
        Some(TaskLocation::Reference(id)) => {
            let mut reference = RawRecord::new();
            reference.set(LOCATION_ID, id.as_str());
            record.set(TASK_LOCATION, reference);
        }
        None => {}
    }
    if !task.contacts.is_empty() {
        let contacts: Vec<Value> = task
            .contacts
            .iter()
            .map(|c| {
                let mut obj = RawRecord::new();
                obj.set(CONTACT_IDENTIFIER, c.identifier.as_str());
                obj.set(CONTACT_NAME, c.name.as_str());
                Value::from(obj)
            })
            .collect();
        record.set(TASK_CONTACTS, contacts);
    }
    record
}

pub fn location_from_record(record: &RawRecord) -> Result<Location, ConversionError> {
    let latitude = record
        .get_f64(LOCATION_LATITUDE)
        .ok_or(ConversionError::MissingCoordinates)?;
    let longitude = record
        .get_f64(LOCATION_LONGITUDE)
        .ok_or(ConversionError::MissingCoordinates)?;
    let mut location = Location::new(latitude, longitude);
    location.title = read_text(record, LOCATION_TITLE);
    location.subtitle = read_text(record, LOCATION_SUBTITLE);
    Ok(location)
}

pub fn location_to_record(location: &Location, user: &str) -> RawRecord {
    let mut record = location_fields(location);
    record.set(USER_KEY, user);
    record
}

fn location_fields(location: &Location) -> RawRecord {
    let mut record = RawRecord::new();
    record.set(LOCATION_ID, location.id());
    record.set(LOCATION_LATITUDE, location.latitude());
    record.set(LOCATION_LONGITUDE, location.longitude());
    if let Some(title) = &location.title {
        record.set(LOCATION_TITLE, title.as_str());
    }
    if let Some(subtitle) = &location.subtitle {
        record.set(LOCATION_SUBTITLE, subtitle.as_str());
    }
    record
}

/// Converts a fetched batch. Records that cannot become tasks are logged and skipped.
pub fn convert_tasks(records: Vec<RawRecord>) -> Vec<Task> {
    records
        .into_iter()
        .filter_map(|record| match RawTaskRecord::classify(record).into_task() {
            Ok(task) => Some(task),
            Err(e) => {
                log::warn!("Skipping task record: {}", e);
                None
            }
        })
        .collect()
}

pub fn convert_locations(records: Vec<RawRecord>) -> Vec<Location> {
    records
        .iter()
        .filter_map(|record| match location_from_record(record) {
            Ok(location) => Some(location),
            Err(e) => {
                log::warn!("Skipping location record: {}", e);
                None
            }
        })
        .collect()
}

fn task_location_from_object(obj: &RawRecord) -> Option<TaskLocation> {
    if let Ok(location) = location_from_record(obj) {
        return Some(TaskLocation::Inline(location));
    }
    read_text(obj, LOCATION_ID)
        .or_else(|| read_text(obj, LOCATION_TITLE))
        .map(TaskLocation::Reference)
}

fn read_contact_array(record: &RawRecord) -> Vec<Contact> {
    let Some(values) = record.get_array(TASK_CONTACTS) else {
        return Vec::new();
    };
    values
        .iter()
        .filter_map(|value| {
            let obj = RawRecord::from(value.as_object()?.clone());
            let name = read_text(&obj, CONTACT_NAME);
            let identifier = read_text(&obj, CONTACT_IDENTIFIER).or_else(|| name.clone())?;
            Some(Contact::new(identifier.clone(), name.unwrap_or(identifier)))
        })
        .collect()
}

fn read_text(record: &RawRecord, key: &str) -> Option<String> {
    record
        .get_str(key)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts RFC 3339 strings, plain `YYYY-MM-DD` and `{"__type": "Date", "iso": ...}`.
fn read_date(record: &RawRecord, key: &str) -> Option<NaiveDate> {
    let text = match record.get(key)? {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("iso")?.as_str()?,
        _ => return None,
    };
    parse_date_text(text)
}

pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn write_date(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN).and_utc().to_rfc3339()
}
