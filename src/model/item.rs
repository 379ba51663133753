// File: ./src/model/item.rs
use crate::model::location::TaskLocation;
use crate::model::parser::{Annotations, Vocabulary};
use crate::model::strip::{StripError, strip};
use crate::model::subrange::Subranges;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use uuid::Uuid;

/// Highest accepted priority value. 1 is the most urgent.
pub const MAX_PRIORITY: u8 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub identifier: String,
    pub name: String,
}

impl Contact {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Recurrence {
    Daily,
    Weekdays,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// Words accepted after the recurrence trigger.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Recurrence::Daily => &["daily", "every day"],
            Recurrence::Weekdays => &["weekdays", "every weekday"],
            Recurrence::Weekly => &["weekly", "every week"],
            Recurrence::Monthly => &["monthly", "every month"],
            Recurrence::Yearly => &["yearly", "every year"],
        }
    }

    /// Integer stored in the `taskReccurence` field.
    pub fn index(self) -> i64 {
        Self::iter().position(|r| r == self).unwrap_or_default() as i64
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::iter().nth(i))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: String,
    pub name: String,
    pub name_with_annotations: String,
    pub date: Option<NaiveDate>,
    pub from_date: Option<NaiveDate>,
    pub priority: Option<u8>,
    pub label: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub location: Option<TaskLocation>,
    pub contacts: Vec<Contact>,
    pub subranges: Subranges,
}

impl Task {
    /// Creates a task with a fresh id from smart input.
    pub fn new(input: &str, vocabulary: &Vocabulary, today: NaiveDate) -> Self {
        let mut task = Self::with_id(Uuid::new_v4().to_string());
        task.apply_smart_input(input, vocabulary, today);
        task
    }

    /// Blank task carrying an existing id, used when rebuilding from records.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            name_with_annotations: String::new(),
            date: None,
            from_date: None,
            priority: None,
            label: None,
            recurrence: None,
            location: None,
            contacts: Vec::new(),
            subranges: Subranges::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Re-parses `input` from scratch: annotations are reset, extracted again and
    /// stripped from the display name. The raw input is kept for re-editing.
    pub fn apply_smart_input(&mut self, input: &str, vocabulary: &Vocabulary, today: NaiveDate) {
        let extraction = vocabulary.extract(input, today);
        self.name_with_annotations = input.to_string();
        self.apply_annotations(extraction.annotations);

        if let Err(e) = self.remove_annotations() {
            log::warn!("Keeping raw text for task {}: {}", self.id, e);
            self.name = input.to_string();
        }
    }

    pub fn apply_annotations(&mut self, annotations: Annotations) {
        self.date = annotations.date;
        self.from_date = annotations.from_date;
        self.priority = annotations.priority;
        self.label = annotations.label;
        self.recurrence = annotations.recurrence;
        self.location = annotations.location;
        self.contacts = annotations.contacts;
        self.subranges = annotations.subranges;
    }

    /// Sets `name` to `name_with_annotations` minus every recorded subrange.
    pub fn remove_annotations(&mut self) -> Result<(), StripError> {
        self.name = strip(&self.name_with_annotations, &self.subranges.ranges())?;
        Ok(())
    }

    pub fn has_annotations(&self) -> bool {
        self.date.is_some()
            || self.from_date.is_some()
            || self.priority.is_some()
            || self.label.is_some()
            || self.recurrence.is_some()
            || self.location.is_some()
            || !self.contacts.is_empty()
    }
}
