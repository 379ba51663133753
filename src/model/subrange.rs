// File: src/model/subrange.rs
//! Named subranges of an annotated task text.
//!
//! Offsets are byte offsets into `Task::name_with_annotations` and always sit on
//! char boundaries. They never point into the stripped display name.
use crate::model::parser::TaskSpecialCharacter;
use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subranges {
    pub date: Option<Range<usize>>,
    pub from_date: Option<Range<usize>>,
    pub priority: Option<Range<usize>>,
    pub label: Option<Range<usize>>,
    pub recurrence: Option<Range<usize>>,
    pub location: Option<Range<usize>>,
    pub contacts: Vec<Range<usize>>,
}

impl Subranges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Range of a single-valued annotation. Contacts have several, see `contacts`.
    pub fn get(&self, kind: TaskSpecialCharacter) -> Option<&Range<usize>> {
        match kind {
            TaskSpecialCharacter::Date => self.date.as_ref(),
            TaskSpecialCharacter::FromDate => self.from_date.as_ref(),
            TaskSpecialCharacter::Priority => self.priority.as_ref(),
            TaskSpecialCharacter::Label => self.label.as_ref(),
            TaskSpecialCharacter::Recurrence => self.recurrence.as_ref(),
            TaskSpecialCharacter::Location => self.location.as_ref(),
            TaskSpecialCharacter::Contact => None,
        }
    }

    /// Records a range. Contact ranges accumulate, the rest overwrite.
    pub fn set(&mut self, kind: TaskSpecialCharacter, range: Range<usize>) {
        match kind {
            TaskSpecialCharacter::Date => self.date = Some(range),
            TaskSpecialCharacter::FromDate => self.from_date = Some(range),
            TaskSpecialCharacter::Priority => self.priority = Some(range),
            TaskSpecialCharacter::Label => self.label = Some(range),
            TaskSpecialCharacter::Recurrence => self.recurrence = Some(range),
            TaskSpecialCharacter::Location => self.location = Some(range),
            TaskSpecialCharacter::Contact => self.contacts.push(range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// All (kind, range) pairs, single-valued fields first, then contacts in order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskSpecialCharacter, &Range<usize>)> {
        let singles = [
            (TaskSpecialCharacter::Date, &self.date),
            (TaskSpecialCharacter::FromDate, &self.from_date),
            (TaskSpecialCharacter::Label, &self.label),
            (TaskSpecialCharacter::Priority, &self.priority),
            (TaskSpecialCharacter::Recurrence, &self.recurrence),
            (TaskSpecialCharacter::Location, &self.location),
        ];
        singles
            .into_iter()
            .filter_map(|(kind, range)| range.as_ref().map(|r| (kind, r)))
            .chain(
                self.contacts
                    .iter()
                    .map(|r| (TaskSpecialCharacter::Contact, r)),
            )
    }

    pub fn ranges(&self) -> Vec<Range<usize>> {
        self.iter().map(|(_, r)| r.clone()).collect()
    }

    /// Ranges ordered by end offset, highest first: the order they must be removed in.
    pub fn descending(&self) -> Vec<Range<usize>> {
        let mut ranges = self.ranges();
        ranges.sort_by(|a, b| b.end.cmp(&a.end).then(b.start.cmp(&a.start)));
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contacts_accumulate_and_singles_overwrite() {
        let mut subranges = Subranges::new();
        subranges.set(TaskSpecialCharacter::Label, 0..3);
        subranges.set(TaskSpecialCharacter::Label, 4..8);
        subranges.set(TaskSpecialCharacter::Contact, 10..14);
        subranges.set(TaskSpecialCharacter::Contact, 15..20);

        assert_eq!(subranges.get(TaskSpecialCharacter::Label), Some(&(4..8)));
        assert_eq!(subranges.contacts, vec![10..14, 15..20]);
        assert_eq!(subranges.get(TaskSpecialCharacter::Contact), None);
    }

    #[test]
    fn descending_orders_by_end() {
        let mut subranges = Subranges::new();
        subranges.set(TaskSpecialCharacter::Priority, 20..25);
        subranges.set(TaskSpecialCharacter::Date, 0..4);
        subranges.set(TaskSpecialCharacter::Contact, 10..15);

        assert_eq!(subranges.descending(), vec![20..25, 10..15, 0..4]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut subranges = Subranges::new();
        assert!(subranges.is_empty());
        subranges.set(TaskSpecialCharacter::Recurrence, 1..2);
        assert!(!subranges.is_empty());
        subranges.clear();
        assert!(subranges.is_empty());
    }
}
