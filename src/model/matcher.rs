// Logic for deciding which tasks and locations a search query shows.
//
// A filter result has three states: `None` means no filter is active and the
// full list should be shown, `Some(vec![])` means the filter matched nothing,
// and `Some(items)` carries the matches. Lists must be re-filtered after every
// mutation and every query change.

use crate::model::item::Task;
use crate::model::location::Location;
use crate::model::parser::TaskSpecialCharacter;

/// Case-insensitive substring filter over one field of each item.
///
/// Items whose field is `None` never match.
pub fn filter<'a, T, F>(items: &'a [T], query: &str, field: F) -> Option<Vec<&'a T>>
where
    F: Fn(&T) -> Option<&str>,
{
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    Some(
        items
            .iter()
            .filter(|&item| {
                field(item).is_some_and(|value| value.to_lowercase().contains(&needle))
            })
            .collect(),
    )
}

/// Tasks are searched by display name. A query opening with the label trigger
/// (`#groceries`) searches labels instead, which is how the label list jumps
/// into a pre-filtered task list.
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &str) -> Option<Vec<&'a Task>> {
    let trimmed = query.trim();
    if let Some(label) = trimmed.strip_prefix(TaskSpecialCharacter::Label.as_char())
        && !label.trim().is_empty()
    {
        return filter(tasks, label, |t| t.label.as_deref());
    }
    filter(tasks, trimmed, |t| Some(t.name.as_str()))
}

pub fn filter_locations<'a>(locations: &'a [Location], query: &str) -> Option<Vec<&'a Location>> {
    filter(locations, query, |l| l.title.as_deref())
}

/// Current search text of a list screen.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear(&mut self) {
        self.query.clear();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// The rows to show: the filtered subset, or everything when no filter is active.
    pub fn visible<'a, T, F>(&self, items: &'a [T], field: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> Option<&str>,
    {
        filter(items, &self.query, field).unwrap_or_else(|| items.iter().collect())
    }

    pub fn visible_tasks<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        filter_tasks(tasks, &self.query).unwrap_or_else(|| tasks.iter().collect())
    }

    pub fn visible_locations<'a>(&self, locations: &'a [Location]) -> Vec<&'a Location> {
        filter_locations(locations, &self.query).unwrap_or_else(|| locations.iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_means_no_filter() {
        let items: Vec<String> = Vec::new();
        assert!(filter(&items, "", |s| Some(s.as_str())).is_none());
        let items = vec!["a".to_string()];
        assert!(filter(&items, "  \t ", |s| Some(s.as_str())).is_none());
    }

    #[test]
    fn active_filter_may_match_nothing() {
        let items = vec!["alpha".to_string(), "beta".to_string()];
        assert_eq!(filter(&items, "zzz", |s| Some(s.as_str())), Some(vec![]));
    }

    #[test]
    fn absent_fields_never_match() {
        let items = vec![Some("Home".to_string()), None];
        let hits = filter(&items, "h", |s| s.as_deref()).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn search_state_shows_all_when_inactive() {
        let items = vec!["x".to_string(), "y".to_string()];
        let mut search = SearchState::new();
        assert_eq!(search.visible(&items, |s| Some(s.as_str())).len(), 2);
        search.set_query(" X ");
        assert!(search.is_active());
        assert_eq!(search.visible(&items, |s| Some(s.as_str())), vec![&items[0]]);
        search.clear();
        assert!(!search.is_active());
    }
}
