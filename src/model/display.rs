// File: ./src/model/display.rs
use crate::model::item::Task;
use crate::model::location::{Location, TaskLocation};
use crate::model::parser::TaskSpecialCharacter;

pub trait TaskDisplay {
    fn to_smart_string(&self) -> String;
    fn annotation_summary(&self) -> String;
    fn list_line(&self) -> String;
}

impl TaskDisplay for Task {
    /// Text to put back in the input field when the task is edited.
    fn to_smart_string(&self) -> String {
        if !self.name_with_annotations.is_empty() {
            return self.name_with_annotations.clone();
        }

        // Records from older clients carry no annotated text. Rebuild one.
        let mut s = self.name.trim_end().to_string();
        if let Some(d) = self.date {
            s.push_str(&format!(" {}{}", TaskSpecialCharacter::Date, d.format("%Y-%m-%d")));
        }
        if let Some(d) = self.from_date {
            s.push_str(&format!(" {}{}", TaskSpecialCharacter::FromDate, d.format("%Y-%m-%d")));
        }
        if let Some(p) = self.priority {
            s.push_str(&format!(" {}{}", TaskSpecialCharacter::Priority, p));
        }
        if let Some(label) = &self.label {
            s.push_str(&format!(" {}{}", TaskSpecialCharacter::Label, label));
        }
        if let Some(r) = self.recurrence
            && let Some(word) = r.keywords().first()
        {
            s.push_str(&format!(" {}{}", TaskSpecialCharacter::Recurrence, word));
        }
        if let Some(title) = self.location.as_ref().and_then(TaskLocation::title) {
            s.push_str(&format!(" {}{}", TaskSpecialCharacter::Location, title));
        }
        for c in &self.contacts {
            s.push_str(&format!(" {}{}", TaskSpecialCharacter::Contact, c.name));
        }
        s
    }

    fn annotation_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(d) = self.from_date {
            parts.push(format!("from {}", d.format("%Y-%m-%d")));
        }
        if let Some(d) = self.date {
            parts.push(format!("due {}", d.format("%Y-%m-%d")));
        }
        if let Some(p) = self.priority {
            parts.push(format!("!{}", p));
        }
        if let Some(label) = &self.label {
            parts.push(format!("#{}", label));
        }
        if let Some(r) = self.recurrence
            && let Some(word) = r.keywords().first()
        {
            parts.push(format!("*{}", word));
        }
        if let Some(loc) = &self.location {
            parts.push(format!("~{}", loc.title().unwrap_or(loc.id())));
        }
        for c in &self.contacts {
            parts.push(format!("+{}", c.name));
        }
        parts.join(", ")
    }

    fn list_line(&self) -> String {
        let short_id: String = self.id().chars().take(8).collect();
        let summary = self.annotation_summary();
        if summary.is_empty() {
            format!("[{}] {}", short_id, self.name.trim_end())
        } else {
            format!("[{}] {}  ({})", short_id, self.name.trim_end(), summary)
        }
    }
}

pub fn location_line(location: &Location) -> String {
    let title = location.title.as_deref().unwrap_or("(untitled)");
    match &location.subtitle {
        Some(sub) => format!("[{}] {} - {}", location.id(), title, sub),
        None => format!("[{}] {}", location.id(), title),
    }
}
