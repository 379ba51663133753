// File: src/model/parser.rs
use crate::model::item::{Contact, MAX_PRIORITY, Recurrence};
use crate::model::location::{Location, TaskLocation};
use crate::model::subrange::Subranges;
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use std::fmt;
use std::ops::Range;
use strum::{EnumIter, IntoEnumIterator};

/// Trigger characters that open an annotation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TaskSpecialCharacter {
    Date,
    FromDate,
    Priority,
    Label,
    Recurrence,
    Location,
    Contact,
}

impl TaskSpecialCharacter {
    pub fn as_char(self) -> char {
        match self {
            TaskSpecialCharacter::Date => '@',
            TaskSpecialCharacter::FromDate => '^',
            TaskSpecialCharacter::Priority => '!',
            TaskSpecialCharacter::Label => '#',
            TaskSpecialCharacter::Recurrence => '*',
            TaskSpecialCharacter::Location => '~',
            TaskSpecialCharacter::Contact => '+',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::iter().find(|kind| kind.as_char() == c)
    }
}

impl fmt::Display for TaskSpecialCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SyntaxType {
    Text,
    Annotation(TaskSpecialCharacter),
}

#[derive(Debug, PartialEq, Clone)]
pub struct SyntaxToken {
    pub kind: SyntaxType,
    pub start: usize,
    pub end: usize,
}

/// Field values decoded from a smart input string, plus where each came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    pub date: Option<NaiveDate>,
    pub from_date: Option<NaiveDate>,
    pub priority: Option<u8>,
    pub label: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub location: Option<TaskLocation>,
    pub contacts: Vec<Contact>,
    pub subranges: Subranges,
}

impl Annotations {
    /// Single-valued fields keep their first match; contacts always accept more.
    fn accepts(&self, kind: TaskSpecialCharacter) -> bool {
        kind == TaskSpecialCharacter::Contact || self.subranges.get(kind).is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub annotations: Annotations,
    pub ranges_descending: Vec<Range<usize>>,
}

impl Extraction {
    /// Splits `text` into annotation spans and the plain text between them.
    /// Annotation spans cover the trigger and value only; the separator a strip
    /// range absorbs is reported as text.
    pub fn tokens(&self, text: &str) -> Vec<SyntaxToken> {
        let mut spans: Vec<(TaskSpecialCharacter, Range<usize>)> = self
            .annotations
            .subranges
            .iter()
            .map(|(kind, range)| (kind, range.clone()))
            .collect();
        spans.sort_by_key(|(_, range)| range.start);

        let mut tokens = Vec::new();
        let mut cursor = 0;
        for (kind, range) in spans {
            let end = range.end.min(text.len());
            let end = text
                .get(range.start..end)
                .map_or(end, |span| range.start + span.trim_end().len());
            if range.start > cursor {
                tokens.push(SyntaxToken {
                    kind: SyntaxType::Text,
                    start: cursor,
                    end: range.start,
                });
            }
            tokens.push(SyntaxToken {
                kind: SyntaxType::Annotation(kind),
                start: range.start,
                end,
            });
            cursor = end;
        }
        if cursor < text.len() {
            tokens.push(SyntaxToken {
                kind: SyntaxType::Text,
                start: cursor,
                end: text.len(),
            });
        }
        tokens
    }
}

/// Known values the extractor may match after each trigger.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub labels: Vec<String>,
    pub priorities: Vec<(String, u8)>,
    pub locations: Vec<Location>,
    pub contacts: Vec<Contact>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            priorities: default_priority_words(),
            locations: Vec::new(),
            contacts: Vec::new(),
        }
    }
}

pub fn default_priority_words() -> Vec<(String, u8)> {
    vec![
        ("high".to_string(), 1),
        ("medium".to_string(), 2),
        ("low".to_string(), 3),
    ]
}

/// Free-function form of [`Vocabulary::extract`].
pub fn extract(text: &str, vocabulary: &Vocabulary, today: NaiveDate) -> Extraction {
    vocabulary.extract(text, today)
}

impl Vocabulary {
    /// Scans `text` left to right for trigger tokens. The text itself is not modified.
    ///
    /// A trigger only counts at the start of a word. Its value is the longest
    /// candidate matching case-insensitively and ending on a word boundary. A
    /// trigger with no matching candidate stays literal text. One whitespace
    /// character after a token belongs to its range, so stripping adjacent
    /// tokens does not leave double spaces behind.
    pub fn extract(&self, text: &str, today: NaiveDate) -> Extraction {
        let mut annotations = Annotations::default();
        let mut at_word_start = true;
        let mut pos = 0;

        while let Some(c) = text[pos..].chars().next() {
            if at_word_start
                && let Some(kind) = TaskSpecialCharacter::from_char(c)
                && annotations.accepts(kind)
            {
                let value_start = pos + c.len_utf8();
                if let Some(len) =
                    self.match_value(kind, &text[value_start..], today, &mut annotations)
                {
                    let value_end = value_start + len;
                    let end = absorb_separator(text, value_end);
                    log::debug!("{:?} token at {}..{}", kind, pos, end);
                    annotations.subranges.set(kind, pos..end);
                    at_word_start = end > value_end;
                    pos = end;
                    continue;
                }
            }
            at_word_start = c.is_whitespace();
            pos += c.len_utf8();
        }

        let ranges_descending = annotations.subranges.descending();
        Extraction {
            annotations,
            ranges_descending,
        }
    }

    /// Matches the value following a trigger and stores it. Returns the value length.
    fn match_value(
        &self,
        kind: TaskSpecialCharacter,
        rest: &str,
        today: NaiveDate,
        annotations: &mut Annotations,
    ) -> Option<usize> {
        match kind {
            TaskSpecialCharacter::Date => {
                let (len, date) = match_date(rest, today)?;
                annotations.date = Some(date);
                Some(len)
            }
            TaskSpecialCharacter::FromDate => {
                let (len, date) = match_date(rest, today)?;
                annotations.from_date = Some(date);
                Some(len)
            }
            TaskSpecialCharacter::Priority => {
                let (len, priority) = self.match_priority(rest)?;
                annotations.priority = Some(priority);
                Some(len)
            }
            TaskSpecialCharacter::Label => {
                let (len, label) =
                    longest_match(rest, self.labels.iter().map(|l| (l.as_str(), l)))?;
                annotations.label = Some(label.trim().to_string());
                Some(len)
            }
            TaskSpecialCharacter::Recurrence => {
                let candidates = Recurrence::iter()
                    .flat_map(|rec| rec.keywords().iter().map(move |word| (*word, rec)));
                let (len, recurrence) = longest_match(rest, candidates)?;
                annotations.recurrence = Some(recurrence);
                Some(len)
            }
            TaskSpecialCharacter::Location => {
                let candidates = self
                    .locations
                    .iter()
                    .filter_map(|loc| loc.title.as_deref().map(|title| (title, loc)));
                let (len, location) = longest_match(rest, candidates)?;
                annotations.location = Some(TaskLocation::Inline(location.clone()));
                Some(len)
            }
            TaskSpecialCharacter::Contact => {
                let candidates = self.contacts.iter().map(|c| (c.name.as_str(), c));
                let (len, contact) = longest_match(rest, candidates)?;
                annotations.contacts.push(contact.clone());
                Some(len)
            }
        }
    }

    fn match_priority(&self, rest: &str) -> Option<(usize, u8)> {
        let digits: Vec<(String, u8)> = (1..=MAX_PRIORITY).map(|p| (p.to_string(), p)).collect();
        let candidates = self
            .priorities
            .iter()
            .filter(|(_, p)| (1..=MAX_PRIORITY).contains(p))
            .chain(digits.iter())
            .map(|(word, p)| (word.as_str(), *p));
        longest_match(rest, candidates)
    }
}

// --- MATCHING HELPERS ---

/// Longest candidate that prefixes `rest` (ignoring case) and ends on a word boundary.
/// Ties go to the earlier candidate.
fn longest_match<'a, T>(
    rest: &str,
    candidates: impl IntoIterator<Item = (&'a str, T)>,
) -> Option<(usize, T)> {
    let mut best: Option<(usize, T)> = None;
    for (word, value) in candidates {
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        let Some(len) = match_prefix_ci(rest, word) else {
            continue;
        };
        if !ends_word(rest, len) {
            continue;
        }
        if best.as_ref().is_some_and(|(best_len, _)| *best_len >= len) {
            continue;
        }
        best = Some((len, value));
    }
    best
}

/// Byte length of the prefix of `haystack` equal to `needle` ignoring case.
fn match_prefix_ci(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    for n in needle.chars() {
        let (_, h) = hay.next()?;
        if h != n && !h.to_lowercase().eq(n.to_lowercase()) {
            return None;
        }
    }
    Some(hay.next().map_or(haystack.len(), |(idx, _)| idx))
}

fn ends_word(rest: &str, len: usize) -> bool {
    rest[len..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_alphanumeric())
}

fn absorb_separator(text: &str, end: usize) -> usize {
    match text[end..].chars().next() {
        Some(c) if c.is_whitespace() => end + c.len_utf8(),
        _ => end,
    }
}

// --- DATE PARSING HELPERS ---

const WEEKDAYS: [(&[&str], Weekday); 7] = [
    (&["monday", "mon"], Weekday::Mon),
    (&["tuesday", "tue"], Weekday::Tue),
    (&["wednesday", "wed"], Weekday::Wed),
    (&["thursday", "thu"], Weekday::Thu),
    (&["friday", "fri"], Weekday::Fri),
    (&["saturday", "sat"], Weekday::Sat),
    (&["sunday", "sun"], Weekday::Sun),
];

fn match_date(rest: &str, today: NaiveDate) -> Option<(usize, NaiveDate)> {
    let keywords = [
        ("today", Some(today)),
        ("tomorrow", today.succ_opt()),
        ("next week", today.checked_add_signed(Duration::days(7))),
        ("next month", today.checked_add_months(Months::new(1))),
    ];
    let weekdays = WEEKDAYS.iter().flat_map(|(names, weekday)| {
        names
            .iter()
            .map(move |name| (*name, next_weekday(today, *weekday)))
    });
    let candidates = keywords
        .into_iter()
        .chain(weekdays)
        .filter_map(|(word, date)| date.map(|d| (word, d)));

    longest_match(rest, candidates).or_else(|| parse_date_word(rest, today))
}

/// ISO dates (`2025-01-31`) and day/week offsets (`3d`, `2w`).
fn parse_date_word(rest: &str, today: NaiveDate) -> Option<(usize, NaiveDate)> {
    let word_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let word = rest[..word_len].trim_end_matches([',', '.', ';', ':', ')', '!', '?']);
    if word.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(word, "%Y-%m-%d") {
        return Some((word.len(), date));
    }

    let lower = word.to_lowercase();
    let days = if let Some(n) = lower.strip_suffix('d') {
        i64::from(n.parse::<u32>().ok()?)
    } else if let Some(n) = lower.strip_suffix('w') {
        i64::from(n.parse::<u32>().ok()?) * 7
    } else {
        return None;
    };
    let date = today.checked_add_signed(Duration::days(days))?;
    Some((word.len(), date))
}

/// First `target` weekday strictly after `from`.
fn next_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let mut d = from.succ_opt()?;
    while d.weekday() != target {
        d = d.succ_opt()?;
    }
    Some(d)
}
