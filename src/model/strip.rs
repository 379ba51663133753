// File: src/model/strip.rs
//! Removes annotation ranges from a text.
//!
//! Ranges are removed highest end offset first, so a lower range still points at
//! the same characters when its turn comes. Overlapping ranges are rejected
//! instead of producing a corrupted string.
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripError {
    OutOfBounds { range: Range<usize>, len: usize },
    Inverted(Range<usize>),
    NotCharBoundary(Range<usize>),
    Overlap(Range<usize>, Range<usize>),
}

impl fmt::Display for StripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StripError::OutOfBounds { range, len } => {
                write!(f, "range {:?} exceeds text length {}", range, len)
            }
            StripError::Inverted(range) => write!(f, "range {:?} ends before it starts", range),
            StripError::NotCharBoundary(range) => {
                write!(f, "range {:?} does not fall on character boundaries", range)
            }
            StripError::Overlap(a, b) => write!(f, "ranges {:?} and {:?} overlap", a, b),
        }
    }
}

impl std::error::Error for StripError {}

/// Returns `text` with every range removed.
///
/// Abutting ranges (`0..3` and `3..5`) are fine, empty ranges are no-ops.
pub fn strip(text: &str, ranges: &[Range<usize>]) -> Result<String, StripError> {
    let mut sorted: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        validate(text, range)?;
        if !range.is_empty() {
            sorted.push(range.clone());
        }
    }
    sorted.sort_by(|a, b| b.end.cmp(&a.end).then(b.start.cmp(&a.start)));

    // Sorted by end descending, so only neighbours can overlap.
    for pair in sorted.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        if lower.end > upper.start {
            return Err(StripError::Overlap(lower.clone(), upper.clone()));
        }
    }

    let mut out = text.to_string();
    for range in sorted {
        out.replace_range(range, "");
    }
    Ok(out)
}

fn validate(text: &str, range: &Range<usize>) -> Result<(), StripError> {
    if range.start > range.end {
        return Err(StripError::Inverted(range.clone()));
    }
    if range.end > text.len() {
        return Err(StripError::OutOfBounds {
            range: range.clone(),
            len: text.len(),
        });
    }
    if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
        return Err(StripError::NotCharBoundary(range.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_in_any_input_order() {
        let text = "call mom +Ann @today";
        let a = strip(text, &[9..14, 14..20]).unwrap();
        let b = strip(text, &[14..20, 9..14]).unwrap();
        assert_eq!(a, "call mom ");
        assert_eq!(a, b);
    }

    #[test]
    fn abutting_ranges() {
        assert_eq!(strip("abcdef", &[1..3, 3..5]).unwrap(), "af");
    }

    #[test]
    fn empty_ranges_are_ignored() {
        assert_eq!(strip("abc", &[1..1, 3..3]).unwrap(), "abc");
        assert_eq!(strip("", &[]).unwrap(), "");
    }

    #[test]
    fn overlap_is_rejected() {
        let err = strip("abcdef", &[1..4, 3..5]).unwrap_err();
        assert_eq!(err, StripError::Overlap(1..4, 3..5));
        assert!(strip("abcdef", &[1..4, 1..4]).is_err());
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(matches!(
            strip("abc", &[2..9]),
            Err(StripError::OutOfBounds { len: 3, .. })
        ));
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = 2..1;
        assert_eq!(
            strip("abc", &[inverted.clone()]),
            Err(StripError::Inverted(inverted))
        );
        // 'é' is two bytes wide
        assert_eq!(
            strip("é!", &[1..3]),
            Err(StripError::NotCharBoundary(1..3))
        );
    }

    #[test]
    fn multibyte_text_keeps_outside_characters() {
        let text = "Café #büro tomorrow";
        let start = text.find('#').unwrap();
        let end = start + "#büro".len();
        assert_eq!(strip(text, &[start..end]).unwrap(), "Café  tomorrow");
    }
}
