// File: ./src/model/mod.rs
pub mod adapter;
pub mod display;
pub mod item;
pub mod location;
pub mod matcher;
pub mod parser;
pub mod strip;
pub mod subrange;

pub use adapter::{ConversionError, RawTaskRecord};
pub use display::TaskDisplay;
pub use item::{Contact, Recurrence, Task};
pub use location::{Location, TaskLocation};
pub use matcher::SearchState;
pub use parser::{Annotations, Extraction, TaskSpecialCharacter, Vocabulary};
pub use strip::{StripError, strip};
pub use subrange::Subranges;
