// Scoring module
// Corpus-wide recurrence scoring and ranking of pattern groups

pub mod recurrence;

pub use recurrence::{PatternGroup, RecurrenceScorer};
