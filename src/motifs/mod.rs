// Motif module
// Window extraction and canonical pattern keys

pub mod canonical;
pub mod types;
pub mod window;

pub use canonical::canonicalize;
pub use types::{Motif, NoteInfo, PatternKey};
pub use window::{pitch_class_interval, TrackExtraction, WindowExtractor, DEFAULT_WINDOW_LENGTH};
