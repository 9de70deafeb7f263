// Corpus module
// Loading MIDI sources and aggregating their metadata

pub mod loader;
pub mod metadata;
pub mod types;

pub use loader::{decode_source, load_source, load_sources, LoadError, LoadedCorpus, SkippedSource};
pub use metadata::{CorpusMetadata, DEFAULT_TICKS_PER_BEAT};
pub use types::{EventKind, MetaEvent, RawEvent, SourceFile, SourceTrack};
