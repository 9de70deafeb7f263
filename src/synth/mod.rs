// Synthesis module
// Reconstructs a summary MIDI corpus from the top-ranked patterns

pub mod midi;
pub mod sequence;

pub use midi::{encode_smf, SynthesisError};
pub use sequence::{
    synthesize, synthesize_pattern, track_name, OutputEvent, OutputTrack, SynthesisOptions,
    SynthesizedCorpus,
};
