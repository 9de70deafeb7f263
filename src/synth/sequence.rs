// Sequence synthesis
// Builds the summary corpus: one named track per retained (pattern, motif) pair

use serde::{Deserialize, Serialize};

use crate::corpus::{CorpusMetadata, EventKind, MetaEvent, RawEvent};
use crate::motifs::Motif;
use crate::scoring::PatternGroup;

/// Synthesis limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisOptions {
    /// Number of top-ranked patterns rendered
    pub max_patterns: usize,

    /// Motifs rendered per pattern
    pub max_motifs_per_pattern: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        SynthesisOptions {
            max_patterns: 10,
            max_motifs_per_pattern: 3,
        }
    }
}

/// One reconstructed output track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTrack {
    pub name: String,

    /// Events in playback order, ending with an end-of-track marker
    pub events: Vec<OutputEvent>,
}

/// Events the synthesizer emits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OutputEvent {
    /// Copied event from the corpus or a reconstructed note
    Raw(RawEvent),

    EndOfTrack,
}

/// In-memory summary corpus, ready to be encoded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedCorpus {
    pub ticks_per_beat: u16,
    pub tracks: Vec<OutputTrack>,
}

/// Render the top-ranked pattern groups
///
/// Rank is 1-based and follows the order of `ranked`. Fewer groups than
/// `max_patterns` simply give fewer tracks.
pub fn synthesize(
    ranked: &[PatternGroup],
    metadata: &CorpusMetadata,
    options: &SynthesisOptions,
) -> SynthesizedCorpus {
    let tracks = ranked
        .iter()
        .take(options.max_patterns)
        .enumerate()
        .flat_map(|(i, group)| pattern_tracks(group, i + 1, metadata, options.max_motifs_per_pattern))
        .collect();

    SynthesizedCorpus {
        ticks_per_beat: metadata.ticks_per_beat,
        tracks,
    }
}

/// Render a single pattern group on its own
pub fn synthesize_pattern(
    group: &PatternGroup,
    rank: usize,
    metadata: &CorpusMetadata,
    max_motifs: usize,
) -> SynthesizedCorpus {
    SynthesizedCorpus {
        ticks_per_beat: metadata.ticks_per_beat,
        tracks: pattern_tracks(group, rank, metadata, max_motifs),
    }
}

fn pattern_tracks(
    group: &PatternGroup,
    rank: usize,
    metadata: &CorpusMetadata,
    max_motifs: usize,
) -> Vec<OutputTrack> {
    group
        .motifs
        .iter()
        .take(max_motifs)
        .enumerate()
        .map(|(i, motif)| OutputTrack {
            name: track_name(rank, i + 1, group.prevalence_score),
            events: motif_events(motif, metadata),
        })
        .collect()
}

/// `Pattern <rank> Motif <index> (<percent>%)`
pub fn track_name(rank: usize, motif_index: usize, prevalence_score: f64) -> String {
    format!(
        "Pattern {} Motif {} ({}%)",
        rank,
        motif_index,
        format_percent(prevalence_score)
    )
}

/// Percentage rounded to two decimals; whole numbers keep one decimal ("50.0")
///
/// Exact ties on the binary value round to even, so 1/32 prints as "3.12".
fn format_percent(score: f64) -> String {
    let mut percent = format!("{:.2}", score * 100.0);
    while percent.ends_with('0') {
        percent.pop();
    }
    if percent.ends_with('.') {
        percent.push('0');
    }
    percent
}

/// Track body: corpus metadata, reconstructed notes, end marker
///
/// Note timing is approximate: each note-on uses the note's start time as
/// its delta and each note-off uses the paired duration.
fn motif_events(motif: &Motif, metadata: &CorpusMetadata) -> Vec<OutputEvent> {
    let mut events = Vec::with_capacity(
        3 + metadata.time_signatures.len() + metadata.key_signatures.len() + motif.len() * 2,
    );

    if let Some(tempo) = metadata.tempo {
        events.push(OutputEvent::Raw(RawEvent::meta(0, MetaEvent::Tempo(tempo))));
    }

    events.extend(metadata.time_signatures.iter().cloned().map(OutputEvent::Raw));
    events.extend(metadata.key_signatures.iter().cloned().map(OutputEvent::Raw));

    for note in motif.notes_by_start_time() {
        events.push(OutputEvent::Raw(RawEvent::new(
            note.start_time,
            EventKind::NoteOn {
                key: note.pitch,
                velocity: note.velocity,
            },
        )));
        events.push(OutputEvent::Raw(RawEvent::new(
            note.duration,
            EventKind::NoteOff {
                key: note.pitch,
                velocity: note.velocity,
            },
        )));
    }

    events.push(OutputEvent::EndOfTrack);
    events
}
