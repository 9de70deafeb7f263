// Corpus loading
// Reads MIDI files with midly and converts them into owned source tracks

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::{EventKind, MetaEvent, RawEvent, SourceFile, SourceTrack};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode MIDI: {0}")]
    Decode(#[from] midly::Error),
}

/// A source that could not be loaded
#[derive(Debug)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Result of loading a batch of paths
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    /// Decoded sources, in the order they were given
    pub sources: Vec<SourceFile>,

    /// Sources skipped because they could not be read or decoded
    pub skipped: Vec<SkippedSource>,
}

/// Load every path, skipping the ones that fail
pub fn load_sources<P: AsRef<Path>>(paths: &[P]) -> LoadedCorpus {
    let mut corpus = LoadedCorpus::default();

    for path in paths {
        let path = path.as_ref();
        log::info!("Loading MIDI file: {}", path.display());

        match load_source(path) {
            Ok(source) => corpus.sources.push(source),
            Err(error) => {
                log::warn!("Skipping {}: {}", path.display(), error);
                corpus.skipped.push(SkippedSource {
                    path: path.to_path_buf(),
                    error,
                });
            }
        }
    }

    corpus
}

/// Load a single MIDI file from disk
pub fn load_source(path: &Path) -> Result<SourceFile, LoadError> {
    let bytes = std::fs::read(path)?;
    decode_source(path, &bytes)
}

/// Decode MIDI bytes into an owned source file
pub fn decode_source(path: &Path, bytes: &[u8]) -> Result<SourceFile, LoadError> {
    let smf = Smf::parse(bytes)?;

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(ppq) => Some(ppq.as_int()),
        Timing::Timecode(fps, subframe) => {
            log::warn!(
                "{} uses SMPTE timing ({} fps, {} subframes); excluded from tick resolution",
                path.display(),
                fps.as_int(),
                subframe
            );
            None
        }
    };

    let tracks = smf
        .tracks
        .iter()
        .enumerate()
        .map(|(index, track)| SourceTrack::new(index, track.iter().map(convert_event).collect()))
        .collect();

    Ok(SourceFile {
        path: path.to_path_buf(),
        ticks_per_beat,
        tracks,
    })
}

/// Convert a midly event into an owned raw event
fn convert_event(event: &TrackEvent) -> RawEvent {
    let kind = match event.kind {
        TrackEventKind::Midi { message, .. } => match message {
            MidiMessage::NoteOn { key, vel } => EventKind::NoteOn {
                key: key.as_int(),
                velocity: vel.as_int(),
            },
            MidiMessage::NoteOff { key, vel } => EventKind::NoteOff {
                key: key.as_int(),
                velocity: vel.as_int(),
            },
            _ => EventKind::Other,
        },
        TrackEventKind::Meta(meta) => EventKind::Meta(convert_meta(&meta)),
        TrackEventKind::SysEx(_) | TrackEventKind::Escape(_) => EventKind::Other,
    };

    RawEvent::new(event.delta.as_int(), kind)
}

fn convert_meta(meta: &MetaMessage) -> MetaEvent {
    match *meta {
        MetaMessage::Tempo(tempo) => MetaEvent::Tempo(tempo.as_int()),
        MetaMessage::TimeSignature(numerator, denominator_pow, clocks_per_click, notated) => {
            MetaEvent::TimeSignature {
                numerator,
                denominator_pow,
                clocks_per_click,
                notated_32nds_per_beat: notated,
            }
        }
        MetaMessage::KeySignature(sharps, minor) => MetaEvent::KeySignature { sharps, minor },
        MetaMessage::TrackName(name) => MetaEvent::TrackName(String::from_utf8_lossy(name).into_owned()),
        _ => MetaEvent::Other,
    }
}
