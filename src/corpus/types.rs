// Corpus event types
// Owned, codec-independent view of decoded MIDI sources

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Meta events the miner cares about
/// Everything else is kept as `Other` so track shapes stay intact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaEvent {
    /// Microseconds per quarter note
    Tempo(u32),

    /// Time signature exactly as stored in the file
    TimeSignature {
        numerator: u8,
        /// Denominator as a power of two (2 = quarter note)
        denominator_pow: u8,
        clocks_per_click: u8,
        notated_32nds_per_beat: u8,
    },

    /// Key signature: sharps (negative for flats) and mode
    KeySignature { sharps: i8, minor: bool },

    TrackName(String),

    Other,
}

/// Kind of a raw timed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Note-on, including velocity 0 (the raw message type is preserved)
    NoteOn { key: u8, velocity: u8 },

    NoteOff { key: u8, velocity: u8 },

    Meta(MetaEvent),

    /// Controller changes, sysex, escapes and anything else
    Other,
}

/// A single timed event of a source track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Ticks since the previous event in the same track
    pub delta: u32,

    pub kind: EventKind,
}

impl RawEvent {
    pub fn new(delta: u32, kind: EventKind) -> Self {
        RawEvent { delta, kind }
    }

    pub fn note_on(delta: u32, key: u8, velocity: u8) -> Self {
        RawEvent::new(delta, EventKind::NoteOn { key, velocity })
    }

    pub fn note_off(delta: u32, key: u8, velocity: u8) -> Self {
        RawEvent::new(delta, EventKind::NoteOff { key, velocity })
    }

    pub fn meta(delta: u32, meta: MetaEvent) -> Self {
        RawEvent::new(delta, EventKind::Meta(meta))
    }

    /// True for note-on and note-off events
    pub fn is_note(&self) -> bool {
        matches!(
            self.kind,
            EventKind::NoteOn { .. } | EventKind::NoteOff { .. }
        )
    }

    /// MIDI key number for note events
    pub fn key(&self) -> Option<u8> {
        match self.kind {
            EventKind::NoteOn { key, .. } | EventKind::NoteOff { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// One track of a decoded source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTrack {
    /// Position of the track within its file
    pub index: usize,

    /// First track name meta event, if any
    pub name: Option<String>,

    pub events: Vec<RawEvent>,
}

impl SourceTrack {
    pub fn new(index: usize, events: Vec<RawEvent>) -> Self {
        let name = events.iter().find_map(|event| match &event.kind {
            EventKind::Meta(MetaEvent::TrackName(name)) => Some(name.clone()),
            _ => None,
        });

        SourceTrack {
            index,
            name,
            events,
        }
    }

    /// Delta of the first event, used to order tracks within a file
    /// Empty tracks count as 0
    pub fn first_delta(&self) -> u32 {
        self.events.first().map(|event| event.delta).unwrap_or(0)
    }

    /// Name for log output
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("track {}", self.index),
        }
    }
}

/// A successfully decoded source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,

    /// Pulses per quarter note; None for SMPTE timecode files
    pub ticks_per_beat: Option<u16>,

    pub tracks: Vec<SourceTrack>,
}

impl SourceFile {
    /// Tracks ordered by the delta of their first event
    ///
    /// Returns a new ordering; the file's own track list is left untouched.
    pub fn tracks_by_first_delta(&self) -> Vec<&SourceTrack> {
        let mut ordered: Vec<&SourceTrack> = self.tracks.iter().collect();
        ordered.sort_by_key(|track| track.first_delta());
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_name_picked_from_meta() {
        let track = SourceTrack::new(
            2,
            vec![
                RawEvent::meta(0, MetaEvent::TrackName("Lead".to_string())),
                RawEvent::note_on(0, 60, 100),
            ],
        );

        assert_eq!(track.name.as_deref(), Some("Lead"));
        assert_eq!(track.display_name(), "Lead");

        let unnamed = SourceTrack::new(3, vec![]);
        assert_eq!(unnamed.display_name(), "track 3");
    }

    #[test]
    fn test_is_note() {
        assert!(RawEvent::note_on(0, 60, 0).is_note());
        assert!(RawEvent::note_off(0, 60, 0).is_note());
        assert!(!RawEvent::meta(0, MetaEvent::Tempo(500_000)).is_note());
        assert!(!RawEvent::new(0, EventKind::Other).is_note());
    }

    #[test]
    fn test_tracks_by_first_delta_is_stable() {
        let file = SourceFile {
            path: PathBuf::from("a.mid"),
            ticks_per_beat: Some(480),
            tracks: vec![
                SourceTrack::new(0, vec![RawEvent::note_on(30, 60, 90)]),
                SourceTrack::new(1, vec![]),
                SourceTrack::new(2, vec![RawEvent::note_on(10, 62, 90)]),
                SourceTrack::new(3, vec![RawEvent::note_on(0, 64, 90)]),
            ],
        };

        let order: Vec<usize> = file
            .tracks_by_first_delta()
            .iter()
            .map(|track| track.index)
            .collect();

        assert_eq!(order, vec![1, 3, 2, 0]);
        // Original order untouched
        assert_eq!(file.tracks[0].index, 0);
    }
}
