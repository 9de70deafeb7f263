// Motif types
// Paired notes, motifs and their canonical pattern keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// A note-on paired with the next note event inside its window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInfo {
    /// Delta of the note-on event
    pub timing: u32,

    /// MIDI key number (0-127)
    pub pitch: u8,

    /// Pitch-class distance to the paired event (0-11)
    pub pitch_interval: u8,

    pub velocity: u8,

    /// Delta of the paired event
    /// An approximation of elapsed time, not the note's absolute length
    pub duration: u32,

    /// Same as `timing`; used to order notes on reconstruction
    pub start_time: u32,
}

/// Ordered notes extracted from a single window position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motif {
    pub notes: Vec<NoteInfo>,
}

impl Motif {
    pub fn new(notes: Vec<NoteInfo>) -> Self {
        Motif { notes }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Sum of every note's duration
    pub fn total_duration(&self) -> u64 {
        self.notes.iter().map(|note| u64::from(note.duration)).sum()
    }

    /// Notes ordered by start time, as a new vector
    /// Equal start times keep their extraction order
    pub fn notes_by_start_time(&self) -> Vec<&NoteInfo> {
        let mut ordered: Vec<&NoteInfo> = self.notes.iter().collect();
        ordered.sort_by_key(|note| note.start_time);
        ordered
    }
}

/// Ordered pitch-class intervals of a motif
///
/// Equality is exact and order-significant. The derived ordering is
/// lexicographic and only used to break ranking ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternKey(pub Vec<u8>);

impl PatternKey {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, interval) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", interval)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(pitch: u8, start_time: u32, duration: u32) -> NoteInfo {
        NoteInfo {
            timing: start_time,
            pitch,
            pitch_interval: 0,
            velocity: 100,
            duration,
            start_time,
        }
    }

    #[test]
    fn test_total_duration() {
        let motif = Motif::new(vec![note(60, 0, 120), note(62, 0, 240), note(64, 10, 0)]);
        assert_eq!(motif.total_duration(), 360);
        assert_eq!(Motif::default().total_duration(), 0);
    }

    #[test]
    fn test_notes_by_start_time_leaves_motif_untouched() {
        let motif = Motif::new(vec![note(60, 30, 1), note(62, 0, 2), note(64, 30, 3), note(65, 5, 4)]);

        let pitches: Vec<u8> = motif.notes_by_start_time().iter().map(|n| n.pitch).collect();

        assert_eq!(pitches, vec![62, 65, 60, 64]);
        assert_eq!(motif.notes[0].pitch, 60);
    }

    #[test]
    fn test_pattern_key_display() {
        assert_eq!(PatternKey(vec![2, 2]).to_string(), "(2, 2)");
        assert_eq!(PatternKey(vec![7]).to_string(), "(7)");
        assert_eq!(PatternKey::default().to_string(), "()");
    }
}
