// Sliding-window motif extraction
// Pairs each note-on with its next in-window note event and emits one motif per window position

use crate::corpus::{EventKind, RawEvent};
use super::types::{Motif, NoteInfo};

/// Number of note events per window when not configured otherwise
pub const DEFAULT_WINDOW_LENGTH: usize = 20;

/// Motifs and pairing diagnostics for one track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackExtraction {
    /// One motif per window position, possibly empty
    pub motifs: Vec<Motif>,

    /// Note-ons that found a successor inside their window
    pub matched: usize,

    /// Note-ons left without a successor before their window ended
    /// Diagnostic only, has no effect on scoring
    pub unmatched: usize,

    /// Note-on/note-off events in the track
    pub note_events: usize,
}

impl TrackExtraction {
    pub fn total_duration(&self) -> u64 {
        self.motifs.iter().map(Motif::total_duration).sum()
    }
}

/// Fixed-length sliding window over a track's note events
#[derive(Debug, Clone, Copy)]
pub struct WindowExtractor {
    window_length: usize,
}

impl Default for WindowExtractor {
    fn default() -> Self {
        WindowExtractor::new(DEFAULT_WINDOW_LENGTH)
    }
}

impl WindowExtractor {
    /// Create an extractor; `window_length` must be at least 1
    pub fn new(window_length: usize) -> Self {
        WindowExtractor { window_length }
    }

    /// Extract motifs from one track
    ///
    /// Algorithm:
    /// 1. Keep note-on/note-off events only
    /// 2. Fewer events than the window length gives zero motifs
    /// 3. For every start index 0..=(n - L), analyze the L events starting there
    ///
    /// Windows overlap, so an event contributes to up to L motifs.
    pub fn extract(&self, events: &[RawEvent]) -> TrackExtraction {
        let notes: Vec<&RawEvent> = events.iter().filter(|event| event.is_note()).collect();

        let mut extraction = TrackExtraction {
            note_events: notes.len(),
            ..Default::default()
        };

        if self.window_length == 0 || notes.len() < self.window_length {
            return extraction;
        }

        for window in notes.windows(self.window_length) {
            let (motif, matched, unmatched) = analyze_window(window);
            extraction.motifs.push(motif);
            extraction.matched += matched;
            extraction.unmatched += unmatched;
        }

        extraction
    }
}

/// Pair every note-on in the window with the next note event after it
///
/// Returns the motif plus matched and unmatched note-on counts.
fn analyze_window(window: &[&RawEvent]) -> (Motif, usize, usize) {
    let mut notes = Vec::new();
    let mut matched = 0;
    let mut unmatched = 0;

    for (position, event) in window.iter().enumerate() {
        let (pitch, velocity) = match event.kind {
            EventKind::NoteOn { key, velocity } => (key, velocity),
            _ => continue,
        };

        // Every event in the window is a note event, so the successor is simply the next one
        let successor = window[position + 1..]
            .iter()
            .find_map(|next| next.key().map(|key| (key, next.delta)));

        match successor {
            Some((next_pitch, next_delta)) => {
                matched += 1;
                notes.push(NoteInfo {
                    timing: event.delta,
                    pitch,
                    pitch_interval: pitch_class_interval(pitch, next_pitch),
                    velocity,
                    duration: next_delta,
                    start_time: event.delta,
                });
            }
            None => unmatched += 1,
        }
    }

    (Motif::new(notes), matched, unmatched)
}

/// Upward distance from `from` to `to`, modulo one octave
pub fn pitch_class_interval(from: u8, to: u8) -> u8 {
    ((i16::from(to) - i16::from(from)).rem_euclid(12)) as u8
}
