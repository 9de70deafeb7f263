// Corpus-wide metadata
// Single pre-pass aggregating tick resolution, tempo and signatures across all sources

use serde::{Deserialize, Serialize};

use super::types::{EventKind, MetaEvent, RawEvent, SourceFile};

/// Tick resolution used when no source provides one
pub const DEFAULT_TICKS_PER_BEAT: u16 = 500;

/// Largest metrical resolution a MIDI header can hold (15 bits)
const MAX_TICKS_PER_BEAT: u64 = 0x7FFF;

/// Aggregated metadata of every loaded source
///
/// Computed once before synthesis and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusMetadata {
    /// Average pulses per quarter note over metrical sources
    pub ticks_per_beat: u16,

    /// Average tempo in microseconds per quarter note
    /// None when no source defines a tempo
    pub tempo: Option<u32>,

    /// Every time signature event, verbatim, in corpus-scan order
    pub time_signatures: Vec<RawEvent>,

    /// Every key signature event, verbatim, in corpus-scan order
    pub key_signatures: Vec<RawEvent>,
}

impl Default for CorpusMetadata {
    fn default() -> Self {
        CorpusMetadata {
            ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
            tempo: None,
            time_signatures: Vec::new(),
            key_signatures: Vec::new(),
        }
    }
}

impl CorpusMetadata {
    /// Scan all sources once
    ///
    /// Sources are visited in load order and tracks in file order.
    pub fn collect(sources: &[SourceFile]) -> Self {
        let resolutions: Vec<u64> = sources
            .iter()
            .filter_map(|source| source.ticks_per_beat)
            .map(u64::from)
            .collect();

        let ticks_per_beat = match average(resolutions.iter().sum(), resolutions.len()) {
            Some(avg) if avg > 0 => avg.min(MAX_TICKS_PER_BEAT) as u16,
            _ => DEFAULT_TICKS_PER_BEAT,
        };

        let mut tempo_sum = 0u64;
        let mut tempo_count = 0usize;
        let mut time_signatures = Vec::new();
        let mut key_signatures = Vec::new();

        for source in sources {
            for track in &source.tracks {
                for event in &track.events {
                    match &event.kind {
                        EventKind::Meta(MetaEvent::Tempo(tempo)) => {
                            tempo_sum += u64::from(*tempo);
                            tempo_count += 1;
                        }
                        EventKind::Meta(MetaEvent::TimeSignature { .. }) => {
                            time_signatures.push(event.clone());
                        }
                        EventKind::Meta(MetaEvent::KeySignature { .. }) => {
                            key_signatures.push(event.clone());
                        }
                        _ => {}
                    }
                }
            }
        }

        // An average of zero is treated like no tempo at all
        let tempo = average(tempo_sum, tempo_count)
            .filter(|avg| *avg > 0)
            .map(|avg| avg as u32);

        CorpusMetadata {
            ticks_per_beat,
            tempo,
            time_signatures,
            key_signatures,
        }
    }
}

/// Integer-truncated average; None for an empty set
fn average(sum: u64, count: usize) -> Option<u64> {
    if count == 0 {
        None
    } else {
        Some(sum / count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::types::SourceTrack;
    use std::path::PathBuf;

    fn time_sig(delta: u32, numerator: u8) -> RawEvent {
        RawEvent::meta(
            delta,
            MetaEvent::TimeSignature {
                numerator,
                denominator_pow: 2,
                clocks_per_click: 24,
                notated_32nds_per_beat: 8,
            },
        )
    }

    fn source(ticks_per_beat: Option<u16>, tracks: Vec<Vec<RawEvent>>) -> SourceFile {
        SourceFile {
            path: PathBuf::from("test.mid"),
            ticks_per_beat,
            tracks: tracks
                .into_iter()
                .enumerate()
                .map(|(index, events)| SourceTrack::new(index, events))
                .collect(),
        }
    }

    #[test]
    fn test_empty_corpus_uses_default_resolution() {
        let metadata = CorpusMetadata::collect(&[]);

        assert_eq!(metadata.ticks_per_beat, 500);
        assert_eq!(metadata.tempo, None);
        assert!(metadata.time_signatures.is_empty());
        assert!(metadata.key_signatures.is_empty());
    }

    #[test]
    fn test_resolution_is_averaged_and_truncated() {
        let sources = vec![
            source(Some(480), vec![]),
            source(Some(96), vec![]),
            source(Some(97), vec![]),
            source(None, vec![]),
        ];

        let metadata = CorpusMetadata::collect(&sources);

        // (480 + 96 + 97) / 3 = 224.33
        assert_eq!(metadata.ticks_per_beat, 224);
    }

    #[test]
    fn test_tempo_averaged_across_all_events() {
        let sources = vec![
            source(
                Some(480),
                vec![
                    vec![RawEvent::meta(0, MetaEvent::Tempo(500_000))],
                    vec![RawEvent::meta(0, MetaEvent::Tempo(600_000))],
                ],
            ),
            source(Some(480), vec![vec![RawEvent::meta(0, MetaEvent::Tempo(400_001))]]),
        ];

        let metadata = CorpusMetadata::collect(&sources);

        assert_eq!(metadata.tempo, Some(500_000));
    }

    #[test]
    fn test_zero_tempo_is_omitted() {
        let sources = vec![source(Some(480), vec![vec![RawEvent::meta(0, MetaEvent::Tempo(0))]])];

        assert_eq!(CorpusMetadata::collect(&sources).tempo, None);
    }

    #[test]
    fn test_signatures_kept_verbatim_with_duplicates() {
        let key_sig = RawEvent::meta(7, MetaEvent::KeySignature { sharps: 1, minor: false });
        let sources = vec![
            source(Some(480), vec![vec![time_sig(0, 4), key_sig.clone()], vec![time_sig(3, 3)]]),
            source(Some(480), vec![vec![time_sig(0, 4), key_sig.clone()]]),
        ];

        let metadata = CorpusMetadata::collect(&sources);

        assert_eq!(
            metadata.time_signatures,
            vec![time_sig(0, 4), time_sig(3, 3), time_sig(0, 4)]
        );
        assert_eq!(metadata.key_signatures, vec![key_sig.clone(), key_sig]);
    }
}
