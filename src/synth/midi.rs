// MIDI encoding - Convert a synthesized corpus into Standard MIDI File bytes using midly
// Produces a format 1 file with one track per output track, all on channel 1

use midly::num::{u28, u4};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use thiserror::Error;

use crate::corpus::{EventKind, MetaEvent, RawEvent};
use super::sequence::{OutputEvent, OutputTrack, SynthesizedCorpus};

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Failed to write MIDI: {0}")]
    Encode(#[from] std::io::Error),

    #[error("Event cannot be written to MIDI: {0:?}")]
    UnsupportedEvent(EventKind),
}

/// Encode a synthesized corpus to MIDI file bytes
///
/// Every track starts with its name, followed by its events in order.
pub fn encode_smf(corpus: &SynthesizedCorpus) -> Result<Vec<u8>, SynthesisError> {
    let header = Header {
        format: Format::Parallel,
        timing: Timing::Metrical(corpus.ticks_per_beat.into()),
    };

    let tracks = corpus
        .tracks
        .iter()
        .map(build_track)
        .collect::<Result<Vec<_>, _>>()?;

    let smf = Smf { header, tracks };

    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)?;

    Ok(bytes)
}

fn build_track(output: &OutputTrack) -> Result<Track<'_>, SynthesisError> {
    let mut track = Track::with_capacity(output.events.len() + 1);

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(output.name.as_bytes())),
    });

    for event in &output.events {
        track.push(match event {
            OutputEvent::Raw(raw) => TrackEvent {
                delta: raw.delta.into(),
                kind: convert_kind(raw)?,
            },
            OutputEvent::EndOfTrack => TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
            },
        });
    }

    Ok(track)
}

fn convert_kind(raw: &RawEvent) -> Result<TrackEventKind<'_>, SynthesisError> {
    let kind = match &raw.kind {
        EventKind::NoteOn { key, velocity } => TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOn {
                key: (*key).into(),
                vel: (*velocity).into(),
            },
        },
        EventKind::NoteOff { key, velocity } => TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOff {
                key: (*key).into(),
                vel: (*velocity).into(),
            },
        },
        EventKind::Meta(MetaEvent::Tempo(tempo)) => {
            TrackEventKind::Meta(MetaMessage::Tempo((*tempo).into()))
        }
        EventKind::Meta(MetaEvent::TimeSignature {
            numerator,
            denominator_pow,
            clocks_per_click,
            notated_32nds_per_beat,
        }) => TrackEventKind::Meta(MetaMessage::TimeSignature(
            *numerator,
            *denominator_pow,
            *clocks_per_click,
            *notated_32nds_per_beat,
        )),
        EventKind::Meta(MetaEvent::KeySignature { sharps, minor }) => {
            TrackEventKind::Meta(MetaMessage::KeySignature(*sharps, *minor))
        }
        EventKind::Meta(MetaEvent::TrackName(name)) => {
            TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes()))
        }
        other => return Err(SynthesisError::UnsupportedEvent(other.clone())),
    };

    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{decode_source, CorpusMetadata};
    use midly::num::u15;
    use crate::motifs::{Motif, NoteInfo, PatternKey};
    use crate::scoring::PatternGroup;
    use crate::synth::sequence::{synthesize, SynthesisOptions};
    use std::path::Path;

    fn sample_group() -> PatternGroup {
        let notes = vec![
            NoteInfo {
                timing: 0,
                pitch: 60,
                pitch_interval: 2,
                velocity: 90,
                duration: 120,
                start_time: 0,
            },
            NoteInfo {
                timing: 60,
                pitch: 62,
                pitch_interval: 2,
                velocity: 80,
                duration: 120,
                start_time: 60,
            },
        ];

        PatternGroup {
            key: PatternKey(vec![2, 2]),
            motifs: vec![Motif::new(notes.clone()), Motif::new(notes)],
            prevalence_score: 0.75,
            duration_score: 0.5,
            total_duration: 480,
        }
    }

    fn sample_metadata() -> CorpusMetadata {
        CorpusMetadata {
            ticks_per_beat: 960,
            tempo: Some(500_000),
            time_signatures: vec![RawEvent::meta(
                0,
                MetaEvent::TimeSignature {
                    numerator: 6,
                    denominator_pow: 3,
                    clocks_per_click: 36,
                    notated_32nds_per_beat: 8,
                },
            )],
            key_signatures: vec![RawEvent::meta(0, MetaEvent::KeySignature { sharps: -3, minor: true })],
        }
    }

    #[test]
    fn test_encode_empty_corpus() {
        let corpus = SynthesizedCorpus {
            ticks_per_beat: 500,
            tracks: Vec::new(),
        };

        let bytes = encode_smf(&corpus).unwrap();
        assert!(bytes.len() > 0);

        let smf = Smf::parse(&bytes).unwrap();
        assert!(smf.tracks.is_empty());
    }

    #[test]
    fn test_encoded_file_parses_back() {
        let corpus = synthesize(&[sample_group()], &sample_metadata(), &SynthesisOptions::default());
        let bytes = encode_smf(&corpus).unwrap();

        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.format, Format::Parallel);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(960)));
        assert_eq!(smf.tracks.len(), 2);

        // name, tempo, time sig, key sig, 2 x (on, off), end of track
        let track = &smf.tracks[0];
        assert_eq!(track.len(), 9);
        if let TrackEventKind::Meta(MetaMessage::TrackName(name)) = &track[0].kind {
            assert_eq!(*name, b"Pattern 1 Motif 1 (75.0%)");
        } else {
            panic!("Expected TrackName event");
        }
        assert_eq!(track[8].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));
    }

    #[test]
    fn test_round_trip_through_loader() {
        let corpus = synthesize(&[sample_group()], &sample_metadata(), &SynthesisOptions::default());
        let bytes = encode_smf(&corpus).unwrap();

        let source = decode_source(Path::new("single.mid"), &bytes).unwrap();
        assert_eq!(source.ticks_per_beat, Some(960));

        let track = &source.tracks[1];
        assert_eq!(track.name.as_deref(), Some("Pattern 1 Motif 2 (75.0%)"));
        assert_eq!(track.events[1].kind, EventKind::Meta(MetaEvent::Tempo(500_000)));
        assert_eq!(
            track.events[3].kind,
            EventKind::Meta(MetaEvent::KeySignature { sharps: -3, minor: true })
        );
        assert_eq!(track.events[4], RawEvent::note_on(0, 60, 90));
        assert_eq!(track.events[5], RawEvent::note_off(120, 60, 90));
        assert_eq!(track.events[6], RawEvent::note_on(60, 62, 80));
        assert_eq!(track.events[7], RawEvent::note_off(120, 62, 80));
    }

    #[test]
    fn test_unsupported_event_rejected() {
        let corpus = SynthesizedCorpus {
            ticks_per_beat: 480,
            tracks: vec![OutputTrack {
                name: "bad".to_string(),
                events: vec![OutputEvent::Raw(RawEvent::new(0, EventKind::Other))],
            }],
        };

        let result = encode_smf(&corpus);
        assert!(matches!(result, Err(SynthesisError::UnsupportedEvent(EventKind::Other))));
    }
}
