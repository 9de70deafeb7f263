// Pattern canonicalization
// Reduces a motif to its ordered pitch-class intervals

use super::types::{Motif, PatternKey};

/// Canonical key of a motif: its intervals in original order
///
/// Two motifs moving by the same pitch-class steps share a key whatever
/// their absolute pitch. Nothing beyond that is normalized.
pub fn canonicalize(motif: &Motif) -> PatternKey {
    PatternKey(motif.notes.iter().map(|note| note.pitch_interval).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::RawEvent;
    use crate::motifs::window::WindowExtractor;

    fn motif_from_pitches(pitches: &[u8]) -> Motif {
        let events: Vec<RawEvent> = pitches
            .iter()
            .map(|&pitch| RawEvent::note_on(0, pitch, 100))
            .collect();

        WindowExtractor::new(pitches.len())
            .extract(&events)
            .motifs
            .remove(0)
    }

    #[test]
    fn test_transposed_motifs_share_key() {
        let low = canonicalize(&motif_from_pitches(&[60, 62, 64]));
        let high = canonicalize(&motif_from_pitches(&[67, 69, 71]));

        assert_eq!(low, PatternKey(vec![2, 2]));
        assert_eq!(low, high);
    }

    #[test]
    fn test_key_length_matches_motif() {
        for pitches in [&[60u8][..], &[60, 61][..], &[60, 67, 55, 72, 71][..]] {
            let motif = motif_from_pitches(pitches);
            assert_eq!(canonicalize(&motif).len(), motif.len());
        }
    }

    #[test]
    fn test_order_matters() {
        let up = canonicalize(&motif_from_pitches(&[60, 64, 67]));
        let down = canonicalize(&motif_from_pitches(&[60, 63, 67]));

        assert_eq!(up, PatternKey(vec![4, 3]));
        assert_eq!(down, PatternKey(vec![3, 4]));
        assert_ne!(up, down);
    }

    #[test]
    fn test_octave_displacement_is_ignored() {
        let close = canonicalize(&motif_from_pitches(&[60, 62]));
        let wide = canonicalize(&motif_from_pitches(&[60, 74]));

        assert_eq!(close, wide);
    }
}
