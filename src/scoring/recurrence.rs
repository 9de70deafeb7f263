// Recurrence scoring
// Groups motifs by pattern key across the corpus and ranks the groups

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::motifs::{canonicalize, Motif, PatternKey};

/// All motifs sharing one pattern key, with their scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternGroup {
    pub key: PatternKey,

    /// Motifs in the order they were added
    pub motifs: Vec<Motif>,

    /// Share of all motifs carrying this key [0.0, 1.0]
    pub prevalence_score: f64,

    /// Share of the total aggregated duration carried by this key
    pub duration_score: f64,

    /// Summed duration of every note of every motif in the group
    pub total_duration: u64,
}

impl PatternGroup {
    pub fn motif_count(&self) -> usize {
        self.motifs.len()
    }

    /// Ranking order: prevalence, then duration, both descending; then key ascending
    ///
    /// Prevalence and duration scores share their denominators across groups,
    /// so the integer counts give the same order without float comparison.
    fn rank_cmp(&self, other: &PatternGroup) -> Ordering {
        other
            .motif_count()
            .cmp(&self.motif_count())
            .then_with(|| other.total_duration.cmp(&self.total_duration))
            .then_with(|| self.key.cmp(&other.key))
    }
}

#[derive(Default)]
struct GroupAccumulator {
    motifs: Vec<Motif>,
    duration: u64,
}

/// Corpus-wide multiset of (pattern key, motif) pairs
#[derive(Debug, Clone, Default)]
pub struct RecurrenceScorer {
    entries: Vec<(PatternKey, Motif)>,
    total_duration: u64,
}

impl RecurrenceScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalize and store motifs
    pub fn add_motifs<I>(&mut self, motifs: I)
    where
        I: IntoIterator<Item = Motif>,
    {
        for motif in motifs {
            self.total_duration += motif.total_duration();
            self.entries.push((canonicalize(&motif), motif));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Motif count and summed note duration over everything added
    pub fn totals(&self) -> (usize, u64) {
        (self.entries.len(), self.total_duration)
    }

    /// Group by pattern key and rank the groups
    ///
    /// Algorithm:
    /// 1. One pass into an ordered map from key to accumulated motifs and duration
    /// 2. prevalence = group motifs / total_motifs
    /// 3. duration score = group duration / total_duration (0.0 when total is 0)
    /// 4. Sort by prevalence desc, duration desc, key asc
    ///
    /// Consumes the scorer so each motif moves into its group.
    pub fn score(self, total_motifs: usize, total_duration: u64) -> Vec<PatternGroup> {
        let mut groups: BTreeMap<PatternKey, GroupAccumulator> = BTreeMap::new();

        for (key, motif) in self.entries {
            let acc = groups.entry(key).or_default();
            acc.duration += motif.total_duration();
            acc.motifs.push(motif);
        }

        let mut ranked: Vec<PatternGroup> = groups
            .into_iter()
            .map(|(key, acc)| PatternGroup {
                key,
                prevalence_score: ratio(acc.motifs.len() as u64, total_motifs as u64),
                duration_score: ratio(acc.duration, total_duration),
                total_duration: acc.duration,
                motifs: acc.motifs,
            })
            .collect();

        ranked.sort_by(PatternGroup::rank_cmp);
        ranked
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
