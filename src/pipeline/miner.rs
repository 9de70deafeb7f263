// Motif mining pipeline
// Drives loading, extraction, scoring and synthesis end to end for one run

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::corpus::{load_sources, CorpusMetadata};
use crate::motifs::{PatternKey, WindowExtractor};
use crate::scoring::{PatternGroup, RecurrenceScorer};
use crate::synth::{encode_smf, synthesize, synthesize_pattern, SynthesisError};
use super::config::MinerConfig;
use super::output::{reset_output_dir, store_artifact, Artifact, OutputError};
use super::trace::{PipelineStage, RunTrace};

/// Failures that abort a run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),
}

/// One ranked pattern as reported after a run
#[derive(Debug, Clone, Serialize)]
pub struct PatternSummary {
    /// 1-based rank, matching the output track names
    pub rank: usize,
    pub key: PatternKey,
    pub motif_count: usize,
    pub prevalence_score: f64,
    pub duration_score: f64,
}

impl PatternSummary {
    fn from_group(rank: usize, group: &PatternGroup) -> Self {
        PatternSummary {
            rank,
            key: group.key.clone(),
            motif_count: group.motif_count(),
            prevalence_score: group.prevalence_score,
            duration_score: group.duration_score,
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,

    /// The combined summary file
    pub output: Artifact,

    /// Per-pattern files, when enabled
    pub pattern_files: Vec<Artifact>,

    pub sources_loaded: usize,
    pub sources_skipped: Vec<PathBuf>,

    /// Tracks that produced at least one motif
    pub tracks_with_motifs: usize,

    pub total_motifs: usize,

    /// Summed note duration over every motif, shared events counted once per window
    pub total_duration: u64,

    /// Note-ons paired inside their window, over all tracks
    pub matched_notes: usize,

    /// Note-ons left unpaired, over all tracks
    pub unmatched_notes: usize,

    pub distinct_patterns: usize,
    pub top_patterns: Vec<PatternSummary>,

    pub ticks_per_beat: u16,
    pub tempo: Option<u32>,
}

/// Running totals gathered during extraction
#[derive(Debug, Default)]
struct ExtractionTotals {
    tracks_with_motifs: usize,
    matched: usize,
    unmatched: usize,
}

/// Batch motif miner
pub struct MotifMiner {
    config: MinerConfig,
}

impl MotifMiner {
    pub fn new(config: MinerConfig) -> Self {
        MotifMiner { config }
    }

    /// Run the whole pipeline over `inputs`
    ///
    /// Unreadable inputs are skipped. Sources are read into memory before the
    /// output directory is emptied, so an input inside it is still mined. Any
    /// later failure aborts the run and leaves the directory empty.
    pub fn run<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        let result = self.execute(run_id, inputs);

        if let Err(e) = &result {
            log::error!("Run {} failed: {}", run_id, e);
        }

        result
    }

    fn execute<P: AsRef<Path>>(&self, run_id: Uuid, inputs: &[P]) -> Result<RunSummary, PipelineError> {
        let config = &self.config;
        config.validate().map_err(PipelineError::InvalidConfig)?;

        let trace = RunTrace::new(run_id, config.trace_path.clone());

        // Step 1: Load sources, skipping unreadable ones
        let corpus = load_sources(inputs);
        let sources_skipped: Vec<PathBuf> = corpus.skipped.iter().map(|s| s.path.clone()).collect();
        trace.record(
            PipelineStage::Load,
            0.1,
            "Sources loaded",
            Some(serde_json::json!({
                "loaded": corpus.sources.len(),
                "skipped": sources_skipped,
            })),
        );

        // Step 2: Reset output location
        reset_output_dir(&config.output_dir)?;
        trace.record(PipelineStage::Reset, 0.2, "Output directory reset", None);

        // Step 3: Corpus metadata, once
        let metadata = CorpusMetadata::collect(&corpus.sources);

        // Step 4-5: Extract motifs track by track
        let extractor = WindowExtractor::new(config.window_length);
        let mut scorer = RecurrenceScorer::new();
        let mut totals = ExtractionTotals::default();
        let source_count = corpus.sources.len();

        for (index, source) in corpus.sources.iter().enumerate() {
            log::info!("MIDI file: {} ({}/{})", source.path.display(), index + 1, source_count);

            for track in source.tracks_by_first_delta() {
                let extraction = extractor.extract(&track.events);

                log::debug!(
                    "Track {}: {} note events, {} motifs, {} matched, {} unmatched",
                    track.display_name(),
                    extraction.note_events,
                    extraction.motifs.len(),
                    extraction.matched,
                    extraction.unmatched
                );

                totals.matched += extraction.matched;
                totals.unmatched += extraction.unmatched;

                if extraction.motifs.is_empty() {
                    continue;
                }

                trace.record(
                    PipelineStage::Extract,
                    0.2 + 0.3 * (index + 1) as f32 / source_count as f32,
                    "Track extracted",
                    Some(serde_json::json!({
                        "source": source.path,
                        "track": track.index,
                        "name": track.display_name(),
                        "motifs": extraction.motifs.len(),
                        "duration": extraction.total_duration(),
                        "matched": extraction.matched,
                        "unmatched": extraction.unmatched,
                    })),
                );

                totals.tracks_with_motifs += 1;
                scorer.add_motifs(extraction.motifs);
            }
        }

        let (total_motifs, total_duration) = scorer.totals();
        log::info!(
            "Extracted {} motifs from {} tracks",
            total_motifs,
            totals.tracks_with_motifs
        );

        // Step 6: Rank pattern groups and keep the top ones
        let ranked = scorer.score(total_motifs, total_duration);
        let top_count = ranked.len().min(config.synthesis.max_patterns);
        let top = &ranked[..top_count];

        log::info!("Recurring patterns: {}", ranked.len());
        for (i, group) in top.iter().enumerate() {
            log::info!(
                "#{} pattern {}: {} motifs, prevalence {:.4}, duration {:.4}",
                i + 1,
                group.key,
                group.motif_count(),
                group.prevalence_score,
                group.duration_score
            );
        }
        trace.record(
            PipelineStage::Score,
            0.7,
            "Patterns ranked",
            Some(serde_json::json!({ "distinct_patterns": ranked.len() })),
        );

        // Step 7: Synthesize the summary corpus
        let summary_corpus = synthesize(top, &metadata, &config.synthesis);
        let bytes = encode_smf(&summary_corpus)?;
        trace.record(
            PipelineStage::Synthesize,
            0.9,
            "Summary synthesized",
            Some(serde_json::json!({ "tracks": summary_corpus.tracks.len() })),
        );

        let output = store_artifact(&config.output_dir, &config.output_file, &bytes)?;
        log::info!("Saved summary MIDI file: {}", output.path.display());

        let mut pattern_files = Vec::new();
        if config.per_pattern_files {
            for (i, group) in top.iter().enumerate() {
                let rank = i + 1;
                let corpus = synthesize_pattern(
                    group,
                    rank,
                    &metadata,
                    config.synthesis.max_motifs_per_pattern,
                );
                let bytes = encode_smf(&corpus)?;
                let artifact = store_artifact(&config.output_dir, &format!("pattern_{}.mid", rank), &bytes)?;
                log::info!("Saved pattern MIDI file: {}", artifact.path.display());
                pattern_files.push(artifact);
            }
        }

        trace.record(
            PipelineStage::Write,
            1.0,
            "Run complete",
            Some(serde_json::json!({ "output": output.path, "sha256": output.sha256 })),
        );

        Ok(RunSummary {
            run_id,
            output,
            pattern_files,
            sources_loaded: source_count,
            sources_skipped,
            tracks_with_motifs: totals.tracks_with_motifs,
            total_motifs,
            total_duration,
            matched_notes: totals.matched,
            unmatched_notes: totals.unmatched,
            distinct_patterns: ranked.len(),
            top_patterns: top
                .iter()
                .enumerate()
                .map(|(i, group)| PatternSummary::from_group(i + 1, group))
                .collect(),
            ticks_per_beat: metadata.ticks_per_beat,
            tempo: metadata.tempo,
        })
    }
}
