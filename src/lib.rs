// Leitmotif - Recurring melodic motif miner
// Module declarations

pub mod corpus;
pub mod motifs;
pub mod pipeline;
pub mod scoring;
pub mod synth;

pub use pipeline::{MinerConfig, MotifMiner, PipelineError, RunSummary};
