// Pipeline execution and monitoring module
// Orchestrates the full corpus-to-summary mining run

pub mod config;
pub mod miner;
pub mod output;
pub mod trace;

pub use config::MinerConfig;
pub use miner::{MotifMiner, PatternSummary, PipelineError, RunSummary};
pub use output::{calculate_sha256, reset_output_dir, store_artifact, Artifact, OutputError};
pub use trace::{PipelineStage, RunTrace, TraceEntry};
