// Miner configuration
// Window length, output location and synthesis limits for a run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::motifs::DEFAULT_WINDOW_LENGTH;
use crate::synth::SynthesisOptions;

/// Configuration for a mining run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Note events per sliding window (typically 20)
    pub window_length: usize,

    /// Directory emptied at the start of every run
    pub output_dir: PathBuf,

    /// File name of the combined summary inside `output_dir`
    pub output_file: String,

    pub synthesis: SynthesisOptions,

    /// Also write one `pattern_<rank>.mid` per top pattern
    pub per_pattern_files: bool,

    /// Optional JSONL trace of the run's stages
    pub trace_path: Option<PathBuf>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        MinerConfig {
            window_length: DEFAULT_WINDOW_LENGTH,
            output_dir: PathBuf::from("output"),
            output_file: "single.mid".to_string(),
            synthesis: SynthesisOptions::default(),
            per_pattern_files: false,
            trace_path: None,
        }
    }
}

impl MinerConfig {
    /// Check limits before anything is touched on disk
    pub fn validate(&self) -> Result<(), String> {
        if self.window_length == 0 {
            return Err("window length must be at least 1".to_string());
        }
        if self.synthesis.max_patterns == 0 {
            return Err("max patterns must be at least 1".to_string());
        }
        if self.synthesis.max_motifs_per_pattern == 0 {
            return Err("max motifs per pattern must be at least 1".to_string());
        }
        if self.output_file.trim().is_empty() {
            return Err("output file name is empty".to_string());
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}
