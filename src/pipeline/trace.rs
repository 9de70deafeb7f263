// Run tracing
// Optional JSONL log of a mining run: one line per stage and per extracted track

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stages of a mining run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Load,
    Reset,
    Extract,
    Score,
    Synthesize,
    Write,
}

/// One line of the trace file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// RFC 3339
    pub timestamp: String,
    pub run_id: Uuid,
    pub stage: PipelineStage,

    /// Progress of the whole run [0.0, 1.0]
    pub progress: f32,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Trace sink for a single run
///
/// Disabled when no path is configured. Write failures are logged as
/// warnings and never abort the run.
pub struct RunTrace {
    run_id: Uuid,
    path: Option<PathBuf>,
}

impl RunTrace {
    pub fn new(run_id: Uuid, path: Option<PathBuf>) -> Self {
        RunTrace { run_id, path }
    }

    pub fn record(&self, stage: PipelineStage, progress: f32, message: &str, data: Option<serde_json::Value>) {
        let Some(path) = &self.path else {
            return;
        };

        let entry = TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            run_id: self.run_id,
            stage,
            progress: progress.clamp(0.0, 1.0),
            message: message.to_string(),
            data,
        };

        if let Err(e) = append_line(path, &entry) {
            log::warn!("Failed to write trace to {}: {}", path.display(), e);
        }
    }
}

fn append_line(path: &Path, entry: &TraceEntry) -> std::io::Result<()> {
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()
}
