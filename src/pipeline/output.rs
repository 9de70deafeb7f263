// Output storage
// Resets the output directory and writes artifacts with their SHA256 hash

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// A file written to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub sha256: String,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Empty the output directory, creating it when missing
///
/// Destructive: anything from a previous run is removed before new output exists.
pub fn reset_output_dir(dir: &Path) -> OutputResult<()> {
    if dir.exists() {
        for entry in fs::read_dir(dir).map_err(io_error(dir))? {
            let path = entry.map_err(io_error(dir))?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path).map_err(io_error(&path))?;
            } else {
                fs::remove_file(&path).map_err(io_error(&path))?;
            }
        }
    }

    fs::create_dir_all(dir).map_err(io_error(dir))?;
    Ok(())
}

/// Write an artifact into `dir` and return its path and SHA256 hash
pub fn store_artifact(dir: &Path, filename: &str, data: &[u8]) -> OutputResult<Artifact> {
    let file_path = dir.join(filename);
    let mut file = fs::File::create(&file_path).map_err(io_error(&file_path))?;
    file.write_all(data).map_err(io_error(&file_path))?;

    Ok(Artifact {
        sha256: calculate_sha256(data),
        path: file_path,
    })
}

/// Calculate SHA256 hash of data
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
