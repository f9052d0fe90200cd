//! Partial enrichment progress, persisted next to the output file.
//!
//! The checkpoint is a single overwrite-on-save snapshot with one writer. Its
//! presence is the only sign that an earlier run stopped mid-enrichment.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::JobCard;

/// Successfully enriched pages between saves.
pub const CHECKPOINT_EVERY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub last_index: usize,
    pub jobs: Vec<JobCard>,
}

/// `<dir>/<output-stem>.checkpoint.json`.
pub fn checkpoint_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!("{}.checkpoint.json", stem))
}

/// Replaces the checkpoint with the full job list and the index of the last
/// processed job.
pub fn save(path: &Path, jobs: &[JobCard], last_index: usize) -> Result<()> {
    let checkpoint = Checkpoint {
        last_index,
        jobs: jobs.to_vec(),
    };
    let json = serde_json::to_string(&checkpoint)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, json)?;
    Ok(())
}

/// Loads a checkpoint. Missing, unreadable and corrupt files all mean "start
/// from scratch".
pub fn load(path: &Path) -> Option<Checkpoint> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No checkpoint at {}; starting fresh", path.display());
            return None;
        }
        Err(e) => {
            warn!("Failed to read checkpoint {}: {}; starting fresh", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<Checkpoint>(&content) {
        Ok(checkpoint) if checkpoint.last_index >= checkpoint.jobs.len() => {
            warn!(
                "Checkpoint {} points past its own jobs (last index {}, {} jobs); starting fresh",
                path.display(),
                checkpoint.last_index,
                checkpoint.jobs.len()
            );
            None
        }
        Ok(checkpoint) => {
            info!(
                "Loaded checkpoint {}: {} jobs, last index {}",
                path.display(),
                checkpoint.jobs.len(),
                checkpoint.last_index
            );
            Some(checkpoint)
        }
        Err(e) => {
            warn!("Checkpoint {} is corrupt ({}); starting fresh", path.display(), e);
            None
        }
    }
}

pub fn remove(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Copies enrichment from checkpointed jobs onto the same positions of a fresh
/// extraction and returns the index to resume from.
///
/// Jobs are matched by position only. If the board reorders its listing
/// between runs, enrichment lands on the wrong cards.
pub fn merge_into(jobs: &mut [JobCard], checkpoint: &Checkpoint) -> usize {
    if checkpoint.jobs.len() != jobs.len() {
        warn!(
            "Checkpoint has {} jobs but the board now yields {}; merging by position anyway",
            checkpoint.jobs.len(),
            jobs.len()
        );
    }
    for (job, saved) in jobs.iter_mut().zip(&checkpoint.jobs) {
        if saved.is_enriched() {
            job.absorb_enrichment(saved);
        }
    }
    checkpoint.last_index.saturating_add(1)
}
