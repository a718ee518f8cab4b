use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SaverError;

/// Fixed file name of the durable saver record inside the checkpoint
/// directory.
pub const STATE_FILE_NAME: &str = "checkpoint_saver.json";

/// One retained snapshot in the ranked history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCheckpoint {
    pub path: PathBuf,
    pub metric: Option<f64>,
}

/// Durable saver bookkeeping, written after every mutating operation and
/// restored at construction when resuming.
///
/// `ranked` is ordered most-preferred first and never longer than the
/// configured history bound. `best_epoch`/`best_metric` describe the best
/// checkpoint ever observed, which may no longer be retained. The recovery
/// paths may be empty before the first recovery save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaverState {
    pub best_epoch: Option<usize>,
    pub best_metric: Option<f64>,
    pub ranked: Vec<RankedCheckpoint>,
    pub current_recovery: PathBuf,
    pub previous_recovery: PathBuf,
}

impl SaverState {
    /// Fully overwrite the state record in `checkpoint_dir`.
    pub fn persist(&self, checkpoint_dir: &Path) -> Result<(), SaverError> {
        let path = checkpoint_dir.join(STATE_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| SaverError::StateWrite { path, source: e })
    }

    /// Load the state record from `checkpoint_dir`.
    ///
    /// A missing record is not an error: the saver proceeds with empty state
    /// and best-checkpoint tracking may be incorrect until a new best is
    /// observed.
    pub fn restore(checkpoint_dir: &Path) -> Result<Self, SaverError> {
        let path = checkpoint_dir.join(STATE_FILE_NAME);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "resume requested but saver state record '{}' not found; \
                     starting with empty state (best checkpoint may be unknown)",
                    path.display()
                );
                return Ok(SaverState::default());
            }
            Err(e) => return Err(SaverError::StateRead { path, source: e }),
        };
        let state =
            serde_json::from_str(&json).map_err(|e| SaverError::StateParse { path: path.clone(), source: e })?;
        tracing::info!("restored saver state from '{}'", path.display());
        Ok(state)
    }
}
