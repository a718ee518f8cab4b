use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::SaverConfig;
use crate::error::SaverError;
use crate::saver::fsops;
use crate::saver::ordering::MetricOrdering;
use crate::saver::state::{RankedCheckpoint, SaverState};
use crate::snapshot::{Snapshot, SnapshotMeta};

/// Best checkpoint observed so far, as returned from
/// [`CheckpointSaver::save_checkpoint`]. Present only once at least one
/// save has carried a metric, and unaffected by eviction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestCheckpoint {
    pub metric: f64,
    pub epoch: usize,
}

/// Tracks the top-N training checkpoints ranked by metric and maintains
/// rotating crash-recovery checkpoints.
///
/// The saver assumes it is the sole writer to its checkpoint and recovery
/// directories. Every mutating operation runs to completion on the caller's
/// thread and ends with a full state persist, so the durable record always
/// reflects the most recently completed operation.
#[derive(Debug)]
pub struct CheckpointSaver {
    config: SaverConfig,
    ordering: MetricOrdering,
    state: SaverState,
}

impl CheckpointSaver {
    /// Create a saver, validating the configuration and creating the
    /// checkpoint and recovery directories.
    ///
    /// With `config.resume` set, the previous run's state record is loaded;
    /// a missing record logs a warning and starts empty.
    pub fn new(config: SaverConfig) -> Result<Self, SaverError> {
        config.validate()?;
        fs::create_dir_all(&config.checkpoint_dir)?;
        fs::create_dir_all(&config.recovery_dir)?;

        let state = if config.resume {
            SaverState::restore(&config.checkpoint_dir)?
        } else {
            SaverState::default()
        };
        let ordering = MetricOrdering::from_decreasing(config.decreasing);

        Ok(CheckpointSaver {
            config,
            ordering,
            state,
        })
    }

    /// Save a checkpoint for `epoch`, atomically publishing it as the
    /// latest snapshot and conditionally promoting it into the ranked
    /// history and the best slot.
    ///
    /// Promotion happens when the history is not yet full, when `metric` is
    /// absent (unranked snapshots are kept but never compared), or when
    /// `metric` out-ranks the current worst retained entry. Returns the best
    /// checkpoint observed so far.
    pub fn save_checkpoint(
        &mut self,
        source: &dyn Snapshot,
        epoch: usize,
        metric: Option<f64>,
    ) -> Result<Option<BestCheckpoint>, SaverError> {
        let tmp_path = self.checkpoint_file("tmp");
        let last_path = self.last_path();
        self.write_snapshot(source, &tmp_path, SnapshotMeta { epoch, metric })?;
        fsops::replace_file(&tmp_path, &last_path).map_err(|e| SaverError::Publish {
            path: last_path.clone(),
            source: e,
        })?;
        debug!("published latest snapshot for epoch {} to '{}'", epoch, last_path.display());

        let at_capacity = self.state.ranked.len() >= self.config.max_history;
        let promote = !at_capacity
            || match metric {
                None => true,
                Some(m) => {
                    let worst = self.state.ranked.last().and_then(|c| c.metric);
                    self.ordering.outranks(m, worst)
                }
            };

        if promote {
            if at_capacity {
                self.evict_worst(1);
            }
            let file_name = format!("{}-{}", self.config.checkpoint_prefix, epoch);
            let ranked_path = self.checkpoint_file(&file_name);
            fs::hard_link(&last_path, &ranked_path).map_err(|e| SaverError::Link {
                src: last_path.clone(),
                dst: ranked_path.clone(),
                source: e,
            })?;
            self.state.ranked.push(RankedCheckpoint {
                path: ranked_path,
                metric,
            });
            self.ordering.sort(&mut self.state.ranked);
            info!(
                "retained checkpoints:\n{}",
                self.state
                    .ranked
                    .iter()
                    .map(|c| format!(" ({}, {:?})", c.path.display(), c.metric))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
        }

        if let Some(m) = metric {
            let improved = self
                .state
                .best_metric
                .map_or(true, |best| self.ordering.better(m, best));
            if improved {
                self.state.best_epoch = Some(epoch);
                self.state.best_metric = Some(m);
                let best_path = self.best_path();
                fsops::link_replace(&last_path, &best_path).map_err(|e| SaverError::Link {
                    src: last_path.clone(),
                    dst: best_path,
                    source: e,
                })?;
                info!("new best checkpoint: epoch {} with metric {}", epoch, m);
            }
        }

        self.state.persist(&self.config.checkpoint_dir)?;

        Ok(self.best())
    }

    /// Save a crash-recovery checkpoint for `epoch`/`step`, deleting the
    /// oldest of the rotating pair. At most two recovery files exist on
    /// disk at any time.
    pub fn save_recovery(
        &mut self,
        source: &dyn Snapshot,
        epoch: usize,
        step: usize,
    ) -> Result<PathBuf, SaverError> {
        let file_name = format!(
            "{}-{}-{}{}",
            self.config.recovery_prefix, epoch, step, self.config.extension
        );
        let save_path = self.config.recovery_dir.join(file_name);
        self.write_snapshot(source, &save_path, SnapshotMeta { epoch, metric: None })?;

        if self.state.previous_recovery.exists() {
            debug!("removing superseded recovery '{}'", self.state.previous_recovery.display());
            if let Err(e) = fs::remove_file(&self.state.previous_recovery) {
                warn!(
                    "failed to delete recovery '{}': {}",
                    self.state.previous_recovery.display(),
                    e
                );
            }
        }
        self.state.previous_recovery =
            std::mem::replace(&mut self.state.current_recovery, save_path.clone());

        self.state.persist(&self.config.checkpoint_dir)?;

        Ok(save_path)
    }

    /// Locate a resumable recovery checkpoint: the lexicographically first
    /// file in the recovery directory matching the recovery prefix and
    /// extension. Callers that want "first" to mean "newest" must keep
    /// their epoch/step naming lexicographically monotonic (zero-padded).
    pub fn find_recovery(&self) -> Result<Option<PathBuf>, SaverError> {
        Ok(fsops::first_match(
            &self.config.recovery_dir,
            &self.config.recovery_prefix,
            &self.config.extension,
        )?)
    }

    /// Best checkpoint observed so far, surviving eviction.
    pub fn best(&self) -> Option<BestCheckpoint> {
        match (self.state.best_metric, self.state.best_epoch) {
            (Some(metric), Some(epoch)) => Some(BestCheckpoint { metric, epoch }),
            _ => None,
        }
    }

    /// Retained ranked checkpoints, most-preferred first.
    pub fn ranked(&self) -> &[RankedCheckpoint] {
        &self.state.ranked
    }

    /// Current saver bookkeeping.
    pub fn state(&self) -> &SaverState {
        &self.state
    }

    /// Path of the atomically published latest snapshot.
    pub fn last_path(&self) -> PathBuf {
        self.checkpoint_file("last")
    }

    /// Path of the best-snapshot hard link.
    pub fn best_path(&self) -> PathBuf {
        self.checkpoint_file("model_best")
    }

    /// Delete the `count` worst entries of a full ranked history, keeping
    /// `max_history - count`. File deletion failures are logged and the
    /// entry is dropped from the history regardless; a stale file may
    /// linger on disk.
    fn evict_worst(&mut self, count: usize) {
        let keep = match self.config.max_history.checked_sub(count) {
            Some(keep) => keep,
            None => return,
        };
        if keep >= self.state.ranked.len() {
            return;
        }
        for evicted in &self.state.ranked[keep..] {
            debug!("evicting checkpoint '{}'", evicted.path.display());
            if let Err(e) = fs::remove_file(&evicted.path) {
                warn!("failed to delete evicted checkpoint '{}': {}", evicted.path.display(), e);
            }
        }
        self.state.ranked.truncate(keep);
    }

    fn write_snapshot(
        &self,
        source: &dyn Snapshot,
        path: &Path,
        meta: SnapshotMeta,
    ) -> Result<(), SaverError> {
        let bytes = source
            .serialize(&meta)
            .map_err(|e| SaverError::Serialize(e.to_string()))?;
        fs::write(path, bytes).map_err(|e| SaverError::SnapshotWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn checkpoint_file(&self, stem: &str) -> PathBuf {
        self.config
            .checkpoint_dir
            .join(format!("{}{}", stem, self.config.extension))
    }
}
