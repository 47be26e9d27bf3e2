//! Backup and restore of a shared strategy config
//!
//! A bulk run rewrites a strategy's live config for every image. Before
//! doing so it copies the file to a backup location; restoring copies the
//! backup's bytes back and deletes the backup. The guard restores on drop
//! too, so an early return or a panic cannot leak a rewritten config.
//!
//! The backup doubles as a crash marker: if one is still present when a new
//! bulk run starts, the previous run died mid-transaction and the backup
//! holds the operator's real config.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, warn};

use crate::errors::{CropError, CropResult};

/// Scope guard around one rewrite of a live config file
#[derive(Debug)]
pub struct ConfigTransaction {
    live: PathBuf,
    backup: PathBuf,
    finished: bool,
}

impl ConfigTransaction {
    /// Copies `live` to `backup` and returns the guard
    pub fn begin(live: &Path, backup: &Path) -> CropResult<Self> {
        if let Some(parent) = backup.parent() {
            fs::create_dir_all(parent).map_err(|e| transaction_error(parent, e))?;
        }
        fs::copy(live, backup).map_err(|e| transaction_error(live, e))?;
        debug!("Backed up {} to {}", live.display(), backup.display());

        Ok(ConfigTransaction {
            live: live.to_path_buf(),
            backup: backup.to_path_buf(),
            finished: false,
        })
    }

    /// The config file this transaction may rewrite
    pub fn live_path(&self) -> &Path {
        &self.live
    }

    /// Puts the backed-up bytes back and removes the backup
    pub fn restore(mut self) -> CropResult<()> {
        self.finished = true;
        restore_backup(&self.live, &self.backup)
    }

    /// Restores a backup left behind by an interrupted run
    ///
    /// # Returns
    /// `true` if a stale backup was found and restored
    pub fn recover_stale(live: &Path, backup: &Path) -> CropResult<bool> {
        if !backup.is_file() {
            return Ok(false);
        }

        warn!(
            "Found {} from an interrupted bulk run; restoring it over {}",
            backup.display(),
            live.display()
        );
        restore_backup(live, backup)?;
        Ok(true)
    }
}

impl Drop for ConfigTransaction {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        match restore_backup(&self.live, &self.backup) {
            Ok(()) => warn!("Restored {} after an early exit", self.live.display()),
            Err(e) => error!("Failed to restore {}: {}", self.live.display(), e),
        }
    }
}

fn restore_backup(live: &Path, backup: &Path) -> CropResult<()> {
    fs::copy(backup, live).map_err(|e| transaction_error(backup, e))?;
    fs::remove_file(backup).map_err(|e| transaction_error(backup, e))?;
    debug!("Restored {} from {}", live.display(), backup.display());
    Ok(())
}

fn transaction_error(path: &Path, source: io::Error) -> CropError {
    CropError::TransactionError {
        path: path.to_path_buf(),
        source,
    }
}
