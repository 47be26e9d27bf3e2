//! Timing and log framing around a cropping run

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{error, info};

use crate::errors::{error_chain, CropError, CropResult};
use crate::utils::format_utils::format_elapsed;

/// Brackets one cropping run in the log with its start time and elapsed time
pub struct CropSession {
    started: DateTime<Local>,
    log_file: PathBuf,
}

impl CropSession {
    pub fn start(title: &str, log_file: &Path) -> Self {
        let started = Local::now();
        info!("Will start cropping");
        info!("---- The following will be logged to {} ----", log_file.display());
        info!("{} started at {}", title, started.format("%Y-%m-%d %H:%M:%S%.6f"));
        info!("-");

        CropSession {
            started,
            log_file: log_file.to_path_buf(),
        }
    }

    /// Logs the elapsed time and, on failure, the full error chain
    pub fn finish<T>(self, result: CropResult<T>) -> CropResult<T> {
        let elapsed = format_elapsed(Local::now().signed_duration_since(self.started));

        match &result {
            Ok(_) => {
                info!("-");
                info!("Execution time: {} (days, hours: minutes: seconds)", elapsed);
                info!("---- The above has been logged to {} ----", self.log_file.display());
                info!("Cropping completed");
            }
            Err(e) => {
                log_failure(e);
                info!("-");
                info!("Execution stopped after: {} (days, hours: minutes: seconds)", elapsed);
                info!("---- The above has been logged to {} ----", self.log_file.display());
                info!("Cropping stopped");
            }
        }

        result
    }
}

/// Logs the full chain of a command failure to the log file and stderr
pub fn log_failure(error: &CropError) {
    error!("{}", error_chain(error));
}

/// [`log_failure`] for use in `map_err`
pub fn reported(error: CropError) -> CropError {
    log_failure(&error);
    error
}
