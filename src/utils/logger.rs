//! Logger utility for run-wide logging
//!
//! This module provides a logger that works alongside the standard log
//! crate: every record is appended to the run log file and mirrored to the
//! console, so long batches can be audited after the fact.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Append-only file logger that echoes to the console
#[derive(Clone)]
pub struct Logger {
    /// File handle for log output, shared by every clone
    file: Arc<Mutex<File>>,
}

impl Logger {
    /// Opens (or creates) the log file in append mode
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file; missing parent folders are created
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be opened
    pub fn new(log_file: &Path) -> io::Result<Self> {
        if let Some(parent) = log_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(log_file)?;
        Ok(Logger {
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Appends a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(file, "{}", message)?;
        file.flush()
    }

    /// Installs a clone of this logger as the backend of the log crate
    pub fn init_global_logger(&self) {
        if log::set_boxed_logger(Box::new(self.clone())).is_err() {
            // Logger was already set - this should not happen in normal usage
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(LevelFilter::Debug);
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = format!("[{}] {}", record.level(), record.args());
        let _ = Logger::log(self, &message);

        // Debug records stay in the file
        match record.level() {
            Level::Error | Level::Warn => eprintln!("{}", message),
            Level::Info => println!("{}", message),
            Level::Debug | Level::Trace => {}
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}
