//! Custom error types for cropping runs

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while loading configs, cropping images or orchestrating bulk runs
#[derive(Debug)]
pub enum CropError {
    /// I/O error
    IoError(io::Error),
    /// Image decode or encode failure
    ImageError(image::ImageError),
    /// Malformed JSON config file
    JsonError(serde_json::Error),
    /// Missing or invalid config field
    ConfigError {
        /// Name of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },
    /// A bulk run failed on one of its images
    ImageRunFailed {
        /// The input image being cropped
        image: PathBuf,
        /// The underlying failure
        source: Box<CropError>,
    },
    /// Backing up or restoring a shared config failed
    TransactionError {
        /// The config or backup file involved
        path: PathBuf,
        /// The underlying I/O failure
        source: io::Error,
    },
    /// Generic error with message
    GenericError(String),
}

impl CropError {
    /// Builds a config error for `field`
    pub fn config(field: &str, message: impl Into<String>) -> Self {
        CropError::ConfigError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropError::IoError(e) => write!(f, "I/O error: {}", e),
            CropError::ImageError(e) => write!(f, "Image error: {}", e),
            CropError::JsonError(e) => write!(f, "JSON error: {}", e),
            CropError::ConfigError { field, message } => {
                write!(f, "Config error: \"{}\" {}", field, message)
            }
            CropError::ImageRunFailed { image, source } => {
                write!(f, "Cropping {} failed: {}", image.display(), source)
            }
            CropError::TransactionError { path, source } => {
                write!(f, "Config backup/restore failed for {}: {}", path.display(), source)
            }
            CropError::GenericError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CropError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CropError::IoError(e) => Some(e),
            CropError::ImageError(e) => Some(e),
            CropError::JsonError(e) => Some(e),
            CropError::ImageRunFailed { source, .. } => Some(source.as_ref()),
            CropError::TransactionError { source, .. } => Some(source),
            CropError::ConfigError { .. } | CropError::GenericError(_) => None,
        }
    }
}

impl From<io::Error> for CropError {
    fn from(error: io::Error) -> Self {
        CropError::IoError(error)
    }
}

impl From<image::ImageError> for CropError {
    fn from(error: image::ImageError) -> Self {
        CropError::ImageError(error)
    }
}

impl From<serde_json::Error> for CropError {
    fn from(error: serde_json::Error) -> Self {
        CropError::JsonError(error)
    }
}

impl From<String> for CropError {
    fn from(msg: String) -> Self {
        CropError::GenericError(msg)
    }
}

/// Result type for cropping operations
pub type CropResult<T> = Result<T, CropError>;

/// Renders an error followed by its chain of sources, one per line
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        text.push_str(&format!("\n  caused by: {}", cause));
        current = cause.source();
    }
    text
}
