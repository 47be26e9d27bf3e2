//! Utility modules for common functionality
//!
//! This module provides the logging, progress, console input and image
//! helpers used throughout the application.

pub mod format_utils;
pub mod image_utils;
pub mod logger;
pub mod progress;
pub mod timed_input;
