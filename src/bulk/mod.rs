//! Bulk cropping
//!
//! Runs a crop strategy over a whole folder of images, rewriting the
//! strategy's shared config per image and restoring it afterwards.

mod orchestrator;
mod transaction;

pub use orchestrator::{count_crop_files, discover_images, BulkOrchestrator, BulkReport};
pub use transaction::ConfigTransaction;
