//! Shared JSON configs
//!
//! Every strategy owns one config file in the app data folder; the bulk
//! orchestrator owns a third one that carries per-strategy overrides.

pub mod app_data;
pub mod bulk_config;
pub(crate) mod fields;
pub mod job_config;
pub mod store;

pub use app_data::AppData;
pub use bulk_config::BulkCropConfig;
pub use job_config::{CropJobConfig, GridCropConfig, RandCropConfig, DEFAULT_CROP_QUALITY};
