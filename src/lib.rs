pub mod errors;
pub mod config;
pub mod crop;
pub mod bulk;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::CropKit;

pub use bulk::{BulkOrchestrator, BulkReport, ConfigTransaction};
pub use config::{AppData, BulkCropConfig, GridCropConfig, RandCropConfig};
pub use crop::{CropKind, CropStrategy, CropStrategyFactory, GridCropStrategy, RandCropStrategy};
pub use errors::{CropError, CropResult};
