//! Cropping engine
//!
//! This module provides the grid and random cropping strategies, the crop
//! positions and augmentations they produce, and the naming scheme of the
//! files they save.

mod augment;
mod crop_strategy;
mod grid_strategy;
pub mod namer;
mod position;
mod rand_strategy;

// Public exports
pub use augment::{FlipMode, Rotation};
pub use crop_strategy::{CropKind, CropStrategy, CropStrategyFactory, PROGRESS_INTERVAL};
pub use grid_strategy::{GridCropStrategy, GridCursor, GRID_CROP_QUALITY};
pub use namer::{crop_file_name, is_crop_file_name, CropClock, CropNameParts};
pub use position::CropPosition;
pub use rand_strategy::{CropPlan, RandCropStrategy, RandomCropSampler, ResolvedSeed, SEED_MODULUS};
