//! Cropping strategy definitions
//!
//! This module defines the strategy pattern shared by grid and random
//! cropping, so callers like the bulk orchestrator can run either one from
//! its shared config file without knowing which it is.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};
use serde_json::Value;

use crate::config::store::load_json;
use crate::errors::CropResult;

use super::grid_strategy::GridCropStrategy;
use super::rand_strategy::RandCropStrategy;

/// Progress is logged at the first crop and every this many crops after
pub const PROGRESS_INTERVAL: usize = 500;

/// Which cropping strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropKind {
    Grid,
    Rand,
}

impl CropKind {
    pub const ALL: [CropKind; 2] = [CropKind::Grid, CropKind::Rand];

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            CropKind::Grid => "grid",
            CropKind::Rand => "rand",
        }
    }

    /// Prefix of the per-image output folders of a bulk run
    pub fn output_prefix(&self) -> &'static str {
        match self {
            CropKind::Grid => "GridCrop",
            CropKind::Rand => "RandCrop",
        }
    }
}

impl fmt::Display for CropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CropKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CropKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("Unknown crop type \"{}\"; supported crop types: grid, rand", s))
    }
}

/// A way of cutting one image into crops
pub trait CropStrategy {
    fn kind(&self) -> CropKind;

    /// Parses `config` and crops the image it names
    ///
    /// # Returns
    /// The number of crops saved
    fn crop_from_value(&mut self, config: &Value) -> CropResult<usize>;

    /// Loads the config file at `config_path` and crops the image it names
    fn crop_from_file(&mut self, config_path: &Path) -> CropResult<usize> {
        debug!("Loading {} crop config from {}", self.kind(), config_path.display());
        let config = load_json(config_path)?;
        self.crop_from_value(&config)
    }
}

/// Factory for strategies by kind
pub struct CropStrategyFactory;

impl CropStrategyFactory {
    pub fn create(kind: CropKind) -> Box<dyn CropStrategy> {
        match kind {
            CropKind::Grid => Box::new(GridCropStrategy::new()),
            CropKind::Rand => Box::new(RandCropStrategy::new()),
        }
    }
}

/// Whether the running total is one that gets logged
pub(crate) fn should_report(total: usize) -> bool {
    total == 1 || (total > 0 && total % PROGRESS_INTERVAL == 0)
}

/// Logs the running total at the first crop and every [`PROGRESS_INTERVAL`] crops
pub(crate) fn log_progress(total: usize) {
    if should_report(total) {
        info!("Saved {} cropped images", total);
    }
}
