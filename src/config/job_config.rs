//! Typed configs for a single cropping invocation
//!
//! Each strategy reads its shared JSON config once per run and turns it into
//! one of these structs. All validation happens here, before any image I/O.

use std::path::PathBuf;

use log::info;
use serde_json::{Map, Value};

use crate::config::fields::{
    coerce_resolution, coerce_unsigned, read_bool, read_int, require_int, require_path,
};
use crate::errors::{CropError, CropResult};

/// JPEG quality used when a config does not choose one
pub const DEFAULT_CROP_QUALITY: u8 = 95;

/// Fields shared by every cropping strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropJobConfig {
    /// Absolute path of the image to crop
    pub image_location: PathBuf,
    /// Absolute path of the folder receiving the crops
    pub output_path: PathBuf,
    /// Side length of each square crop, in pixels
    pub crop_resolution: u32,
    /// Side length each crop is resized to, if any
    pub resize_resolution: Option<u32>,
}

impl CropJobConfig {
    /// Reads the shared fields from a config object
    pub fn from_json(config: &Map<String, Value>) -> CropResult<Self> {
        let image_location = require_path(config, "image_location")?;
        let output_path = require_path(config, "output_path")?;
        let crop_resolution = coerce_resolution(require_int(config, "crop_resolution")?);
        let resize_resolution = read_int(config, "resize_resolution")?.map(coerce_resolution);

        Ok(CropJobConfig {
            image_location,
            output_path,
            crop_resolution,
            resize_resolution,
        })
    }

    fn log_summary(&self) {
        info!("Image location: {}", self.image_location.display());
        info!("Output path: {}", self.output_path.display());
        info!("Crop resolution: {}", self.crop_resolution);
        match self.resize_resolution {
            Some(resize) => info!("Resize resolution: {}", resize),
            None => info!("No resize, keep crop resolution"),
        }
    }
}

/// Config of a grid cropping run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCropConfig {
    pub job: CropJobConfig,
    pub start_position_x: u32,
    pub start_position_y: u32,
    /// `None` means no limit besides the image width
    pub max_crop_count_x: Option<u32>,
    /// `None` means no limit besides the image height
    pub max_crop_count_y: Option<u32>,
}

impl GridCropConfig {
    /// Parses a grid config from a JSON value, which must be an object
    pub fn from_value(value: &Value) -> CropResult<Self> {
        Self::from_json(as_config_object(value)?)
    }

    /// Parses a grid config from a JSON object
    pub fn from_json(config: &Map<String, Value>) -> CropResult<Self> {
        let job = CropJobConfig::from_json(config)?;
        let start_position_x = read_unsigned_or(config, "start_position_x", 0)?;
        let start_position_y = read_unsigned_or(config, "start_position_y", 0)?;
        let max_crop_count_x = read_optional_unsigned(config, "max_crop_count_x")?;
        let max_crop_count_y = read_optional_unsigned(config, "max_crop_count_y")?;

        Ok(GridCropConfig {
            job,
            start_position_x,
            start_position_y,
            max_crop_count_x,
            max_crop_count_y,
        })
    }

    /// Logs every resolved field
    pub fn log_summary(&self) {
        self.job.log_summary();
        info!("Start position X: {}", self.start_position_x);
        info!("Start position Y: {}", self.start_position_y);
        info!("Max crop count X: {}", describe_limit(self.max_crop_count_x));
        info!("Max crop count Y: {}", describe_limit(self.max_crop_count_y));
    }
}

/// Config of a random cropping run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandCropConfig {
    pub job: CropJobConfig,
    /// Seed before reduction; `None` draws one from system entropy
    pub manual_seed: Option<i128>,
    pub random_flipping: bool,
    pub random_rotating: bool,
    /// Number of crops to save
    pub crop_count: u32,
    /// JPEG quality, 0 to 100
    pub crop_quality: u8,
}

impl RandCropConfig {
    /// Parses a random config from a JSON value, which must be an object
    pub fn from_value(value: &Value) -> CropResult<Self> {
        Self::from_json(as_config_object(value)?)
    }

    /// Parses a random config from a JSON object
    pub fn from_json(config: &Map<String, Value>) -> CropResult<Self> {
        let job = CropJobConfig::from_json(config)?;
        let manual_seed = read_int(config, "manual_seed")?;
        let random_flipping = read_bool(config, "random_flipping")?.unwrap_or(false);
        let random_rotating = read_bool(config, "random_rotating")?.unwrap_or(false);
        let crop_count = coerce_unsigned(require_int(config, "crop_count")?);
        let crop_quality = match read_int(config, "crop_quality")? {
            Some(quality) => quality.unsigned_abs().min(100) as u8,
            None => DEFAULT_CROP_QUALITY,
        };

        Ok(RandCropConfig {
            job,
            manual_seed,
            random_flipping,
            random_rotating,
            crop_count,
            crop_quality,
        })
    }

    /// Logs every resolved field except the seed, which is logged once resolved
    pub fn log_summary(&self) {
        self.job.log_summary();
        info!("Random flipping mode: {}", self.random_flipping);
        info!("Random rotating mode: {}", self.random_rotating);
        info!("Crop count: {}", self.crop_count);
        info!("Crop quality: {}", self.crop_quality);
    }
}

fn as_config_object(value: &Value) -> CropResult<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| CropError::GenericError(format!("Config must be a JSON object, got {}", value)))
}

fn read_unsigned_or(config: &Map<String, Value>, field: &str, default: u32) -> CropResult<u32> {
    match read_int(config, field)? {
        Some(value) => Ok(coerce_unsigned(value)),
        None => Ok(default),
    }
}

fn read_optional_unsigned(config: &Map<String, Value>, field: &str) -> CropResult<Option<u32>> {
    Ok(read_int(config, field)?.map(coerce_unsigned))
}

fn describe_limit(limit: Option<u32>) -> String {
    match limit {
        Some(count) => count.to_string(),
        None => "unbounded".to_string(),
    }
}
