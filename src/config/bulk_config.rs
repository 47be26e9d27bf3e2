//! Config of a bulk cropping session

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::store::load_json;
use crate::crop::CropKind;
use crate::errors::{CropError, CropResult};

#[derive(Debug, Deserialize)]
struct BulkCropConfigFile {
    #[serde(default)]
    bulk_input_path: Option<String>,
    #[serde(default)]
    bulk_output_path: Option<String>,
    #[serde(default)]
    grid_crop_config_overrides: Option<Map<String, Value>>,
    #[serde(default)]
    rand_crop_config_overrides: Option<Map<String, Value>>,
}

/// Resolved bulk config
#[derive(Debug, Clone, PartialEq)]
pub struct BulkCropConfig {
    /// Folder scanned for input images
    pub bulk_input_path: PathBuf,
    /// Folder receiving one subfolder per input image
    pub bulk_output_path: PathBuf,
    /// Merged onto the grid config before each image
    pub grid_crop_config_overrides: Map<String, Value>,
    /// Merged onto the random config before each image
    pub rand_crop_config_overrides: Map<String, Value>,
}

impl BulkCropConfig {
    /// Parses a bulk config from a JSON value
    pub fn from_value(value: Value) -> CropResult<Self> {
        let file: BulkCropConfigFile = serde_json::from_value(value)?;

        Ok(BulkCropConfig {
            bulk_input_path: absolute_field("bulk_input_path", file.bulk_input_path)?,
            bulk_output_path: absolute_field("bulk_output_path", file.bulk_output_path)?,
            grid_crop_config_overrides: file.grid_crop_config_overrides.unwrap_or_default(),
            rand_crop_config_overrides: file.rand_crop_config_overrides.unwrap_or_default(),
        })
    }

    /// Loads and parses a bulk config file
    pub fn load(path: &Path) -> CropResult<Self> {
        Self::from_value(load_json(path)?)
    }

    /// Overrides that apply to the given strategy
    pub fn overrides_for(&self, kind: CropKind) -> &Map<String, Value> {
        match kind {
            CropKind::Grid => &self.grid_crop_config_overrides,
            CropKind::Rand => &self.rand_crop_config_overrides,
        }
    }
}

fn absolute_field(field: &str, value: Option<String>) -> CropResult<PathBuf> {
    match value {
        None => Err(CropError::config(field, "cannot be null")),
        Some(text) if text.trim().is_empty() => Err(CropError::config(field, "cannot be empty")),
        Some(text) => std::path::absolute(&text)
            .map_err(|e| CropError::config(field, format!("cannot be resolved: {}", e))),
    }
}
