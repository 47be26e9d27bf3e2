use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::bulk::{BulkOrchestrator, BulkReport};
use crate::config::{AppData, BulkCropConfig};
use crate::crop::{CropKind, CropStrategyFactory};
use crate::errors::CropResult;
use crate::utils::format_utils::quote_path;

/// Main interface to the cropkit library
///
/// Every operation reads its settings from the config files in the app
/// data folder, the same files the command line shows and the bulk
/// orchestrator rewrites.
pub struct CropKit {
    app_data: AppData,
}

impl CropKit {
    /// Create a new CropKit over an app data folder
    ///
    /// # Arguments
    /// * `app_data` - Folder holding the shared configs and the run log
    pub fn new(app_data: AppData) -> Self {
        CropKit { app_data }
    }

    pub fn app_data(&self) -> &AppData {
        &self.app_data
    }

    /// Location of the config a crop command reads
    pub fn config_path(&self, kind: CropKind) -> PathBuf {
        self.app_data.strategy_config(kind)
    }

    /// Raw text of a config file, shown to the operator before cropping
    pub fn config_text(&self, path: &Path) -> CropResult<String> {
        Ok(fs::read_to_string(path)?)
    }

    /// Crop one image with the grid strategy and its shared config
    ///
    /// # Returns
    /// The number of crops saved
    pub fn grid_crop(&self) -> CropResult<usize> {
        self.crop(CropKind::Grid)
    }

    /// Crop one image with the random strategy and its shared config
    ///
    /// # Returns
    /// The number of crops saved
    pub fn rand_crop(&self) -> CropResult<usize> {
        self.crop(CropKind::Rand)
    }

    /// Crop one image with the `kind` strategy and its shared config
    pub fn crop(&self, kind: CropKind) -> CropResult<usize> {
        let crops = CropStrategyFactory::create(kind).crop_from_file(&self.config_path(kind))?;
        info!("Completed {} cropping with {} crops", kind, crops);
        Ok(crops)
    }

    /// Crop every image of the bulk input folder with the `kind` strategy
    ///
    /// # Arguments
    /// * `kind` - Strategy applied to each image
    /// * `show_progress` - Whether to draw a progress bar over the images
    pub fn bulk_crop(&self, kind: CropKind, show_progress: bool) -> CropResult<BulkReport> {
        let config = BulkCropConfig::load(&self.app_data.bulk_crop_config())?;
        BulkOrchestrator::new(&self.app_data)
            .with_progress(show_progress)
            .run(&config, kind)
    }

    /// Absolute form of `path` as a quoted, escaped string ready for a JSON config
    pub fn path_name(&self, path: &str) -> CropResult<String> {
        Ok(quote_path(&std::path::absolute(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::{load_json_object, save_json};
    use image::{DynamicImage, RgbImage};
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn test_rand_crop_from_shared_config() {
        let dir = tempdir().unwrap();
        let kit = CropKit::new(AppData::new(dir.path().join("app")));
        kit.app_data().ensure_defaults().unwrap();

        let image = dir.path().join("source.png");
        DynamicImage::ImageRgb8(RgbImage::new(30, 30)).save(&image).unwrap();

        let path = kit.config_path(CropKind::Rand);
        let mut config = load_json_object(&path).unwrap();
        config.insert("image_location".into(), Value::String(image.to_string_lossy().into_owned()));
        config.insert("output_path".into(), Value::String(dir.path().join("out").to_string_lossy().into_owned()));
        config.insert("crop_resolution".into(), Value::from(10));
        config.insert("crop_count".into(), Value::from(7));
        config.insert("manual_seed".into(), Value::from(42));
        save_json(&Value::Object(config), &path).unwrap();

        assert_eq!(kit.rand_crop().unwrap(), 7);
        assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 7);
    }

    #[test]
    fn test_crop_with_default_config_fails_on_missing_image() {
        let dir = tempdir().unwrap();
        let kit = CropKit::new(AppData::new(dir.path()));
        kit.app_data().ensure_defaults().unwrap();

        let err = kit.grid_crop().unwrap_err();
        assert!(err.to_string().contains("image_location"));
    }

    #[test]
    fn test_path_name_is_absolute_and_quoted() {
        let kit = CropKit::new(AppData::new("/tmp/cropkit"));
        let quoted = kit.path_name("images/a.png").unwrap();

        assert!(quoted.starts_with('"') && quoted.ends_with('"'));
        let inner: String = serde_json::from_str(&quoted).unwrap();
        assert!(Path::new(&inner).is_absolute());
        assert!(inner.ends_with("a.png"));
    }
}
