//! Locations of the shared config files, backups and the run log

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::crop::CropKind;
use crate::errors::CropResult;

/// Environment variable naming the app data folder
pub const APP_DATA_ENV: &str = "CROPKIT_APP_DATA";
/// App data folder used when neither a flag nor the environment names one
pub const DEFAULT_APP_DATA_DIR: &str = "cropkit_app_data";

pub const GRID_CROP_CONFIG_NAME: &str = "grid_crop_config.json";
pub const RAND_CROP_CONFIG_NAME: &str = "rand_crop_config.json";
pub const BULK_CROP_CONFIG_NAME: &str = "bulk_crop_config.json";
pub const BULK_CROP_BACKUPS_NAME: &str = "bulk_crop_backups";
pub const LOG_NAME: &str = "log.txt";

const DEFAULT_GRID_CROP_CONFIG: &str = include_str!("../../default_configs/grid_crop_config.json");
const DEFAULT_RAND_CROP_CONFIG: &str = include_str!("../../default_configs/rand_crop_config.json");
const DEFAULT_BULK_CROP_CONFIG: &str = include_str!("../../default_configs/bulk_crop_config.json");

/// The folder holding every piece of persisted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppData {
    root: PathBuf,
}

impl AppData {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AppData { root: root.into() }
    }

    /// Picks the app data folder from an explicit path, the environment, or the default
    pub fn locate(explicit: Option<&str>) -> CropResult<Self> {
        let chosen = match explicit {
            Some(path) => path.to_string(),
            None => std::env::var(APP_DATA_ENV).unwrap_or_else(|_| DEFAULT_APP_DATA_DIR.to_string()),
        };
        Ok(AppData::new(std::path::absolute(chosen)?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bulk_crop_config(&self) -> PathBuf {
        self.root.join(BULK_CROP_CONFIG_NAME)
    }

    /// Live shared config of a strategy
    pub fn strategy_config(&self, kind: CropKind) -> PathBuf {
        self.root.join(strategy_config_name(kind))
    }

    /// Where the bulk orchestrator parks a copy of a strategy config
    pub fn strategy_backup(&self, kind: CropKind) -> PathBuf {
        self.root.join(BULK_CROP_BACKUPS_NAME).join(strategy_config_name(kind))
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join(LOG_NAME)
    }

    /// Creates the folder layout and writes any missing config from the built-in defaults
    pub fn ensure_defaults(&self) -> CropResult<()> {
        fs::create_dir_all(self.root.join(BULK_CROP_BACKUPS_NAME))?;

        let defaults = [
            (self.strategy_config(CropKind::Grid), DEFAULT_GRID_CROP_CONFIG),
            (self.strategy_config(CropKind::Rand), DEFAULT_RAND_CROP_CONFIG),
            (self.bulk_crop_config(), DEFAULT_BULK_CROP_CONFIG),
        ];

        for (path, content) in defaults {
            if !path.exists() {
                fs::write(&path, content)?;
                info!("Created default config {}", path.display());
            }
        }

        Ok(())
    }
}

fn strategy_config_name(kind: CropKind) -> &'static str {
    match kind {
        CropKind::Grid => GRID_CROP_CONFIG_NAME,
        CropKind::Rand => RAND_CROP_CONFIG_NAME,
    }
}
