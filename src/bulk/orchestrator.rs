//! Bulk cropping over every image of a folder
//!
//! The orchestrator drives an ordinary crop strategy once per image. For
//! each image it rewrites the strategy's shared config inside a
//! [`ConfigTransaction`], runs the strategy from that config, and restores
//! the operator's config before moving on.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde_json::{Map, Value};

use crate::bulk::transaction::ConfigTransaction;
use crate::config::store::{apply_overrides, load_json_object, save_json};
use crate::config::{AppData, BulkCropConfig};
use crate::crop::{is_crop_file_name, CropKind, CropStrategyFactory};
use crate::errors::{CropError, CropResult};
use crate::utils::image_utils::{image_base_name, is_decodable_image};
use crate::utils::progress::ProgressTracker;

/// Totals of a finished bulk run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkReport {
    /// Images cropped
    pub images: usize,
    /// Crops saved across all images
    pub crops: usize,
}

/// Runs one strategy over every decodable image of a folder
pub struct BulkOrchestrator<'a> {
    app_data: &'a AppData,
    show_progress: bool,
}

impl<'a> BulkOrchestrator<'a> {
    pub fn new(app_data: &'a AppData) -> Self {
        BulkOrchestrator {
            app_data,
            show_progress: false,
        }
    }

    /// Draws a progress bar over the images while running
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Crops every image under `config.bulk_input_path` with the `kind` strategy
    ///
    /// # Arguments
    /// * `config` - Input/output folders and per-strategy overrides
    /// * `kind` - Which strategy crops each image
    ///
    /// # Returns
    /// The number of images and crops, or the first per-image failure
    pub fn run(&self, config: &BulkCropConfig, kind: CropKind) -> CropResult<BulkReport> {
        let live = self.app_data.strategy_config(kind);
        let backup = self.app_data.strategy_backup(kind);
        ConfigTransaction::recover_stale(&live, &backup)?;

        info!("Bulk input path: {}", config.bulk_input_path.display());
        info!("Bulk output path: {}", config.bulk_output_path.display());

        let images = discover_images(&config.bulk_input_path)?;
        let total = images.len();
        info!("Bulk crop image count: {}", total);

        fs::create_dir_all(&config.bulk_output_path)?;
        let overrides = config.overrides_for(kind);

        let progress = if self.show_progress {
            ProgressTracker::new(total as u64, "Bulk cropping")
        } else {
            ProgressTracker::hidden(total as u64)
        };

        info!("Started bulk cropping");
        let mut report = BulkReport::default();

        for (index, image) in images.iter().enumerate() {
            info!("- Started cropping image {} / {}", index + 1, total);
            let output = config
                .bulk_output_path
                .join(format!("{}-{}", kind.output_prefix(), image_base_name(image)));

            let crops = match crop_one(kind, &live, &backup, overrides, image, &output) {
                Ok(crops) => crops,
                Err(e) => {
                    error!("Cropping image {} / {} ({}) failed: {}", index + 1, total, image.display(), e);
                    progress.abandon("Bulk cropping failed");
                    return Err(CropError::ImageRunFailed {
                        image: image.clone(),
                        source: Box::new(e),
                    });
                }
            };

            let saved = count_crop_files(&output)?;
            info!("Output folder {} holds {} crop files", output.display(), saved);
            report.images += 1;
            report.crops += crops;
            progress.increment(1);
            info!("- Completed cropping image {} / {}", progress.position(), total);
        }

        progress.finish();
        info!("Completed bulk cropping: {} images, {} crops", report.images, report.crops);
        Ok(report)
    }
}

/// Runs the strategy on one image inside a config transaction
fn crop_one(
    kind: CropKind,
    live: &Path,
    backup: &Path,
    overrides: &Map<String, Value>,
    image: &Path,
    output: &Path,
) -> CropResult<usize> {
    let transaction = ConfigTransaction::begin(live, backup)?;
    let outcome = rewrite_and_crop(kind, transaction.live_path(), overrides, image, output);

    match (outcome, transaction.restore()) {
        (Ok(crops), Ok(())) => Ok(crops),
        (Err(e), Ok(())) | (Ok(_), Err(e)) => Err(e),
        (Err(e), Err(restore_error)) => {
            error!("Restoring {} also failed: {}", live.display(), restore_error);
            Err(e)
        }
    }
}

fn rewrite_and_crop(
    kind: CropKind,
    live: &Path,
    overrides: &Map<String, Value>,
    image: &Path,
    output: &Path,
) -> CropResult<usize> {
    let mut config = load_json_object(live)?;
    apply_overrides(&mut config, overrides);
    config.insert(
        "image_location".to_string(),
        Value::String(image.to_string_lossy().into_owned()),
    );
    config.insert(
        "output_path".to_string(),
        Value::String(output.to_string_lossy().into_owned()),
    );
    save_json(&Value::Object(config), live)?;

    info!("---- The following will be the output from \"{}-crop\" ----", kind);
    let crops = CropStrategyFactory::create(kind).crop_from_file(live)?;
    info!("---- The above has been the output from \"{}-crop\" ----", kind);
    Ok(crops)
}

/// Lists the decodable images directly inside `folder`, sorted by path
pub fn discover_images(folder: &Path) -> CropResult<Vec<PathBuf>> {
    let mut entries = fs::read_dir(folder)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    Ok(entries
        .into_iter()
        .filter(|path| {
            let keep = is_decodable_image(path);
            if !keep {
                debug!("Skipping {}", path.display());
            }
            keep
        })
        .collect())
}

/// Counts the files in `folder` whose names the crop namer produced
pub fn count_crop_files(folder: &Path) -> CropResult<usize> {
    if !folder.is_dir() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if is_crop_file_name(&entry.file_name().to_string_lossy()) {
            count += 1;
        }
    }
    Ok(count)
}
