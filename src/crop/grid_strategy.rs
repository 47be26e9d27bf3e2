//! Grid cropping
//!
//! Tiles an image with non-overlapping squares, row by row, starting from a
//! configurable corner and optionally capping the number of crops per axis.

use std::fs;

use log::info;
use serde_json::Value;

use crate::config::GridCropConfig;
use crate::errors::CropResult;
use crate::utils::image_utils::{image_base_name, open_image, resize_square, save_jpeg};

use super::augment::{FlipMode, Rotation};
use super::crop_strategy::{log_progress, CropKind, CropStrategy};
use super::namer::{crop_file_name, CropClock};
use super::position::CropPosition;

/// JPEG quality of grid crops
pub const GRID_CROP_QUALITY: u8 = 95;

/// Row-major walk over the grid positions of one image
///
/// Rows advance by the crop resolution from `start_y`; within a row the
/// cursor starts again at `start_x`. A row or column ends when the next crop
/// would leave the image or its axis counter reaches the configured maximum.
#[derive(Debug, Clone)]
pub struct GridCursor {
    resolution: u64,
    width: u64,
    height: u64,
    start_x: u64,
    max_count_x: u32,
    max_count_y: u32,
    pos_x: u64,
    pos_y: u64,
    count_x: u32,
    count_y: u32,
}

impl GridCursor {
    pub fn new(config: &GridCropConfig, width: u32, height: u32) -> Self {
        GridCursor {
            resolution: u64::from(config.job.crop_resolution.max(1)),
            width: u64::from(width),
            height: u64::from(height),
            start_x: u64::from(config.start_position_x),
            max_count_x: config.max_crop_count_x.unwrap_or(u32::MAX),
            max_count_y: config.max_crop_count_y.unwrap_or(u32::MAX),
            pos_x: u64::from(config.start_position_x),
            pos_y: u64::from(config.start_position_y),
            count_x: 0,
            count_y: 0,
        }
    }

    /// Number of positions a fresh cursor yields
    pub fn planned_count(&self) -> u64 {
        let per_axis = |start: u64, limit: u64, max_count: u32| {
            let fitting = limit.saturating_sub(start) / self.resolution;
            fitting.min(u64::from(max_count))
        };

        per_axis(self.start_x, self.width, self.max_count_x)
            * per_axis(self.pos_y, self.height, self.max_count_y)
    }

    fn row_open(&self) -> bool {
        self.count_y < self.max_count_y && self.pos_y + self.resolution <= self.height
    }

    fn column_open(&self) -> bool {
        self.count_x < self.max_count_x && self.pos_x + self.resolution <= self.width
    }
}

impl Iterator for GridCursor {
    type Item = CropPosition;

    fn next(&mut self) -> Option<CropPosition> {
        while self.row_open() {
            if self.column_open() {
                // Both coordinates are below their u32 image side here
                let position = CropPosition::new(self.pos_x as u32, self.pos_y as u32);
                self.count_x += 1;
                self.pos_x += self.resolution;
                return Some(position);
            }

            self.count_y += 1;
            self.pos_y += self.resolution;
            self.count_x = 0;
            self.pos_x = self.start_x;
        }

        None
    }
}

/// Strategy that saves every grid cell of an image
pub struct GridCropStrategy {
    clock: CropClock,
}

impl GridCropStrategy {
    pub fn new() -> Self {
        GridCropStrategy { clock: CropClock::new() }
    }

    /// Crops the configured image
    ///
    /// # Returns
    /// The number of crops saved
    pub fn run(&mut self, config: &GridCropConfig) -> CropResult<usize> {
        info!("Started preparation");
        config.log_summary();

        let job = &config.job;
        let image = open_image(&job.image_location)?;
        let base_name = image_base_name(&job.image_location);
        info!("Completed loading image ({}x{})", image.width(), image.height());

        fs::create_dir_all(&job.output_path)?;
        info!("Completed preparation");

        let cursor = GridCursor::new(config, image.width(), image.height());
        info!("Started grid cropping, {} crops planned", cursor.planned_count());

        let resolution = job.crop_resolution;
        let mut total = 0;

        for position in cursor {
            debug_assert!(position.fits(resolution, image.width(), image.height()));

            let mut crop = image.crop_imm(position.x, position.y, resolution, resolution);
            if let Some(resize) = job.resize_resolution {
                crop = resize_square(&crop, resize);
            }

            let name = crop_file_name(
                &base_name,
                position,
                resolution,
                job.resize_resolution,
                FlipMode::None,
                Rotation::None,
                self.clock.now(),
            );
            save_jpeg(&crop, &job.output_path.join(name), GRID_CROP_QUALITY)?;

            total += 1;
            log_progress(total);
        }

        info!("Saved {} cropped images", total);
        info!("Completed grid cropping");
        Ok(total)
    }
}

impl Default for GridCropStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CropStrategy for GridCropStrategy {
    fn kind(&self) -> CropKind {
        CropKind::Grid
    }

    fn crop_from_value(&mut self, config: &Value) -> CropResult<usize> {
        let config = GridCropConfig::from_value(config)?;
        self.run(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropJobConfig;
    use crate::crop::namer::CropNameParts;
    use image::GenericImageView;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn grid_config(
        resolution: u32,
        start: (u32, u32),
        max_counts: (Option<u32>, Option<u32>),
    ) -> GridCropConfig {
        GridCropConfig {
            job: CropJobConfig {
                image_location: PathBuf::from("unused.png"),
                output_path: PathBuf::from("unused"),
                crop_resolution: resolution,
                resize_resolution: None,
            },
            start_position_x: start.0,
            start_position_y: start.1,
            max_crop_count_x: max_counts.0,
            max_crop_count_y: max_counts.1,
        }
    }

    fn positions(config: &GridCropConfig, width: u32, height: u32) -> Vec<(u32, u32)> {
        GridCursor::new(config, width, height).map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_thousand_pixel_square_in_four() {
        let config = grid_config(500, (0, 0), (None, None));
        assert_eq!(
            positions(&config, 1000, 1000),
            vec![(0, 0), (500, 0), (0, 500), (500, 500)]
        );
    }

    #[test]
    fn test_image_smaller_than_crop_yields_nothing() {
        let config = grid_config(500, (0, 0), (None, None));
        assert!(positions(&config, 499, 1000).is_empty());
        assert!(positions(&config, 1000, 10).is_empty());
    }

    #[test]
    fn test_saturated_resolution_yields_nothing() {
        let config = grid_config(u32::MAX, (0, 0), (None, None));
        assert_eq!(GridCursor::new(&config, 65535, 65535).planned_count(), 0);
        assert!(positions(&config, 65535, 65535).is_empty());
    }

    #[test]
    fn test_start_position_resets_each_row() {
        let config = grid_config(10, (5, 3), (None, None));
        assert_eq!(
            positions(&config, 30, 25),
            vec![(5, 3), (15, 3), (5, 13), (15, 13)]
        );
    }

    #[test]
    fn test_max_counts_cap_each_axis() {
        let config = grid_config(10, (0, 0), (Some(2), Some(1)));
        assert_eq!(positions(&config, 100, 100), vec![(0, 0), (10, 0)]);

        let config = grid_config(10, (0, 0), (Some(0), None));
        assert!(positions(&config, 100, 100).is_empty());
    }

    #[test]
    fn test_count_formula_and_bounds_hold_across_shapes() {
        let shapes = [(1000, 1000), (1023, 517), (64, 2000), (7, 7), (300, 299)];
        let resolutions = [1, 7, 64, 100, 512];
        let starts = [(0, 0), (3, 0), (0, 50), (33, 17), (2000, 0)];
        let maxima = [(None, None), (Some(2), None), (None, Some(3)), (Some(1), Some(1))];

        for &(width, height) in &shapes {
            for &resolution in &resolutions {
                for &start in &starts {
                    for &max_counts in &maxima {
                        let config = grid_config(resolution, start, max_counts);
                        let cursor = GridCursor::new(&config, width, height);
                        let expected = cursor.planned_count();

                        let per_axis = |limit: u32, start: u32, max: Option<u32>| {
                            let fitting = u64::from(limit.saturating_sub(start) / resolution);
                            max.map_or(fitting, |m| fitting.min(u64::from(m)))
                        };
                        assert_eq!(
                            expected,
                            per_axis(width, start.0, max_counts.0) * per_axis(height, start.1, max_counts.1)
                        );

                        let emitted: Vec<CropPosition> = cursor.collect();
                        assert_eq!(emitted.len() as u64, expected);
                        for position in emitted {
                            assert!(position.fits(resolution, width, height));
                        }
                    }
                }
            }
        }
    }

    fn write_test_image(path: &Path, width: u32, height: u32) {
        let image = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        image.save(path).unwrap();
    }

    #[test]
    fn test_run_saves_every_cell() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("field.png");
        write_test_image(&image_path, 100, 60);

        let mut config = grid_config(30, (0, 0), (None, None));
        config.job.image_location = image_path;
        config.job.output_path = dir.path().join("out/nested");
        config.job.resize_resolution = Some(16);

        let mut strategy = GridCropStrategy::new();
        let saved = strategy.run(&config).unwrap();
        assert_eq!(saved, 6);

        let mut seen = Vec::new();
        for entry in fs::read_dir(&config.job.output_path).unwrap() {
            let name = entry.unwrap().file_name().into_string().unwrap();
            let parts = CropNameParts::parse(&name).unwrap();
            assert_eq!(parts.base, "field");
            assert_eq!(parts.crop_resolution, 30);
            assert_eq!(parts.resize_resolution, Some(16));
            seen.push((parts.x, parts.y));

            let crop = image::open(config.job.output_path.join(&name)).unwrap();
            assert_eq!(crop.dimensions(), (16, 16));
        }
        seen.sort();
        assert_eq!(seen, vec![(0, 0), (0, 30), (30, 0), (30, 30), (60, 0), (60, 30)]);
    }

    #[test]
    fn test_run_fails_on_missing_image() {
        let dir = tempdir().unwrap();
        let mut config = grid_config(10, (0, 0), (None, None));
        config.job.image_location = dir.path().join("missing.png");
        config.job.output_path = dir.path().join("out");

        assert!(GridCropStrategy::new().run(&config).is_err());
    }

    #[test]
    fn test_crop_from_value_rejects_bad_config_before_io() {
        let mut strategy = GridCropStrategy::new();
        let err = strategy
            .crop_from_value(&serde_json::json!({"image_location": null}))
            .unwrap_err();
        assert!(err.to_string().contains("image_location"));
    }
}
