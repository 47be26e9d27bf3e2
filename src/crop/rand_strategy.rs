//! Random cropping
//!
//! Draws a fixed number of crop positions uniformly over an image, with
//! optional random flips and half turns. Every run owns its own seeded
//! generator, so two runs with the same seed draw the same plans and runs
//! never disturb each other.

use std::fs;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::config::RandCropConfig;
use crate::errors::CropResult;
use crate::utils::image_utils::{image_base_name, open_image, resize_square, save_jpeg};

use super::augment::{FlipMode, Rotation};
use super::crop_strategy::{log_progress, CropKind, CropStrategy};
use super::namer::{crop_file_name, CropClock};
use super::position::CropPosition;

/// Manual seeds are reduced modulo this value
pub const SEED_MODULUS: i128 = (1 << 32) - 1;

/// The seed a run ended up with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSeed {
    /// Reduced from the configured `manual_seed`
    Manual(u64),
    /// Drawn from system entropy
    Auto(u64),
}

impl ResolvedSeed {
    pub fn resolve(manual_seed: Option<i128>) -> Self {
        match manual_seed {
            Some(seed) => ResolvedSeed::Manual(seed.rem_euclid(SEED_MODULUS) as u64),
            None => ResolvedSeed::Auto(u64::from(rand::random::<u32>())),
        }
    }

    pub fn value(&self) -> u64 {
        match self {
            ResolvedSeed::Manual(seed) | ResolvedSeed::Auto(seed) => *seed,
        }
    }
}

/// One random draw: where to crop and how to augment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    pub position: CropPosition,
    pub flip: FlipMode,
    pub rotation: Rotation,
}

/// Seeded source of crop plans for one image
pub struct RandomCropSampler {
    rng: StdRng,
    max_x: u32,
    max_y: u32,
    flipping: bool,
    rotating: bool,
}

impl RandomCropSampler {
    /// Creates a sampler, or `None` when the image cannot hold a single crop
    pub fn new(
        seed: u64,
        resolution: u32,
        width: u32,
        height: u32,
        flipping: bool,
        rotating: bool,
    ) -> Option<Self> {
        Some(RandomCropSampler {
            rng: StdRng::seed_from_u64(seed),
            max_x: width.checked_sub(resolution)?,
            max_y: height.checked_sub(resolution)?,
            flipping,
            rotating,
        })
    }

    /// Draws x, then y, then the flip and rotation when enabled
    pub fn next_plan(&mut self) -> CropPlan {
        let x = self.rng.gen_range(0..=self.max_x);
        let y = self.rng.gen_range(0..=self.max_y);

        let flip = if self.flipping {
            FlipMode::ALL[self.rng.gen_range(0..FlipMode::ALL.len())]
        } else {
            FlipMode::None
        };

        let rotation = if self.rotating {
            Rotation::ALL[self.rng.gen_range(0..Rotation::ALL.len())]
        } else {
            Rotation::None
        };

        CropPlan {
            position: CropPosition::new(x, y),
            flip,
            rotation,
        }
    }
}

/// Strategy that saves a fixed number of randomly placed crops
pub struct RandCropStrategy {
    clock: CropClock,
}

impl RandCropStrategy {
    pub fn new() -> Self {
        RandCropStrategy { clock: CropClock::new() }
    }

    /// Crops the configured image
    ///
    /// # Returns
    /// The number of crops saved
    pub fn run(&mut self, config: &RandCropConfig) -> CropResult<usize> {
        info!("Started preparation");
        config.log_summary();

        let seed = ResolvedSeed::resolve(config.manual_seed);
        match seed {
            ResolvedSeed::Manual(value) => info!("Manual random seed: {}", value),
            ResolvedSeed::Auto(value) => info!("Auto random seed: {}", value),
        }

        let job = &config.job;
        let image = open_image(&job.image_location)?;
        let base_name = image_base_name(&job.image_location);
        info!("Completed loading image ({}x{})", image.width(), image.height());

        fs::create_dir_all(&job.output_path)?;
        info!("Completed preparation");

        let resolution = job.crop_resolution;
        let Some(mut sampler) = RandomCropSampler::new(
            seed.value(),
            resolution,
            image.width(),
            image.height(),
            config.random_flipping,
            config.random_rotating,
        ) else {
            warn!(
                "Image is {}x{}, too small for a {} pixel crop; nothing to save",
                image.width(),
                image.height(),
                resolution
            );
            return Ok(0);
        };

        info!("Started random cropping");
        let mut total = 0;

        while total < config.crop_count as usize {
            let plan = sampler.next_plan();
            let position = plan.position;

            let mut crop = image.crop_imm(position.x, position.y, resolution, resolution);
            if let Some(resize) = job.resize_resolution {
                crop = resize_square(&crop, resize);
            }
            crop = plan.flip.apply(crop);
            crop = plan.rotation.apply(crop);

            let name = crop_file_name(
                &base_name,
                position,
                resolution,
                job.resize_resolution,
                plan.flip,
                plan.rotation,
                self.clock.now(),
            );
            save_jpeg(&crop, &job.output_path.join(name), config.crop_quality)?;

            total += 1;
            log_progress(total);
        }

        info!("Saved {} cropped images", total);
        info!("Completed random cropping");
        Ok(total)
    }
}

impl Default for RandCropStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CropStrategy for RandCropStrategy {
    fn kind(&self) -> CropKind {
        CropKind::Rand
    }

    fn crop_from_value(&mut self, config: &Value) -> CropResult<usize> {
        let config = RandCropConfig::from_value(config)?;
        self.run(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CropJobConfig, DEFAULT_CROP_QUALITY};
    use crate::crop::namer::CropNameParts;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn plans(seed: u64, count: usize, flipping: bool, rotating: bool) -> Vec<CropPlan> {
        let mut sampler = RandomCropSampler::new(seed, 16, 200, 120, flipping, rotating).unwrap();
        (0..count).map(|_| sampler.next_plan()).collect()
    }

    #[test]
    fn test_same_seed_same_plans() {
        assert_eq!(plans(1234, 200, true, true), plans(1234, 200, true, true));
        assert_ne!(plans(1234, 200, true, true), plans(4321, 200, true, true));
    }

    #[test]
    fn test_plans_stay_in_bounds() {
        for plan in plans(7, 2000, false, false) {
            assert!(plan.position.fits(16, 200, 120));
            assert_eq!(plan.flip, FlipMode::None);
            assert_eq!(plan.rotation, Rotation::None);
        }
    }

    #[test]
    fn test_augmentations_cover_every_choice() {
        let drawn = plans(99, 500, true, true);
        let flips: HashSet<FlipMode> = drawn.iter().map(|p| p.flip).collect();
        let rotations: HashSet<Rotation> = drawn.iter().map(|p| p.rotation).collect();
        assert_eq!(flips.len(), 4);
        assert_eq!(rotations.len(), 2);
    }

    #[test]
    fn test_sampler_rejects_small_images() {
        assert!(RandomCropSampler::new(1, 64, 63, 100, false, false).is_none());
        assert!(RandomCropSampler::new(1, 64, 100, 63, false, false).is_none());

        let mut exact = RandomCropSampler::new(1, 64, 64, 64, false, false).unwrap();
        assert_eq!(exact.next_plan().position, CropPosition::new(0, 0));
    }

    #[test]
    fn test_seed_resolution() {
        assert_eq!(ResolvedSeed::resolve(Some(5)), ResolvedSeed::Manual(5));
        assert_eq!(ResolvedSeed::resolve(Some(SEED_MODULUS + 3)), ResolvedSeed::Manual(3));
        assert_eq!(ResolvedSeed::resolve(Some(-1)), ResolvedSeed::Manual((SEED_MODULUS - 1) as u64));
        assert!(matches!(ResolvedSeed::resolve(None), ResolvedSeed::Auto(v) if v <= u64::from(u32::MAX)));
    }

    fn rand_config(image_location: PathBuf, output_path: PathBuf, crop_count: u32) -> RandCropConfig {
        RandCropConfig {
            job: CropJobConfig {
                image_location,
                output_path,
                crop_resolution: 20,
                resize_resolution: None,
            },
            manual_seed: Some(2022),
            random_flipping: true,
            random_rotating: true,
            crop_count,
            crop_quality: DEFAULT_CROP_QUALITY,
        }
    }

    #[test]
    fn test_run_saves_exact_count_within_bounds() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("scan.png");
        image::RgbImage::new(90, 50).save(&image_path).unwrap();
        let output = dir.path().join("out");

        let config = rand_config(image_path, output.clone(), 25);
        let saved = RandCropStrategy::new().run(&config).unwrap();
        assert_eq!(saved, 25);

        let names: Vec<String> = fs::read_dir(&output)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 25);
        for name in names {
            let parts = CropNameParts::parse(&name).unwrap();
            assert!(parts.x <= 70 && parts.y <= 30);
            assert_eq!(parts.crop_resolution, 20);
        }
    }

    #[test]
    fn test_run_on_too_small_image_saves_nothing() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("tiny.png");
        image::RgbImage::new(10, 10).save(&image_path).unwrap();
        let output = dir.path().join("out");

        let config = rand_config(image_path, output.clone(), 5);
        assert_eq!(RandCropStrategy::new().run(&config).unwrap(), 0);
        assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
    }

    #[test]
    fn test_run_with_zero_count() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("scan.png");
        image::RgbImage::new(40, 40).save(&image_path).unwrap();

        let config = rand_config(image_path, dir.path().join("out"), 0);
        assert_eq!(RandCropStrategy::new().run(&config).unwrap(), 0);
    }
}
