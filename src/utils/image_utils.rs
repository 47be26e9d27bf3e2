//! Image decode/encode helpers shared by the cropping strategies
//!
//! Source images for dataset preparation are often huge scans, so decoding
//! lifts the `image` crate's default allocation cap and bounds the total
//! pixel count instead. Header reads and the decoder share that bound,
//! so an image whose header passes is one the decoder will open.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, Limits};
use log::debug;

use crate::errors::{CropError, CropResult};

/// Largest accepted pixel count of a source image (65535 x 65535)
pub const MAX_IMAGE_PIXELS: u64 = 65535 * 65535;

/// Whether a `width` x `height` image is within [`MAX_IMAGE_PIXELS`]
pub fn within_pixel_budget(width: u32, height: u32) -> bool {
    u64::from(width) * u64::from(height) <= MAX_IMAGE_PIXELS
}

fn open_reader(path: &Path) -> CropResult<ImageReader<BufReader<File>>> {
    let mut reader = ImageReader::open(path)
        .map_err(|e| CropError::GenericError(format!("Cannot open image {}: {}", path.display(), e)))?
        .with_guessed_format()?;
    reader.limits(Limits::no_limits());
    Ok(reader)
}

/// Reads the dimensions from the header and checks them against the pixel budget
pub fn read_dimensions(path: &Path) -> CropResult<(u32, u32)> {
    let reader = open_reader(path)?;
    if reader.format().is_none() {
        return Err(CropError::GenericError(format!(
            "Unrecognized image format: {}",
            path.display()
        )));
    }

    let (width, height) = reader.into_dimensions()?;
    if !within_pixel_budget(width, height) {
        return Err(CropError::GenericError(format!(
            "Image {} is {}x{}, more than {} pixels",
            path.display(),
            width,
            height,
            MAX_IMAGE_PIXELS
        )));
    }
    Ok((width, height))
}

/// Opens and decodes an image, guessing the format from its content
pub fn open_image(path: &Path) -> CropResult<DynamicImage> {
    read_dimensions(path)?;

    let image = open_reader(path)?.decode()?;
    debug!("Decoded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

/// Whether `path` is an image [`open_image`] accepts
///
/// Only the header is read. Any failure, including `path` being a folder,
/// means "not an image".
pub fn is_decodable_image(path: &Path) -> bool {
    path.is_file() && read_dimensions(path).is_ok()
}

/// Resizes a crop to a `resolution` square with bicubic (Catmull-Rom) resampling
pub fn resize_square(image: &DynamicImage, resolution: u32) -> DynamicImage {
    image.resize_exact(resolution, resolution, FilterType::CatmullRom)
}

/// Saves an image as a JPEG at the given quality (clamped to 1..=100)
pub fn save_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> CropResult<()> {
    let rgb = image.to_rgb8();
    let file = File::create(path)
        .map_err(|e| CropError::GenericError(format!("Cannot create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);

    let encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
    encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)?;
    Ok(())
}

/// File name of `path` without its extension
pub fn image_base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
