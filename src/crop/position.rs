//! Crop positions in pixel coordinates
//!
//! A position is the top-left corner of a square crop. (0,0) is the
//! top-left corner of the source image.

/// Top-left corner of a square crop (in pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropPosition {
    /// X-coordinate of the top-left corner (pixels from left)
    pub x: u32,

    /// Y-coordinate of the top-left corner (pixels from top)
    pub y: u32,
}

impl CropPosition {
    pub fn new(x: u32, y: u32) -> Self {
        CropPosition { x, y }
    }

    /// Checks that a square of side `resolution` at this position lies inside the image
    ///
    /// # Arguments
    /// * `resolution` - Side length of the crop
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn fits(&self, resolution: u32, width: u32, height: u32) -> bool {
        fits_span(self.x, resolution, width) && fits_span(self.y, resolution, height)
    }
}

/// Whether a crop of `resolution` starting at `start` ends within `limit`
pub(crate) fn fits_span(start: u32, resolution: u32, limit: u32) -> bool {
    u64::from(start) + u64::from(resolution) <= u64::from(limit)
}
