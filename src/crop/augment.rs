//! Flip and rotation augmentations applied to random crops

use image::DynamicImage;

/// Axes a crop is flipped around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlipMode {
    #[default]
    None,
    /// Around the x axis: top-bottom
    X,
    /// Around the y axis: left-right
    Y,
    /// Both flips
    XY,
}

impl FlipMode {
    /// Every mode, in the order random draws index into
    pub const ALL: [FlipMode; 4] = [FlipMode::None, FlipMode::X, FlipMode::Y, FlipMode::XY];

    /// Active axis letters, `x` before `y`; empty for no flip
    pub fn tag(&self) -> &'static str {
        match self {
            FlipMode::None => "",
            FlipMode::X => "x",
            FlipMode::Y => "y",
            FlipMode::XY => "xy",
        }
    }

    pub fn flips_x(&self) -> bool {
        matches!(self, FlipMode::X | FlipMode::XY)
    }

    pub fn flips_y(&self) -> bool {
        matches!(self, FlipMode::Y | FlipMode::XY)
    }

    pub fn apply(&self, image: DynamicImage) -> DynamicImage {
        let image = if self.flips_x() { image.flipv() } else { image };
        if self.flips_y() {
            image.fliph()
        } else {
            image
        }
    }
}

/// Rotation applied after flipping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    None,
    Half,
}

impl Rotation {
    pub const ALL: [Rotation; 2] = [Rotation::None, Rotation::Half];

    /// Rotation in degrees as used in file names; empty for no rotation
    pub fn tag(&self) -> &'static str {
        match self {
            Rotation::None => "",
            Rotation::Half => "180",
        }
    }

    pub fn apply(&self, image: DynamicImage) -> DynamicImage {
        match self {
            Rotation::None => image,
            Rotation::Half => image.rotate180(),
        }
    }
}
