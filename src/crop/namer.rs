//! File names for saved crops
//!
//! A crop's file name records where it came from and how it was processed:
//!
//! `{base}-At-{x}-{y}-Crop-{res}[-Resize-{r}][-Flip-{axes}][-Rotation-{deg}]-Time-{YYYYMMDD-HHMMSS-micros}.jpg`
//!
//! Building a name is pure; the timestamp comes from the caller, normally a
//! [`CropClock`], which never repeats a microsecond within one strategy run.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

use super::augment::{FlipMode, Rotation};
use super::position::CropPosition;

/// Extension of every saved crop
pub const CROP_EXTENSION: &str = "jpg";

lazy_static! {
    static ref CROP_NAME_PATTERN: Regex = Regex::new(
        r"^(?P<base>.+)-At-(?P<x>\d+)-(?P<y>\d+)-Crop-(?P<crop>\d+)(?:-Resize-(?P<resize>\d+))?(?:-Flip-(?P<flip>xy|x|y))?(?:-Rotation-(?P<rotation>\d+))?-Time-(?P<date>\d{8})-(?P<time>\d{6})-(?P<micros>\d{6})\.jpg$"
    )
    .expect("crop name pattern is valid");
}

/// Everything a crop file name encodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropNameParts {
    /// Source image name without extension
    pub base: String,
    pub x: u32,
    pub y: u32,
    pub crop_resolution: u32,
    pub resize_resolution: Option<u32>,
    /// Flip axes letters, empty when not flipped
    pub flip: String,
    /// Rotation in degrees, empty when not rotated
    pub rotation: String,
    pub timestamp: NaiveDateTime,
}

impl CropNameParts {
    /// Renders the file name
    pub fn file_name(&self) -> String {
        let mut name = format!(
            "{}-At-{}-{}-Crop-{}",
            self.base, self.x, self.y, self.crop_resolution
        );

        if let Some(resize) = self.resize_resolution {
            name.push_str(&format!("-Resize-{}", resize));
        }
        if !self.flip.is_empty() {
            name.push_str(&format!("-Flip-{}", self.flip));
        }
        if !self.rotation.is_empty() {
            name.push_str(&format!("-Rotation-{}", self.rotation));
        }

        name.push_str(&format!("-Time-{}.{}", format_timestamp(&self.timestamp), CROP_EXTENSION));
        name
    }

    /// Recovers the parts from a file name, or `None` if the name was not made by [`crop_file_name`]
    pub fn parse(file_name: &str) -> Option<Self> {
        let captures = CROP_NAME_PATTERN.captures(file_name)?;

        let number = |key: &str| captures.name(key).and_then(|m| m.as_str().parse::<u32>().ok());
        let text = |key: &str| captures.name(key).map(|m| m.as_str().to_string()).unwrap_or_default();

        let date = NaiveDate::parse_from_str(captures.name("date")?.as_str(), "%Y%m%d").ok()?;
        let time = NaiveTime::parse_from_str(captures.name("time")?.as_str(), "%H%M%S").ok()?;
        let micros = number("micros")?;
        let timestamp = date.and_time(time).with_nanosecond(micros * 1000)?;

        Some(CropNameParts {
            base: text("base"),
            x: number("x")?,
            y: number("y")?,
            crop_resolution: number("crop")?,
            resize_resolution: match captures.name("resize") {
                Some(m) => Some(m.as_str().parse().ok()?),
                None => None,
            },
            flip: text("flip"),
            rotation: text("rotation"),
            timestamp,
        })
    }
}

/// Builds the file name of one crop
pub fn crop_file_name(
    base: &str,
    position: CropPosition,
    crop_resolution: u32,
    resize_resolution: Option<u32>,
    flip: FlipMode,
    rotation: Rotation,
    timestamp: NaiveDateTime,
) -> String {
    CropNameParts {
        base: base.to_string(),
        x: position.x,
        y: position.y,
        crop_resolution,
        resize_resolution,
        flip: flip.tag().to_string(),
        rotation: rotation.tag().to_string(),
        timestamp,
    }
    .file_name()
}

/// Whether a file name looks like a saved crop
pub fn is_crop_file_name(file_name: &str) -> bool {
    CROP_NAME_PATTERN.is_match(file_name)
}

fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    let micros = (timestamp.nanosecond() % 1_000_000_000) / 1000;
    format!("{}-{:06}", timestamp.format("%Y%m%d-%H%M%S"), micros)
}

/// Wall clock handing out strictly increasing microsecond timestamps
pub struct CropClock {
    source: fn() -> NaiveDateTime,
    last: Option<NaiveDateTime>,
}

impl CropClock {
    /// A clock reading local time
    pub fn new() -> Self {
        Self::with_source(|| Local::now().naive_local())
    }

    /// A clock reading time from `source`
    pub fn with_source(source: fn() -> NaiveDateTime) -> Self {
        CropClock { source, last: None }
    }

    /// Current time truncated to microseconds, bumped past the previous reading if needed
    pub fn now(&mut self) -> NaiveDateTime {
        let raw = (self.source)();
        let mut now = raw.with_nanosecond(raw.nanosecond() / 1000 * 1000).unwrap_or(raw);

        if let Some(last) = self.last {
            if now <= last {
                now = last + TimeDelta::microseconds(1);
            }
        }

        self.last = Some(now);
        now
    }
}

impl Default for CropClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, 4)
            .unwrap()
            .and_hms_micro_opt(5, 6, 7, 89)
            .unwrap()
    }

    #[test]
    fn test_plain_name() {
        let name = crop_file_name(
            "photo",
            CropPosition::new(500, 0),
            500,
            None,
            FlipMode::None,
            Rotation::None,
            fixed_time(),
        );
        assert_eq!(name, "photo-At-500-0-Crop-500-Time-20220304-050607-000089.jpg");
    }

    #[test]
    fn test_name_with_every_segment() {
        let name = crop_file_name(
            "photo",
            CropPosition::new(1, 2),
            64,
            Some(32),
            FlipMode::XY,
            Rotation::Half,
            fixed_time(),
        );
        assert_eq!(
            name,
            "photo-At-1-2-Crop-64-Resize-32-Flip-xy-Rotation-180-Time-20220304-050607-000089.jpg"
        );
    }

    #[test]
    fn test_parse_recovers_parts() {
        let name = crop_file_name(
            "my-At-image",
            CropPosition::new(10, 20),
            30,
            Some(15),
            FlipMode::Y,
            Rotation::None,
            fixed_time(),
        );
        let parts = CropNameParts::parse(&name).unwrap();
        assert_eq!(parts.base, "my-At-image");
        assert_eq!((parts.x, parts.y), (10, 20));
        assert_eq!(parts.crop_resolution, 30);
        assert_eq!(parts.resize_resolution, Some(15));
        assert_eq!(parts.flip, "y");
        assert_eq!(parts.rotation, "");
        assert_eq!(parts.timestamp, fixed_time());
        assert_eq!(parts.file_name(), name);
    }

    #[test]
    fn test_foreign_names_are_rejected() {
        assert!(!is_crop_file_name("photo.jpg"));
        assert!(!is_crop_file_name("photo-At-1-2-Crop-3.jpg"));
        assert!(CropNameParts::parse("photo-At-1-2-Crop-3-Time-2022-050607-000089.jpg").is_none());
    }

    #[test]
    fn test_frozen_clock_still_yields_unique_names() {
        let mut clock = CropClock::with_source(fixed_time);
        let names: HashSet<String> = (0..1000)
            .map(|_| {
                crop_file_name(
                    "photo",
                    CropPosition::new(0, 0),
                    8,
                    None,
                    FlipMode::None,
                    Rotation::None,
                    clock.now(),
                )
            })
            .collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_clock_is_strictly_increasing() {
        let mut clock = CropClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second > first);
        assert_eq!(second.nanosecond() % 1000, 0);
    }
}
