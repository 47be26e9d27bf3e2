//! Lenient readers for individual JSON config fields
//!
//! Config files are edited by hand, so integer fields accept integral
//! floats and numeric strings, and boolean fields accept numbers and the
//! strings "true"/"false". A missing key reads the same as `null`.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::errors::{CropError, CropResult};

/// Reads an optional integer field
pub fn read_int(config: &Map<String, Value>, field: &str) -> CropResult<Option<i128>> {
    let value = match config.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .map(i128::from)
            .or_else(|| number.as_u64().map(i128::from))
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i128)
            }),
        Value::String(text) => text.trim().parse::<i128>().ok(),
        _ => None,
    };

    parsed
        .map(Some)
        .ok_or_else(|| CropError::config(field, format!("must be an integer, got {}", value)))
}

/// Reads a required integer field
pub fn require_int(config: &Map<String, Value>, field: &str) -> CropResult<i128> {
    read_int(config, field)?.ok_or_else(|| CropError::config(field, "cannot be null"))
}

/// Reads an optional boolean field
pub fn read_bool(config: &Map<String, Value>, field: &str) -> CropResult<Option<bool>> {
    let value = match config.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let parsed = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|f| f != 0.0),
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    };

    parsed
        .map(Some)
        .ok_or_else(|| CropError::config(field, format!("must be a boolean, got {}", value)))
}

/// Reads a required path field and makes it absolute
pub fn require_path(config: &Map<String, Value>, field: &str) -> CropResult<PathBuf> {
    match config.get(field) {
        None | Some(Value::Null) => Err(CropError::config(field, "cannot be null")),
        Some(Value::String(text)) if text.trim().is_empty() => {
            Err(CropError::config(field, "cannot be empty"))
        }
        Some(Value::String(text)) => std::path::absolute(text)
            .map_err(|e| CropError::config(field, format!("cannot be resolved: {}", e))),
        Some(other) => Err(CropError::config(field, format!("must be a path string, got {}", other))),
    }
}

/// Coerces a resolution: zero becomes 1 and negatives are sign-flipped
pub fn coerce_resolution(value: i128) -> u32 {
    coerce_unsigned(value).max(1)
}

/// Coerces a count or position: negatives are sign-flipped and values past
/// `u32::MAX` saturate
pub fn coerce_unsigned(value: i128) -> u32 {
    u32::try_from(value.unsigned_abs()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_read_int_accepts_numbers_and_strings() {
        let config = object(json!({"a": 12, "b": "34", "c": 56.0, "d": null}));
        assert_eq!(read_int(&config, "a").unwrap(), Some(12));
        assert_eq!(read_int(&config, "b").unwrap(), Some(34));
        assert_eq!(read_int(&config, "c").unwrap(), Some(56));
        assert_eq!(read_int(&config, "d").unwrap(), None);
        assert_eq!(read_int(&config, "missing").unwrap(), None);
    }

    #[test]
    fn test_read_int_rejects_garbage() {
        let config = object(json!({"a": "twelve", "b": 1.5, "c": [1]}));
        assert!(read_int(&config, "a").is_err());
        assert!(read_int(&config, "b").is_err());
        assert!(read_int(&config, "c").is_err());
    }

    #[test]
    fn test_require_int_names_field() {
        let config = object(json!({"crop_count": null}));
        let err = require_int(&config, "crop_count").unwrap_err();
        assert!(err.to_string().contains("crop_count"));
    }

    #[test]
    fn test_read_bool_variants() {
        let config = object(json!({"a": true, "b": 0, "c": "TRUE", "d": "nope"}));
        assert_eq!(read_bool(&config, "a").unwrap(), Some(true));
        assert_eq!(read_bool(&config, "b").unwrap(), Some(false));
        assert_eq!(read_bool(&config, "c").unwrap(), Some(true));
        assert!(read_bool(&config, "d").is_err());
    }

    #[test]
    fn test_require_path_is_absolute() {
        let config = object(json!({"p": "some/relative", "q": "", "r": 3}));
        assert!(require_path(&config, "p").unwrap().is_absolute());
        assert!(require_path(&config, "q").is_err());
        assert!(require_path(&config, "r").is_err());
        assert!(require_path(&config, "missing").is_err());
    }

    #[test]
    fn test_coercion_is_permissive() {
        assert_eq!(coerce_resolution(0), 1);
        assert_eq!(coerce_resolution(-64), 64);
        assert_eq!(coerce_unsigned(-3), 3);
        assert_eq!(coerce_unsigned(0), 0);
        assert_eq!(coerce_unsigned(i128::from(u32::MAX) + 1), u32::MAX);
        assert_eq!(coerce_resolution(i128::MIN), u32::MAX);
    }
}
