//! JSON config file reading and writing

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::errors::{CropError, CropResult};

/// Loads a JSON document from `path`
pub fn load_json(path: &Path) -> CropResult<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        CropError::GenericError(format!("Cannot read config {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Loads a JSON document that must be an object
pub fn load_json_object(path: &Path) -> CropResult<Map<String, Value>> {
    match load_json(path)? {
        Value::Object(map) => Ok(map),
        other => Err(CropError::GenericError(format!(
            "Config {} must hold a JSON object, got {}",
            path.display(),
            other
        ))),
    }
}

/// Saves `value` to `path` as 4-space indented JSON
pub fn save_json(value: &Value, path: &Path) -> CropResult<()> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');

    let mut file = fs::File::create(path)?;
    file.write_all(&buffer)?;
    file.flush()?;
    Ok(())
}

/// Copies every key of `overrides` onto `config`, replacing existing values
pub fn apply_overrides(config: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        config.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let value = json!({"crop_resolution": 64, "output_path": null});

        save_json(&value, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"crop_resolution\": 64"));
        assert_eq!(load_json(&path).unwrap(), value);
    }

    #[test]
    fn test_load_json_object_rejects_arrays() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(load_json_object(&path).is_err());
    }

    #[test]
    fn test_load_missing_file_mentions_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = load_json(&path).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_apply_overrides_replaces_and_adds() {
        let mut config = json!({"a": 1, "b": 2}).as_object().cloned().unwrap();
        let overrides = json!({"b": 20, "c": 30}).as_object().cloned().unwrap();
        apply_overrides(&mut config, &overrides);
        assert_eq!(Value::Object(config), json!({"a": 1, "b": 20, "c": 30}));
    }
}
