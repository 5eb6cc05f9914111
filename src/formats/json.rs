//! JSON documents, including the flat Vault-style layout.

use crate::error::{ConvertError, ConvertResult};
use crate::flatten::FlatMap;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Parse JSON text whose root must be an object.
pub fn parse_json(content: &str, path: &Path) -> ConvertResult<Value> {
    let value: Value = serde_json::from_str(content).map_err(|e| ConvertError::parse(path, e))?;
    if !value.is_object() {
        return Err(ConvertError::NotAMapping {
            path: path.to_path_buf(),
        });
    }
    Ok(value)
}

/// Parse flat Vault-style JSON into a flat mapping.
///
/// Top-level entries are taken as they are. Values are not flattened again,
/// so a raw list leaf such as `"grid[0]": [1, 2]` keeps its shape.
pub fn parse_flat_json(content: &str, path: &Path) -> ConvertResult<FlatMap> {
    match parse_json(content, path)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(ConvertError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Render a flat mapping as a JSON object, keys in sorted order.
pub fn render_flat_json(flat: &FlatMap, pretty: bool) -> ConvertResult<String> {
    render(flat, pretty)
}

/// Render a nested document as JSON.
pub fn render_json(value: &Value, pretty: bool) -> ConvertResult<String> {
    render(value, pretty)
}

fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> ConvertResult<String> {
    let mut out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(ConvertError::serialize)?;
    out.push('\n');
    Ok(out)
}
