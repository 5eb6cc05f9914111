//! YAML documents.
//!
//! Parsing goes through `serde_yaml::Value` so that YAML-only constructs
//! (tags, non-string keys, merge keys) are resolved here instead of leaking
//! into the document model.

use crate::error::{ConvertError, ConvertResult};
use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;
use std::path::Path;

/// Parse YAML text into a document whose root is a mapping.
///
/// An empty document is an empty mapping.
pub fn parse_yaml(content: &str, path: &Path) -> ConvertResult<Value> {
    let mut yaml: Yaml =
        serde_yaml::from_str(content).map_err(|e| ConvertError::parse(path, e))?;
    yaml.apply_merge().map_err(|e| ConvertError::parse(path, e))?;

    match yaml_to_value(yaml).map_err(|e| ConvertError::parse(path, e))? {
        Value::Null => Ok(Value::Object(Map::new())),
        doc @ Value::Object(_) => Ok(doc),
        _ => Err(ConvertError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Render a document as YAML. Sequences start at their key's column.
pub fn render_yaml(value: &Value) -> ConvertResult<String> {
    serde_yaml::to_string(value).map_err(ConvertError::serialize)
}

fn yaml_to_value(yaml: Yaml) -> Result<Value, String> {
    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => Value::Number(number_to_json(&n)?),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_value)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key_to_string(key)?, yaml_to_value(value)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_value(tagged.value)?,
    })
}

fn number_to_json(n: &serde_yaml::Number) -> Result<Number, String> {
    if let Some(i) = n.as_i64() {
        Ok(Number::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Number::from(u))
    } else {
        let f = n.as_f64().unwrap_or(f64::NAN);
        Number::from_f64(f).ok_or_else(|| format!("{} cannot be represented in JSON", n))
    }
}

fn key_to_string(key: Yaml) -> Result<String, String> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => key_to_string(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => {
            Err("mapping keys must be scalars".to_string())
        }
    }
}
