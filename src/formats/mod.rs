//! File format adapters: `.env`, YAML and JSON.
//!
//! Each adapter converts between text and the document model
//! (`serde_json::Value`) or a flat mapping. The format of a file is chosen by
//! its extension.

pub mod env;
pub mod json;
pub mod yaml;

use crate::error::{ConvertError, ConvertResult};
use crate::flatten::{FlatMap, flatten};
use std::fmt;
use std::path::Path;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Env,
    Yaml,
    Json,
}

impl Format {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "env" => Some(Format::Env),
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Detect the format of `path` from its extension.
    ///
    /// A dotfile with no other extension (`.env`) counts as having that
    /// extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        if let Some(ext) = path.extension() {
            return Self::from_extension(&ext.to_string_lossy());
        }
        let name = path.file_name()?.to_string_lossy();
        name.strip_prefix('.').and_then(Self::from_extension)
    }

    /// Like [`Format::from_path`], but an unknown extension is an error.
    pub fn require(path: &Path) -> ConvertResult<Self> {
        Self::from_path(path).ok_or_else(|| ConvertError::UnsupportedExtension {
            path: path.to_path_buf(),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Env => "env",
            Format::Yaml => "yaml",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse `content` in `format` straight into a flat mapping.
///
/// `.env` input is already flat; YAML and JSON are parsed and flattened.
pub fn parse_flat(format: Format, content: &str, path: &Path) -> ConvertResult<FlatMap> {
    match format {
        Format::Env => Ok(env::parse_env(content)),
        Format::Yaml => Ok(flatten(yaml::parse_yaml(content, path)?, "")),
        Format::Json => Ok(flatten(json::parse_json(content, path)?, "")),
    }
}
