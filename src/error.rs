//! Error types for conversions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Every failure a conversion run can hit. All of them are fatal to the run.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// No `-i` input was given.
    #[error("at least one input file is required (use -i)")]
    MissingInput,

    /// Reverse mode takes exactly one flat JSON input.
    #[error("reverse mode accepts exactly 1 input JSON file, got {count}")]
    InvalidReverseInput { count: usize },

    /// Input or output extension has no adapter.
    #[error("unsupported file extension: {}", .path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML, JSON, or an unrepresentable value.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The document root is not a mapping.
    #[error("{} must contain a mapping at the top level", .path.display())]
    NotAMapping { path: PathBuf },

    /// Two flat keys disagree about the shape of a shared path.
    #[error("conflicting structure for key '{key}' at '{path}'")]
    PathConflict { key: String, path: String },

    /// A list index too large to expand.
    #[error("list index {index} in key '{key}' exceeds the supported maximum")]
    IndexTooLarge { key: String, index: usize },

    #[error("failed to serialize output: {message}")]
    Serialize { message: String },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn conflict(key: &str, path: impl Into<String>) -> Self {
        Self::PathConflict {
            key: key.to_string(),
            path: path.into(),
        }
    }

    pub fn serialize(err: impl std::fmt::Display) -> Self {
        Self::Serialize {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_reverse_count() {
        let err = ConvertError::InvalidReverseInput { count: 2 };
        assert_eq!(
            err.to_string(),
            "reverse mode accepts exactly 1 input JSON file, got 2"
        );
    }

    #[test]
    fn test_error_display_unsupported_extension() {
        let err = ConvertError::UnsupportedExtension {
            path: PathBuf::from("secrets.toml"),
        };
        assert_eq!(err.to_string(), "unsupported file extension: secrets.toml");
    }

    #[test]
    fn test_error_display_conflict() {
        let err = ConvertError::conflict("db.hosts.primary", "db.hosts");
        assert_eq!(
            err.to_string(),
            "conflicting structure for key 'db.hosts.primary' at 'db.hosts'"
        );
    }

    #[test]
    fn test_error_display_index_too_large() {
        let err = ConvertError::IndexTooLarge {
            key: "a[99999999]".into(),
            index: 99_999_999,
        };
        assert_eq!(
            err.to_string(),
            "list index 99999999 in key 'a[99999999]' exceeds the supported maximum"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;
        let err = ConvertError::io(
            "missing.env",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to access missing.env"));
    }
}
