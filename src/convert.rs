//! Forward and reverse conversion pipelines.
//!
//! Forward: each `.env`/YAML input is parsed and flattened, then all inputs
//! are merged in order (last wins) and written as flat JSON.
//!
//! Reverse: a single flat JSON input is expanded and written as `.env`,
//! YAML or nested JSON, chosen by the output extension.
//!
//! `forward` and `reverse` work on in-memory text. `run` adds file I/O and
//! writes the output once, after every input has been processed.

use crate::config::Config;
use crate::error::{ConvertError, ConvertResult};
use crate::flatten::FlatMap;
use crate::formats::{self, Format, env, json, yaml};
use crate::merge::merge_into;
use crate::unflatten::unflatten;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Rendering knobs taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub pretty_json: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            pretty_json: config.json.pretty,
        }
    }
}

/// Which way to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `.env`/YAML inputs to flat JSON.
    Forward,
    /// Flat JSON to `.env`/YAML/JSON.
    Reverse,
}

/// A single conversion run.
#[derive(Debug, Clone)]
pub struct Request {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub direction: Direction,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub output: PathBuf,
    pub format: Format,
    /// Number of flat keys that went into the output.
    pub entries: usize,
}

/// An input file already read into memory.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: PathBuf,
    pub content: String,
}

impl Source {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn read(path: &Path) -> ConvertResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        Ok(Self::new(path, content))
    }

    /// Parse and flatten according to the file extension.
    pub fn to_flat(&self) -> ConvertResult<FlatMap> {
        let format = Format::require(&self.path)?;
        let flat = formats::parse_flat(format, &self.content, &self.path)?;
        debug!(
            path = %self.path.display(),
            format = %format,
            entries = flat.len(),
            "Parsed input"
        );
        Ok(flat)
    }
}

/// Merge the flattened form of every source, in order.
pub fn forward<'a>(sources: impl IntoIterator<Item = &'a Source>) -> ConvertResult<FlatMap> {
    let mut merged = FlatMap::new();
    for source in sources {
        merge_into(&mut merged, source.to_flat()?);
    }
    Ok(merged)
}

/// Render flat JSON input text as `format`.
pub fn reverse(source: &Source, format: Format, options: RenderOptions) -> ConvertResult<String> {
    let flat = json::parse_flat_json(&source.content, &source.path)?;
    render_reverse(flat, format, options)
}

fn render_reverse(flat: FlatMap, format: Format, options: RenderOptions) -> ConvertResult<String> {
    match format {
        Format::Env => Ok(env::render_env(&flat)),
        Format::Yaml => yaml::render_yaml(&unflatten(flat)?),
        Format::Json => json::render_json(&unflatten(flat)?, options.pretty_json),
    }
}

/// Validate a request, run it against the filesystem, and write the output.
pub fn run(request: &Request, options: RenderOptions) -> ConvertResult<Report> {
    if request.inputs.is_empty() {
        return Err(ConvertError::MissingInput);
    }

    match request.direction {
        Direction::Forward => run_forward(&request.inputs, &request.output, options),
        Direction::Reverse => {
            let [input] = request.inputs.as_slice() else {
                return Err(ConvertError::InvalidReverseInput {
                    count: request.inputs.len(),
                });
            };
            run_reverse(input, &request.output, options)
        }
    }
}

/// Merge every input into one flat JSON document at `output`.
pub fn run_forward(
    inputs: &[PathBuf],
    output: &Path,
    options: RenderOptions,
) -> ConvertResult<Report> {
    info!(inputs = inputs.len(), output = %output.display(), "Running forward conversion");

    if Format::from_path(output) != Some(Format::Json) {
        warn!(
            output = %output.display(),
            "Forward conversion always writes flat JSON, regardless of the output extension"
        );
    }

    let mut merged = FlatMap::new();
    for path in inputs {
        let source = Source::read(path)?;
        merge_into(&mut merged, source.to_flat()?);
    }

    let rendered = json::render_flat_json(&merged, options.pretty_json)?;
    write_output(output, &rendered)?;

    Ok(Report {
        output: output.to_path_buf(),
        format: Format::Json,
        entries: merged.len(),
    })
}

/// Expand a flat JSON file into the format named by `output`'s extension.
pub fn run_reverse(input: &Path, output: &Path, options: RenderOptions) -> ConvertResult<Report> {
    info!(input = %input.display(), output = %output.display(), "Running reverse conversion");

    let format = Format::require(output)?;
    let source = Source::read(input)?;
    let flat = json::parse_flat_json(&source.content, &source.path)?;
    let entries = flat.len();
    debug!(entries, format = %format, "Expanding flat JSON");

    let rendered = render_reverse(flat, format, options)?;
    write_output(output, &rendered)?;

    Ok(Report {
        output: output.to_path_buf(),
        format,
        entries,
    })
}

fn write_output(path: &Path, content: &str) -> ConvertResult<()> {
    std::fs::write(path, content).map_err(|e| ConvertError::io(path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(inputs: &[&str], direction: Direction) -> Request {
        Request {
            inputs: inputs.iter().map(PathBuf::from).collect(),
            output: PathBuf::from("out.json"),
            direction,
        }
    }

    #[test]
    fn test_forward_merges_in_order() {
        let sources = [
            Source::new("base.yaml", "db:\n  host: localhost\n  port: 5432\n"),
            Source::new("prod.env", "db.host=db.internal\nTOKEN=\"abc\"\n"),
        ];
        let flat = forward(&sources).unwrap();
        assert_eq!(
            serde_json::to_value(flat).unwrap(),
            json!({"db.host": "db.internal", "db.port": 5432, "TOKEN": "abc"})
        );
    }

    #[test]
    fn test_forward_rejects_unknown_extension() {
        let sources = [Source::new("app.toml", "a = 1")];
        assert!(matches!(
            forward(&sources),
            Err(ConvertError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn test_reverse_to_env_is_sorted() {
        let source = Source::new("vault.json", r#"{"b": "2", "a": "1"}"#);
        let out = reverse(&source, Format::Env, RenderOptions::default()).unwrap();
        assert_eq!(out, "a=\"1\"\nb=\"2\"\n");
    }

    #[test]
    fn test_reverse_to_yaml_nests() {
        let source = Source::new(
            "vault.json",
            r#"{"app.name": "demo", "app.hosts[0]": "a", "app.hosts[1]": "b"}"#,
        );
        let out = reverse(&source, Format::Yaml, RenderOptions::default()).unwrap();
        let back: serde_json::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(back, json!({"app": {"hosts": ["a", "b"], "name": "demo"}}));
    }

    #[test]
    fn test_reverse_to_json_nests() {
        let source = Source::new("vault.json", r#"{"a.b": 1}"#);
        let out = reverse(&source, Format::Json, RenderOptions { pretty_json: false }).unwrap();
        assert_eq!(out, "{\"a\":{\"b\":1}}\n");
    }

    #[test]
    fn test_reverse_keeps_container_values_as_leaves() {
        let source = Source::new("vault.json", r#"{"a": {"b": "x"}, "c": "y"}"#);
        let out = reverse(&source, Format::Env, RenderOptions::default()).unwrap();
        assert_eq!(out, "a=\"{\"b\":\"x\"}\"\nc=\"y\"\n");
    }

    #[test]
    fn test_reverse_keeps_raw_list_leaves() {
        let source = Source::new("vault.json", r#"{"matrix[0]": [1, 2], "matrix[1]": [3]}"#);
        let out = reverse(&source, Format::Json, RenderOptions { pretty_json: false }).unwrap();
        assert_eq!(out, "{\"matrix\":[[1,2],[3]]}\n");
    }

    #[test]
    fn test_reverse_rejects_aliased_container_and_key() {
        let source = Source::new("vault.json", r#"{"a": {"b": 1}, "a.b": 2}"#);
        assert!(matches!(
            reverse(&source, Format::Yaml, RenderOptions::default()),
            Err(ConvertError::PathConflict { .. })
        ));
    }

    #[test]
    fn test_reverse_reports_conflicts() {
        let source = Source::new("vault.json", r#"{"a": "x", "a.b": "y"}"#);
        assert!(matches!(
            reverse(&source, Format::Yaml, RenderOptions::default()),
            Err(ConvertError::PathConflict { .. })
        ));
    }

    #[test]
    fn test_run_requires_input() {
        let err = run(&request(&[], Direction::Forward), RenderOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingInput));
    }

    #[test]
    fn test_run_reverse_requires_exactly_one_input() {
        let err = run(
            &request(&["a.json", "b.json"], Direction::Reverse),
            RenderOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidReverseInput { count: 2 }));
    }

    #[test]
    fn test_render_options_from_config() {
        let mut config = Config::default();
        assert!(RenderOptions::from(&config).pretty_json);
        config.json.pretty = false;
        assert!(!RenderOptions::from(&config).pretty_json);
    }
}
