//! CLI definition for vaultboy
//!
//! This module defines the CLI structure using clap's derive macros.
//! Go-style single-dash long flags (`-reverse`) are accepted by rewriting
//! them with [`normalize_args`] before parsing.

use crate::convert::{Direction, Request};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flags that may be spelled with a single dash.
const SINGLE_DASH_LONG: &[&str] = &["reverse", "input", "output", "config", "verbose", "log"];

/// Convert .env/YAML files to flat Vault JSON, or flat Vault JSON back to .env/YAML
#[derive(Parser, Debug)]
#[command(name = "vaultboy", author, version, about, long_about = None)]
pub struct Cli {
    /// Input file(s): .env/.yaml, or a single Vault .json in reverse mode
    #[arg(short, long = "input", value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Output file (.json, .env, .yaml) [default: output.json]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Reverse mode: Vault JSON to .env/.yaml
    #[arg(short, long)]
    pub reverse: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: LogTarget,
}

impl Cli {
    pub fn direction(&self) -> Direction {
        if self.reverse {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    /// Build a conversion request, using `default_output` when `-o` was not given.
    pub fn request(&self, default_output: PathBuf) -> Request {
        Request {
            inputs: self.inputs.clone(),
            output: self.output.clone().unwrap_or(default_output),
            direction: self.direction(),
        }
    }
}

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl std::str::FromStr for LogTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "off" => Ok(LogTarget::Off),
            "1" | "stdout" => Ok(LogTarget::Stdout),
            "2" | "stderr" => Ok(LogTarget::Stderr),
            "" => Err("log target must not be empty".to_string()),
            filename => Ok(LogTarget::File(PathBuf::from(filename))),
        }
    }
}

/// Rewrite `-reverse`, `-input`, ... (and `-input=x`) to their `--` forms.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if !rest.starts_with('-') && SINGLE_DASH_LONG.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}
