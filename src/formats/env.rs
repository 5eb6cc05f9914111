//! `.env` files: `KEY=VALUE` lines.

use crate::flatten::FlatMap;
use serde_json::Value;
use tracing::warn;

const QUOTES: &[char] = &['"', '\''];

/// Parse `.env` text into a flat mapping of string values.
///
/// Blank lines and `#` comments are skipped. The line is split on the first
/// `=`, both sides are trimmed, and surrounding quote characters are stripped
/// from the value. An `export ` prefix on the key is dropped. Lines without
/// `=` are ignored. A repeated key keeps its last value.
pub fn parse_env(content: &str) -> FlatMap {
    let mut result = FlatMap::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            warn!(line = lineno + 1, "Ignoring .env line without '='");
            continue;
        };

        let key = key.trim();
        let key = key.strip_prefix("export ").map_or(key, str::trim_start);
        let value = value.trim().trim_matches(QUOTES);
        result.insert(key.to_string(), Value::String(value.to_string()));
    }

    result
}

/// Render a flat mapping as `KEY="value"` lines sorted by key.
pub fn render_env(flat: &FlatMap) -> String {
    let mut out = String::new();
    for (key, value) in flat {
        out.push_str(&format!("{}=\"{}\"\n", key, env_value(value)));
    }
    out
}

fn env_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        // Anything else is written as its JSON text.
        other => other.to_string(),
    }
}
