//! Key-path codec for flat keys.
//!
//! A flat key is a list of `.`-separated segments. A segment may carry a
//! trailing array selector, `name[idx]`. Anything that does not cleanly match
//! `name[digits]` is a plain name and passes through unchanged.

use std::fmt;

/// One decoded segment of a flat key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub index: Option<usize>,
}

impl Segment {
    /// A plain mapping-key segment.
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    /// An array-element segment.
    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }

    /// Decode a raw segment, falling back to a plain name on malformed brackets.
    pub fn decode(raw: &str) -> Self {
        match parse_indexed(raw) {
            Some((name, index)) => Self::indexed(name, index),
            None => Self::key(raw),
        }
    }

    pub fn encode(&self) -> String {
        encode_segment(&self.name, self.index)
    }

    pub fn is_array_element(&self) -> bool {
        self.index.is_some()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => f.write_str(&self.name),
        }
    }
}

/// Produce `name` or `name[index]`.
pub fn encode_segment(name: &str, index: Option<usize>) -> String {
    match index {
        Some(index) => format!("{}[{}]", name, index),
        None => name.to_string(),
    }
}

/// Decode a segment into `(name, index, is_array_element)`.
///
/// Malformed selectors such as `item[x]` or `item[-1]` are not errors: the
/// whole segment comes back as the name with no index.
pub fn decode_segment(segment: &str) -> (String, Option<usize>, bool) {
    match parse_indexed(segment) {
        Some((name, index)) => (name.to_string(), Some(index), true),
        None => (segment.to_string(), None, false),
    }
}

/// Join a prefix and a child key with `.`, omitting the dot for an empty prefix.
pub fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Split a flat key into its decoded segments, left to right.
pub fn split_key(key: &str) -> Vec<Segment> {
    key.split('.').map(Segment::decode).collect()
}

fn parse_indexed(segment: &str) -> Option<(&str, usize)> {
    let body = segment.strip_suffix(']')?;
    let open = body.rfind('[')?;
    let digits = &body[open + 1..];
    // usize::from_str accepts a leading '+', which is not a valid selector here.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse::<usize>().ok()?;
    Some((&body[..open], index))
}
