//! # Route Templates
//!
//! A [`PathTemplate`] is compiled once, when the validator is built, and
//! matched against concrete request paths afterwards. Matching is
//! segment-wise and anchored at both ends: `/users/:id` matches
//! `/users/42` but neither `/users` nor `/users/42/posts`.
//!
//! ## Syntax
//!
//! - literal segments match exactly (case-sensitive);
//! - `:name` or `{name}` captures one non-empty segment;
//! - a single trailing slash is ignored on both template and path;
//! - captured segments are percent-decoded (`a%20b` captures `a b`).
//!
//! Parameter names are restricted to ASCII letters, digits and `_`. No
//! regular expression is ever built from a template, so characters such as
//! `.` or `(` in literal segments carry no special meaning.

use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile `template`.
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        if !template.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut segments = Vec::new();
        for part in split_path(template) {
            if part.is_empty() {
                return Err(invalid("empty path segment"));
            }
            let param = part
                .strip_prefix(':')
                .or_else(|| part.strip_prefix('{').and_then(|p| p.strip_suffix('}')));
            match param {
                Some(name) => {
                    if name.is_empty()
                        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        return Err(invalid(&format!("invalid parameter name \"{name}\"")));
                    }
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(existing) if existing == name))
                    {
                        return Err(invalid(&format!("duplicate parameter \"{name}\"")));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => {
                    if part.contains(['{', '}']) {
                        return Err(invalid(&format!("malformed placeholder \"{part}\"")));
                    }
                    segments.push(Segment::Literal(part.to_string()));
                }
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the captured parameters, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match `path` against the template. On success returns the captured
    /// parameters as percent-decoded JSON strings. Byte sequences that do not
    /// decode to UTF-8 are replaced with U+FFFD.
    pub fn matches(&self, path: &str) -> Option<Map<String, Value>> {
        if !path.starts_with('/') {
            return None;
        }
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Map::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.insert(name.clone(), Value::String(decode_segment(part)));
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn decode_segment(part: &str) -> String {
    match urlencoding::decode(part) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => match String::from_utf8_lossy(&urlencoding::decode_binary(part.as_bytes())) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => text,
        },
    }
}

/// Split an absolute path into segments, ignoring one trailing slash.
/// The root path `/` has no segments.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.split('/').filter({
        let root = trimmed.is_empty();
        move |_| !root
    })
}
