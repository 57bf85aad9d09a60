//! Case-insensitive HTTP header collection.
//!
//! Header parameters arrive as JSON text (`{"X-Api-Key": "abc"}`); they are
//! decoded once into [`Headers`] so later stages never deal with raw JSON.
//! Response headers reported by the transport use the same type.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::ConfigError;

/// Which header parameter a decoding error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSource {
    Download,
    Upload,
}

impl fmt::Display for HeaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderSource::Download => write!(f, "download headers"),
            HeaderSource::Upload => write!(f, "upload headers"),
        }
    }
}

/// Ordered `(name, value)` pairs. Lookups ignore ASCII case; the first-seen
/// spelling of a name is kept when a value is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets `name` to `value`, replacing any existing entry with the same name
    /// in any case.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(idx) => {
                self.entries[idx].1 = value;
                let mut i = idx + 1;
                while i < self.entries.len() {
                    if self.entries[i].0.eq_ignore_ascii_case(&name) {
                        self.entries.remove(i);
                    } else {
                        i += 1;
                    }
                }
            }
            None => self.entries.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes a header parameter given as JSON text. Blank text means no headers.
    pub fn from_json_text(text: &str, which: HeaderSource) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(text)
            .map_err(|source| ConfigError::HeaderJson { which, source })?;
        Self::from_json_value(&value, which)
    }

    /// Converts an already-decoded JSON value. Numbers and booleans are kept in
    /// their textual form; anything else that is not a string is rejected, as
    /// is any name or value containing a line break.
    pub fn from_json_value(value: &Value, which: HeaderSource) -> Result<Self, ConfigError> {
        let object = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(ConfigError::HeaderShape {
                    which,
                    detail: format!("expected an object, got {}", json_kind(other)),
                })
            }
        };

        let mut headers = Self::new();
        for (name, value) in object {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ConfigError::HeaderShape {
                        which,
                        detail: format!("header {:?} is {}", name, json_kind(other)),
                    })
                }
            };
            if has_line_break(name) || has_line_break(&value) {
                return Err(ConfigError::HeaderShape {
                    which,
                    detail: format!("header {:?} contains a line break", name),
                });
            }
            headers.insert(name.as_str(), value);
        }
        Ok(headers)
    }

    /// Builds headers from raw response header lines (`Name: value`). Status
    /// lines and lines without a colon are skipped.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut headers = Self::new();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with("HTTP/") {
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim(), value.trim());
            }
        }
        headers
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
