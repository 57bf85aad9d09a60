//! Parameter resolution: the host's per-name, per-item accessor.
//!
//! A host (CLI flags, a batch file, a workflow engine) supplies parameter
//! values by name for a given item index. The typed accessors here apply the
//! stated default when a value is absent and reject values of the wrong JSON
//! type with a [`ConfigError`].

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Parameter names as the host spells them.
pub mod names {
    pub const DOWNLOAD_URL: &str = "downloadUrl";
    pub const UPLOAD_URL: &str = "uploadUrl";
    pub const CONTENT_LENGTH: &str = "contentLength";
    pub const METHOD: &str = "method";
    pub const DOWNLOAD_HEADERS: &str = "downloadHeaders";
    pub const UPLOAD_HEADERS: &str = "uploadHeaders";
    pub const THROW_ON_ERROR: &str = "throwOnError";
}

/// Supplies raw parameter values for one item of an invocation.
pub trait ParamSource {
    /// Raw value of `name` for item `item_index`, or `None` when not set.
    fn param(&self, name: &str, item_index: usize) -> Option<Value>;

    /// String parameter; `default` when absent or null. Numbers are accepted
    /// in their textual form.
    fn string(
        &self,
        name: &'static str,
        item_index: usize,
        default: &str,
    ) -> Result<String, ConfigError> {
        match self.param(name, item_index) {
            None | Some(Value::Null) => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(_) => Err(ConfigError::WrongType {
                name,
                expected: "a string",
            }),
        }
    }

    /// Boolean parameter; `"true"` / `"false"` strings are accepted.
    fn boolean(
        &self,
        name: &'static str,
        item_index: usize,
        default: bool,
    ) -> Result<bool, ConfigError> {
        match self.param(name, item_index) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "" => Ok(default),
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(ConfigError::WrongType {
                    name,
                    expected: "a boolean",
                }),
            },
            Some(_) => Err(ConfigError::WrongType {
                name,
                expected: "a boolean",
            }),
        }
    }

    /// Optional byte count given as a JSON number or a decimal string.
    /// Empty strings and null mean "not supplied".
    fn byte_count(&self, name: &'static str, item_index: usize) -> Result<Option<u64>, ConfigError> {
        match self.param(name, item_index) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| ConfigError::InvalidContentLength(n.to_string())),
            Some(Value::String(s)) => {
                let t = s.trim();
                if t.is_empty() {
                    return Ok(None);
                }
                t.parse::<u64>()
                    .map(Some)
                    .map_err(|_| ConfigError::InvalidContentLength(s.clone()))
            }
            Some(_) => Err(ConfigError::WrongType {
                name,
                expected: "a number or numeric string",
            }),
        }
    }
}

/// A single item's parameters; the item index is ignored.
impl ParamSource for Map<String, Value> {
    fn param(&self, name: &str, _item_index: usize) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// A batch of items; the item index selects the parameter object.
impl ParamSource for [Map<String, Value>] {
    fn param(&self, name: &str, item_index: usize) -> Option<Value> {
        self.get(item_index)?.get(name).cloned()
    }
}
