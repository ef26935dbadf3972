//! Data values produced by the values pass, and key/value overlays

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::error::{CoreError, Result};

/// Data values tree with dotted-path access
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(pub JsonValue);

impl Values {
    /// Create empty values
    pub fn new() -> Self {
        Self(JsonValue::Object(serde_json::Map::new()))
    }

    /// Parse values from a YAML document
    ///
    /// An empty document yields empty values.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Ok(Self(value))
    }

    /// Parse a values dump, which must be a mapping
    pub fn mapping_from_yaml(yaml: &str) -> Result<Self> {
        let values = Self::from_yaml(yaml)?;
        match values.0 {
            JsonValue::Object(_) => Ok(values),
            JsonValue::Null => Ok(Self::new()),
            other => Err(CoreError::Values {
                message: format!("expected a mapping of data values, got {}", type_name(&other)),
            }),
        }
    }

    /// Get a value by dotted path
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        let parts: Vec<&str> = path.split('.').collect();
        get_nested(&self.0, &parts)
    }

    /// Read a list of strings; a missing key is an empty list
    pub fn string_list(&self, path: &str) -> Result<Vec<String>> {
        match self.get(path) {
            None | Some(JsonValue::Null) => Ok(Vec::new()),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(String::from).ok_or_else(|| CoreError::Values {
                        message: format!(
                            "'{}' must be a list of strings, found {}",
                            path,
                            type_name(item)
                        ),
                    })
                })
                .collect(),
            Some(other) => Err(CoreError::Values {
                message: format!(
                    "'{}' must be a list of strings, found {}",
                    path,
                    type_name(other)
                ),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            JsonValue::Object(map) => map.is_empty(),
            JsonValue::Null => true,
            _ => false,
        }
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.0)?)
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "a mapping",
    }
}

fn get_nested<'a>(value: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    let Some((key, remaining)) = path.split_first() else {
        return Some(value);
    };

    match value {
        JsonValue::Object(map) => map.get(*key).and_then(|v| get_nested(v, remaining)),
        _ => None,
    }
}

/// A single `key=value` data value injected directly into a ytt call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub key: String,
    pub value: String,
}

impl Overlay {
    /// Key used to pin the application image tag
    pub const IMAGE_TAG: &'static str = "app.image.tag";

    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn image_tag(tag: impl Into<String>) -> Self {
        Self::new(Self::IMAGE_TAG, tag)
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
