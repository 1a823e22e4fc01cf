use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

use serde_json::{Map, Value};

use crate::{LoadError, SaveError};

/// The flat key-value form of an object: field name to encoded field value.
///
/// Backed by a `serde_json` object whose values are always strings.
/// Keys keep insertion order, so a document built by
/// [`Serializable::to_document`](crate::Serializable::to_document) writes
/// its fields in registration order and the output is byte-stable.
///
/// # Examples
///
/// ```
/// use fk_serial::Document;
///
/// let mut doc = Document::new();
/// doc.insert("Name", "Ada");
/// doc.insert("Age", "36");
/// assert_eq!(doc.to_json().unwrap(), r#"{"Name":"Ada","Age":"36"}"#);
///
/// let parsed = Document::parse(r#"{"Age":"36","Name":"Ada"}"#).unwrap();
/// assert_eq!(parsed.get("Name"), Some("Ada"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Document {
    entries: Map<String, Value>,
}

impl Document {
    /// Creates an empty document.
    #[inline]
    pub fn new() -> Self {
        Self { entries: Map::new() }
    }

    /// Parses `text` as a JSON object whose values are all strings.
    ///
    /// The whole input is validated here, so a caller can rely on a parsed
    /// document before touching any state.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| LoadError::malformed(err.to_string()))?;

        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                return Err(LoadError::malformed(format!(
                    "expected a JSON object, found {}",
                    json_type_name(&other),
                )));
            }
        };

        if let Some((key, value)) = entries.iter().find(|(_, value)| !value.is_string()) {
            return Err(LoadError::malformed(format!(
                "value of `{key}` must be a string, found {}",
                json_type_name(value),
            )));
        }

        Ok(Self { entries })
    }

    /// Sets `name` to `text`, replacing any previous value.
    ///
    /// A new key is appended; an existing key keeps its position.
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(name.into(), Value::String(text.into()));
    }

    /// The encoded value stored under `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(Value::as_str)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in document order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| Some((key.as_str(), value.as_str()?)))
    }

    /// Compact JSON text.
    pub fn to_json(&self) -> Result<String, SaveError> {
        serde_json::to_string(&self.entries).map_err(|err| SaveError::Encode {
            reason: err.to_string(),
        })
    }

    /// Indented JSON text. Nested documents stay embedded strings.
    pub fn to_json_pretty(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(&self.entries).map_err(|err| SaveError::Encode {
            reason: err.to_string(),
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (key, value) in iter {
            doc.insert(key, value);
        }
        doc
    }
}

// -----------------------------------------------------------------------------
// Tests
