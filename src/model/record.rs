//! The assembled document record and its section types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level key for the extracted name.
pub const KEY_NAME: &str = "name";
/// Top-level key for the extracted date.
pub const KEY_DATE: &str = "date";
/// Top-level key for the structured-table array.
pub const KEY_TABLES: &str = "tables";
/// Top-level key for per-grid table entries in the wrapped merge style.
pub const KEY_CATEGORIES: &str = "Categories";
/// Top-level key for the flow step list.
pub const KEY_FLOW: &str = "Mapping the Flow";
/// Top-level key for the narrative story section.
pub const KEY_STORY: &str = "Story";

/// Name and date recovered from the worksheet header.
///
/// Absence is explicit: a missing field serializes as JSON `null`, never as
/// an empty string, and the key is always present in the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderFields {
    /// First word following the line-initial "Name" marker
    pub name: Option<String>,
    /// Date token (two-digit/two-digit/four-digit) following the "Date" marker
    pub date: Option<String>,
}

/// The narrative story section: a message line and bullet actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorySection {
    /// First non-empty line after the "Story" marker
    pub message: String,
    /// Subsequent non-empty lines with bullet glyphs stripped
    pub actions: Vec<String>,
}

/// The final assembled output: an ordered JSON mapping.
///
/// Created once per pipeline invocation and immutable once returned. When
/// an external structuring provider succeeds, its JSON object becomes the
/// record verbatim; otherwise the rule-based assembler fills it in merge
/// order header → tables → flow → story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRecord {
    fields: Map<String, Value>,
}

impl DocumentRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON object produced by an external structuring service.
    ///
    /// Returns `None` if the value is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Insert a top-level entry.
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Get a top-level entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Check whether a top-level key is present at all.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The extracted name, if one was found.
    pub fn name(&self) -> Option<&str> {
        self.fields.get(KEY_NAME).and_then(Value::as_str)
    }

    /// The extracted date, if one was found.
    pub fn date(&self) -> Option<&str> {
        self.fields.get(KEY_DATE).and_then(Value::as_str)
    }

    /// Iterate top-level keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Consume the record, returning the underlying JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
