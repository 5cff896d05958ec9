//! Final record assembly.

use serde_json::Value;

use crate::model::{
    DocumentRecord, HeaderFields, StorySection, StructuredTable, KEY_CATEGORIES, KEY_DATE,
    KEY_FLOW, KEY_NAME, KEY_STORY, KEY_TABLES,
};

/// Table-merge key convention for the assembled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    /// A single `"tables"` entry holding the ordered table array
    #[default]
    Tables,
    /// Each table merged as a `"Categories"` entry (later tables overwrite)
    Categories,
}

/// Merge the rule-based extraction results into a [`DocumentRecord`].
///
/// Merge order is header → tables → flow → story; the key sets are
/// disjoint by construction, so later steps never overwrite earlier ones.
/// Header keys are always present (`null` when absent); flow and story
/// keys are omitted entirely when their section was not found.
pub fn assemble(
    header: &HeaderFields,
    tables: &[StructuredTable],
    flow: Option<&[String]>,
    story: Option<&StorySection>,
    style: TableStyle,
) -> DocumentRecord {
    let mut record = DocumentRecord::new();

    record.insert(
        KEY_NAME,
        header
            .name
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null),
    );
    record.insert(
        KEY_DATE,
        header
            .date
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null),
    );

    match style {
        TableStyle::Tables => {
            record.insert(
                KEY_TABLES,
                serde_json::to_value(tables).unwrap_or(Value::Array(vec![])),
            );
        }
        TableStyle::Categories => {
            for table in tables {
                record.insert(
                    KEY_CATEGORIES,
                    serde_json::to_value(table).unwrap_or(Value::Array(vec![])),
                );
            }
        }
    }

    if let Some(steps) = flow {
        record.insert(
            KEY_FLOW,
            Value::Array(steps.iter().cloned().map(Value::String).collect()),
        );
    }

    if let Some(story) = story {
        record.insert(
            KEY_STORY,
            serde_json::to_value(story).unwrap_or(Value::Null),
        );
    }

    record
}
