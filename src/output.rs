//! JSON output for document records.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::DocumentRecord;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 2-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a record to JSON.
pub fn to_json(record: &DocumentRecord, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(record),
        JsonFormat::Compact => serde_json::to_string(record),
    };

    result.map_err(|e| Error::Output(format!("JSON serialization error: {}", e)))
}

/// Serialize a record and write it to a file, UTF-8 encoded.
pub fn write_json<P: AsRef<Path>>(
    record: &DocumentRecord,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let json = to_json(record, format)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_record() -> DocumentRecord {
        DocumentRecord::from_value(serde_json::json!({
            "name": "Alice",
            "date": null,
            "tables": []
        }))
        .unwrap()
    }

    #[test]
    fn test_to_json_pretty_uses_two_space_indent() {
        let json = to_json(&sample_record(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\n  \"name\": \"Alice\""));
        assert!(json.contains("\"date\": null"));
    }

    #[test]
    fn test_to_json_compact_has_no_newlines() {
        let json = to_json(&sample_record(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_json_round_trips() {
        let record = sample_record();
        let json = to_json(&record, JsonFormat::Pretty).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(DocumentRecord::from_value(value).unwrap(), record);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        write_json(&sample_record(), &path, JsonFormat::Pretty).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with('{'));
        assert!(written.contains("Alice"));
    }
}
