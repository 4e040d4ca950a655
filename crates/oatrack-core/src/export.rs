//! One-way JSON export of the working set.

use crate::error::Result;
use crate::record::Record;

/// File name the export is offered under.
pub const EXPORT_FILE_NAME: &str = "answers.json";

/// Serializes `records` as pretty-printed JSON (two-space indent).
pub fn export_snapshot(records: &[Record]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_is_pretty_camel_case_array() {
        let records = vec![Record {
            id: "abc".to_string(),
            company: "Acme".to_string(),
            date: "2024-01-15".to_string(),
            question: "fn main() {\n}".to_string(),
            answer: "A".to_string(),
            favorite: true,
            created_at: "2024-01-15T10:00:00+00:00".to_string(),
        }];

        let bytes = export_snapshot(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"createdAt\": \"2024-01-15T10:00:00+00:00\""));

        let parsed: Vec<Record> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_export_empty_working_set() {
        let bytes = export_snapshot(&[]).unwrap();
        assert_eq!(bytes, b"[]");
    }
}
