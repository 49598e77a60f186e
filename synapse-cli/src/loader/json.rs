//! JSON snapshots

use anyhow::{Context, Result};
use serde_json::Value;

use crate::entity::RawRecord;

/// Parse a JSON snapshot
///
/// Accepts a bare array of records, or a query response object with a
/// `results` array.
pub fn parse_records(content: &str) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(content).context("Snapshot is not valid JSON")?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(items)) => items,
            Some(_) => anyhow::bail!("'results' must be an array of records"),
            None => anyhow::bail!("Expected an array of records or an object with 'results'"),
        },
        _ => anyhow::bail!("Expected an array of records or an object with 'results'"),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(record) => Ok(record),
            other => anyhow::bail!("Record {} is not an object: {}", idx, other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let records = parse_records(r#"[{"entity.id": "syn2", "entity.parentId": "syn1"}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["entity.id"], "syn2");
    }

    #[test]
    fn test_query_response_shape() {
        let content = r#"{
            "totalNumberOfResults": 2,
            "results": [
                {"entity.id": "syn2", "entity.parentId": "syn1"},
                {"entity.id": "syn3", "entity.parentId": "syn2", "entity.name": "reads"}
            ]
        }"#;

        let records = parse_records(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["entity.name"], "reads");
    }

    #[test]
    fn test_non_object_record_is_an_error() {
        let err = parse_records(r#"[{"entity.id": "syn2"}, 7]"#).unwrap_err();
        assert!(err.to_string().contains("Record 1"));
    }

    #[test]
    fn test_object_without_results_is_an_error() {
        assert!(parse_records(r#"{"rows": []}"#).is_err());
    }
}
