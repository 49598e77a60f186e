//! CSV snapshots
//!
//! The header row holds the prefixed keys (`entity.id`, `entity.parentId`, ...).
//! Every cell is read as a string; empty cells are left out of the record so
//! that an absent value and a blank one behave the same.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::entity::RawRecord;

pub fn parse_records(content: &str) -> Result<Vec<RawRecord>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    if headers.is_empty() {
        anyhow::bail!("CSV snapshot has no header row");
    }

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row = row.with_context(|| format!("Failed to read CSV row on line {}", idx + 2))?;

        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(key, cell)| (key.to_string(), Value::String(cell.to_string())))
            .collect();
        records.push(record);
    }

    Ok(records)
}
