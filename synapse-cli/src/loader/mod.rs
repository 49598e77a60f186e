//! Snapshot loaders
//!
//! Read a previously exported project query result from disk, as either JSON
//! (a bare array of records or the full query response) or CSV (one column
//! per prefixed key). Either may be gzip-compressed; compression is detected
//! from the content, not the file name.

pub mod csv;
pub mod json;

use anyhow::{Context, Result};
use clap::ValueEnum;
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::entity::RawRecord;

/// On-disk snapshot format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    /// Guess the format from the file extension, defaulting to JSON
    ///
    /// A trailing `.gz` is skipped, so `dump.csv.gz` is CSV.
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.to_ascii_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);

        if name.ends_with(".csv") {
            RecordFormat::Csv
        } else {
            RecordFormat::Json
        }
    }
}

/// File name without the format extension and any `.gz` (`syn123.csv.gz` -> `syn123`)
pub fn snapshot_stem(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let name = name.strip_suffix(".gz").unwrap_or(name);
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Read a file as text, decompressing it first if it starts with the gzip magic bytes
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

    if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut content = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut content)
            .with_context(|| format!("Failed to decompress snapshot file: {}", path.display()))?;
        log::debug!("Decompressed gzip snapshot {}", path.display());
        Ok(content)
    } else {
        String::from_utf8(bytes)
            .with_context(|| format!("Snapshot file is not valid UTF-8: {}", path.display()))
    }
}

/// Load every record from a snapshot file
///
/// The format is detected from the extension unless given explicitly.
pub fn load_records(path: &Path, format: Option<RecordFormat>) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        anyhow::bail!("Snapshot file does not exist: {}", path.display());
    }

    let format = format.unwrap_or_else(|| RecordFormat::detect(path));
    let content = read_text(path)?;

    let records = match format {
        RecordFormat::Json => json::parse_records(&content),
        RecordFormat::Csv => csv::parse_records(&content),
    }
    .with_context(|| format!("Failed to load records from: {}", path.display()))?;

    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_format() {
        assert_eq!(RecordFormat::detect(Path::new("dump.CSV")), RecordFormat::Csv);
        assert_eq!(RecordFormat::detect(Path::new("dump.json")), RecordFormat::Json);
        assert_eq!(RecordFormat::detect(Path::new("dump")), RecordFormat::Json);
        assert_eq!(RecordFormat::detect(Path::new("dump.csv.gz")), RecordFormat::Csv);
        assert_eq!(RecordFormat::detect(Path::new("dump.json.GZ")), RecordFormat::Json);
    }

    #[test]
    fn test_snapshot_stem_skips_extensions() {
        assert_eq!(snapshot_stem(Path::new("/tmp/syn123.csv.gz")), Some("syn123".to_string()));
        assert_eq!(snapshot_stem(Path::new("syn123.json")), Some("syn123".to_string()));
        assert_eq!(snapshot_stem(Path::new("syn123")), Some("syn123".to_string()));
    }

    #[test]
    fn test_load_gzipped_csv_file() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syn9.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"entity.id,entity.parentId\nsyn2,syn1\n").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let records = load_records(&path, None).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["entity.id"], "syn2");
        assert_eq!(records[0]["entity.parentId"], "syn1");
    }

    #[test]
    fn test_gzip_detected_by_content_not_name() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.json");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"[{"entity.id": "syn2", "entity.parentId": "syn1"}]"#).unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let records = load_records(&path, Some(RecordFormat::Json)).unwrap();

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "entity.id,entity.parentId").unwrap();
        writeln!(file, "syn2,syn1").unwrap();

        let records = load_records(file.path(), None).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["entity.parentId"], "syn1");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("absent.json"), None).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
