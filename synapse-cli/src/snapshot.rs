//! Complete record set of one project, ready to be built into a graph

use anyhow::{Context, Result};
use std::path::Path;

use crate::entity::RawRecord;
use crate::graph::{DuplicatePolicy, EntityGraph, EntityGraphBuilder, GraphError};
use crate::loader::{self, RecordFormat};

#[derive(Debug, Clone)]
pub struct ProjectSnapshot {
    pub project_id: String,
    pub project_name: Option<String>,
    /// Id of the container the project lives in; never part of `records`
    pub parent_id: String,
    pub records: Vec<RawRecord>,
}

impl ProjectSnapshot {
    /// Snapshot from a file exported earlier
    ///
    /// Files carry no project header, so the project id is taken from the
    /// file name (`syn123.csv.gz` -> `syn123`).
    pub fn from_file(
        path: &Path,
        parent_id: impl Into<String>,
        format: Option<RecordFormat>,
    ) -> Result<Self> {
        let records = loader::load_records(path, format)?;
        let project_id = loader::snapshot_stem(path)
            .with_context(|| format!("Invalid snapshot file name: {}", path.display()))?;

        Ok(ProjectSnapshot {
            project_id,
            project_name: None,
            parent_id: parent_id.into(),
            records,
        })
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &str {
        self.project_name.as_deref().unwrap_or(&self.project_id)
    }

    pub fn build_graph(&self, policy: DuplicatePolicy) -> Result<EntityGraph, GraphError> {
        EntityGraphBuilder::new(self.parent_id.as_str())
            .with_duplicate_policy(policy)
            .build(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_and_build() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syn123.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"entity.id": "syn123", "entity.parentId": "syn1", "entity.name": "VEO"}},
                {{"entity.id": "syn124", "entity.parentId": "syn123"}}]"#
        )
        .unwrap();

        let snapshot = ProjectSnapshot::from_file(&path, "syn1", None).unwrap();
        let graph = snapshot.build_graph(DuplicatePolicy::Reject).unwrap();

        assert_eq!(snapshot.project_id, "syn123");
        assert_eq!(snapshot.label(), "syn123");
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.root().map(|n| n.id()), Some("syn1"));
        assert_eq!(graph.parent("syn124").map(|n| n.id()), Some("syn123"));
    }

    #[test]
    fn test_from_gzipped_csv_takes_id_before_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syn200.csv.gz");
        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        write!(encoder, "entity.id,entity.parentId\nsyn201,syn1\n").unwrap();
        encoder.finish().unwrap();

        let snapshot = ProjectSnapshot::from_file(&path, "syn1", None).unwrap();
        let graph = snapshot.build_graph(DuplicatePolicy::Reject).unwrap();

        assert_eq!(snapshot.project_id, "syn200");
        assert_eq!(graph.child_ids("syn1").collect::<Vec<_>>(), vec!["syn201"]);
    }
}
