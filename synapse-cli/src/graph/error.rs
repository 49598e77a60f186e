//! Failure taxonomy for graph construction
//!
//! Every variant is fatal for the build call that produced it: no partial
//! graph is ever returned alongside one of these.

use thiserror::Error;

/// Broad category of a [`GraphError`], for callers that branch on the kind
/// rather than the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A record has a key outside the `entity.` namespace, or a required
    /// field is missing or mistyped
    SchemaViolation,
    /// A parent id resolves neither to a record nor to the known parent
    DanglingReference,
    /// The parent links form a cycle
    CyclicGraph,
    /// Two records share the same id
    DuplicateId,
}

impl ErrorKind {
    /// Get display label
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::SchemaViolation => "schema violation",
            ErrorKind::DanglingReference => "dangling reference",
            ErrorKind::CyclicGraph => "cyclic graph",
            ErrorKind::DuplicateId => "duplicate id",
        }
    }
}

/// Error raised while normalizing records or linking them into a graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("schema violation on '{key}': {reason}")]
    SchemaViolation { key: String, reason: String },

    #[error(
        "entity '{id}' references parent '{parent_id}', which is neither in the result set nor the known parent '{known_parent_id}'"
    )]
    DanglingReference {
        id: String,
        parent_id: String,
        known_parent_id: String,
    },

    #[error("cyclic parent relationship: {}", .path.join(" -> "))]
    CyclicGraph {
        /// Ids along the cycle; the first id is repeated at the end
        path: Vec<String>,
    },

    #[error("duplicate entity id '{id}' in result set")]
    DuplicateId { id: String },
}

impl GraphError {
    pub(crate) fn schema(key: impl Into<String>, reason: impl Into<String>) -> Self {
        GraphError::SchemaViolation {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::SchemaViolation { .. } => ErrorKind::SchemaViolation,
            GraphError::DanglingReference { .. } => ErrorKind::DanglingReference,
            GraphError::CyclicGraph { .. } => ErrorKind::CyclicGraph,
            GraphError::DuplicateId { .. } => ErrorKind::DuplicateId,
        }
    }
}
