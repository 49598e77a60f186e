//! Entity graph construction
//!
//! Turns the flat record list of a project query into an [`EntityGraph`]:
//! - Normalize every record into an [`EntityNode`] keyed by id
//! - Link each node to its parent
//! - Synthesize a root for the project container, which the query never returns
//! - Reject the whole build if the parent links contain a cycle

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EntityGraph, GraphError};
use crate::entity::{ENTITY_PREFIX, EntityNode, PARENT_ID_FIELD, RawRecord};

/// What to do when two records carry the same id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail the build with [`GraphError::DuplicateId`] (default)
    #[default]
    Reject,
    /// Keep the record that comes later in iteration order
    LastWriteWins,
}

impl DuplicatePolicy {
    /// Get display label
    pub fn label(&self) -> &'static str {
        match self {
            DuplicatePolicy::Reject => "reject",
            DuplicatePolicy::LastWriteWins => "last-write-wins",
        }
    }
}

/// Builds validated entity graphs for one project container
#[derive(Debug, Clone)]
pub struct EntityGraphBuilder {
    known_parent_id: String,
    duplicate_policy: DuplicatePolicy,
}

impl EntityGraphBuilder {
    /// `known_parent_id` is the id of the container the project lives in,
    /// resolved separately from the record query
    pub fn new(known_parent_id: impl Into<String>) -> Self {
        Self {
            known_parent_id: known_parent_id.into(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn known_parent_id(&self) -> &str {
        &self.known_parent_id
    }

    /// Build and validate the graph
    ///
    /// All-or-nothing: any schema violation, dangling parent, duplicate id
    /// (under [`DuplicatePolicy::Reject`]) or cycle fails the whole call.
    pub fn build<'a, I>(&self, records: I) -> Result<EntityGraph, GraphError>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let nodes = self.normalize(records)?;

        // Resolve every parent link before touching the graph
        let mut edges = Vec::with_capacity(nodes.len());
        let mut needs_root = false;
        for node in nodes.values() {
            let parent_id = node.parent_id().ok_or_else(|| {
                GraphError::schema(
                    format!("{}{}", ENTITY_PREFIX, PARENT_ID_FIELD),
                    format!("required field is missing on entity '{}'", node.id()),
                )
            })?;

            if nodes.contains_key(parent_id) {
                edges.push((parent_id.to_string(), node.id().to_string()));
            } else if parent_id == self.known_parent_id {
                needs_root = true;
                edges.push((parent_id.to_string(), node.id().to_string()));
            } else {
                return Err(GraphError::DanglingReference {
                    id: node.id().to_string(),
                    parent_id: parent_id.to_string(),
                    known_parent_id: self.known_parent_id.clone(),
                });
            }
        }

        let mut graph = EntityGraph::default();
        // At most one synthetic root, however many children point at it
        if needs_root {
            graph.insert_node(EntityNode::synthetic_root(self.known_parent_id.as_str()));
        }
        for (_, node) in nodes {
            graph.insert_node(node);
        }
        for (parent_id, child_id) in &edges {
            graph.add_edge(parent_id, child_id);
        }

        if let Some(path) = graph.find_cycle() {
            return Err(GraphError::CyclicGraph { path });
        }

        log::debug!(
            "Built entity graph under {}: {} nodes, {} edges (synthetic root: {})",
            self.known_parent_id,
            graph.len(),
            graph.edge_count(),
            needs_root
        );

        Ok(graph)
    }

    fn normalize<'a, I>(&self, records: I) -> Result<BTreeMap<String, EntityNode>, GraphError>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut nodes = BTreeMap::new();

        for record in records {
            let node = EntityNode::from_record(record, false)?;

            if nodes.contains_key(node.id()) {
                match self.duplicate_policy {
                    DuplicatePolicy::Reject => {
                        return Err(GraphError::DuplicateId {
                            id: node.id().to_string(),
                        });
                    }
                    DuplicatePolicy::LastWriteWins => {
                        log::warn!("Duplicate entity id {} - keeping the later record", node.id());
                    }
                }
            }

            nodes.insert(node.id().to_string(), node);
        }

        Ok(nodes)
    }
}

/// Build a graph with the default duplicate policy
pub fn build(records: &[RawRecord], known_parent_id: &str) -> Result<EntityGraph, GraphError> {
    EntityGraphBuilder::new(known_parent_id).build(records)
}
