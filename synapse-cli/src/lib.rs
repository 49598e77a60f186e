//! Synapse project entity graphs
//!
//! Turns the flat record list returned by a project entity query into a
//! validated parent -> child DAG rooted at the project's container.

pub mod api;
pub mod cli;
pub mod config;
pub mod entity;
pub mod graph;
pub mod loader;
pub mod snapshot;

pub use entity::{EntityNode, RawRecord};
pub use graph::{DuplicatePolicy, EntityGraph, EntityGraphBuilder, ErrorKind, GraphError};
pub use snapshot::ProjectSnapshot;
