//! Project entity hierarchy as a validated DAG
//!
//! Provides:
//! - [`EntityGraphBuilder`] to turn query records into a graph
//! - [`EntityGraph`] for read-only traversal of the result
//! - [`GraphError`] for the ways a snapshot can be rejected

pub mod builder;
pub mod dag;
pub mod error;

pub use builder::{DuplicatePolicy, EntityGraphBuilder, build};
pub use dag::EntityGraph;
pub use error::{ErrorKind, GraphError};
