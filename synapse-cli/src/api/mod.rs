//! Repository REST API access
//!
//! Only the read calls needed to snapshot a project: the project entity
//! itself (for its `parentId`), the paged entity query, and the project
//! lookup by name.

pub mod client;
pub mod models;
pub mod query;

pub use client::SynapseClient;
pub use models::{EntityHeader, EntityId, EntityLookupRequest, QueryResponse};
pub use query::{Query, QueryBuilder, is_entity_id};
