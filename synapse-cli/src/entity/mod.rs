//! Remote entities as they come back from a project query

pub mod node;

pub use node::{ENTITY_PREFIX, EntityNode, ID_FIELD, PARENT_ID_FIELD, RawRecord};
