//! Entity node normalized from a flat query result record

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde_json::Value;

use crate::graph::GraphError;

/// Namespace prefix carried by every key of an entity query result
pub const ENTITY_PREFIX: &str = "entity.";

/// Attribute holding the entity id (after the prefix is stripped)
pub const ID_FIELD: &str = "id";

/// Attribute holding the parent container id (after the prefix is stripped)
pub const PARENT_ID_FIELD: &str = "parentId";

/// A raw query result record, e.g. `{"entity.id": "syn123", "entity.parentId": "syn100"}`
pub type RawRecord = serde_json::Map<String, Value>;

/// One remote entity in a project hierarchy
///
/// Nodes compare and hash by `id` only, so they can be deduplicated and used
/// as set keys without touching the attribute bag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityNode {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    is_root: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Value>,
}

impl EntityNode {
    /// Normalize a raw record
    ///
    /// Every key must start with [`ENTITY_PREFIX`]. `entity.id` is always
    /// required and `entity.parentId` is required unless `is_root` is set;
    /// both must be strings. Remaining pairs are kept as attributes.
    pub fn from_record(record: &RawRecord, is_root: bool) -> Result<Self, GraphError> {
        let mut id = None;
        let mut parent_id = None;
        let mut attributes = BTreeMap::new();

        for (key, value) in record {
            let name = key.strip_prefix(ENTITY_PREFIX).ok_or_else(|| {
                GraphError::schema(
                    key.as_str(),
                    format!("expected every key to begin with '{}'", ENTITY_PREFIX),
                )
            })?;

            match name {
                ID_FIELD => id = Some(string_field(key, value)?),
                // A null parent is the same as no parent
                PARENT_ID_FIELD if value.is_null() => {}
                PARENT_ID_FIELD => parent_id = Some(string_field(key, value)?),
                _ => {
                    attributes.insert(name.to_string(), value.clone());
                }
            }
        }

        let id = id.ok_or_else(|| {
            GraphError::schema(format!("{}{}", ENTITY_PREFIX, ID_FIELD), "required field is missing")
        })?;

        if parent_id.is_none() && !is_root {
            return Err(GraphError::schema(
                format!("{}{}", ENTITY_PREFIX, PARENT_ID_FIELD),
                format!("required field is missing on entity '{}'", id),
            ));
        }

        Ok(Self {
            id,
            parent_id,
            is_root,
            attributes,
        })
    }

    /// Create the stand-in for a container that was referenced but never returned
    pub fn synthetic_root(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            is_root: true,
            attributes: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// All pass-through attributes, keyed by their de-prefixed name
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get the `name` attribute as a string, if present
    pub fn name(&self) -> Option<&str> {
        self.attribute("name").and_then(Value::as_str)
    }

    /// Get the `concreteType` (or legacy `nodeType`) attribute as a string
    pub fn entity_type(&self) -> Option<&str> {
        self.attribute("concreteType")
            .or_else(|| self.attribute("nodeType"))
            .and_then(Value::as_str)
    }
}

impl PartialEq for EntityNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityNode {}

impl Hash for EntityNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for EntityNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

fn string_field(key: &str, value: &Value) -> Result<String, GraphError> {
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| GraphError::schema(key, format!("expected a string, found {}", value)))
}
