//! Repository API response models

use serde::{Deserialize, Serialize};

use crate::entity::RawRecord;

/// One page of an entity query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub total_number_of_results: usize,
    #[serde(default)]
    pub results: Vec<RawRecord>,
}

/// The fields of an entity bundle this tool cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityHeader {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub concrete_type: Option<String>,
}

/// Body of a child lookup; without a parent the lookup runs over projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityLookupRequest {
    pub entity_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl EntityLookupRequest {
    pub fn project(name: impl Into<String>) -> Self {
        EntityLookupRequest {
            entity_name: name.into(),
            parent_id: None,
        }
    }
}

/// Result of a child lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityId {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_response_deserializes() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"totalNumberOfResults": 3, "results": [{"entity.id": "syn2"}]}"#,
        )
        .unwrap();

        assert_eq!(response.total_number_of_results, 3);
        assert_eq!(response.results.len(), 1);
    }

    #[test]
    fn test_entity_header_ignores_extra_fields() {
        let header: EntityHeader = serde_json::from_str(
            r#"{"id": "syn1", "name": "VEO", "parentId": "syn0", "etag": "x", "concreteType": "org.sagebionetworks.repo.model.Project"}"#,
        )
        .unwrap();

        assert_eq!(header.parent_id.as_deref(), Some("syn0"));
        assert_eq!(header.name.as_deref(), Some("VEO"));
    }

    #[test]
    fn test_project_lookup_body() {
        let body = serde_json::to_value(EntityLookupRequest::project("VEO")).unwrap();

        assert_eq!(body, serde_json::json!({"entityName": "VEO"}));
    }

    #[test]
    fn test_entity_id_deserializes() {
        let found: EntityId = serde_json::from_str(r#"{"id": "syn7"}"#).unwrap();
        assert_eq!(found.id, "syn7");
    }
}
