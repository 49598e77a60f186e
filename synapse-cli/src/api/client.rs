//! Read-only repository client
//!
//! Fetches the project entity and pages through the entity query for
//! everything inside it. Nothing here writes to the remote store; the one
//! POST is the name lookup, which only reads.

use anyhow::{Context, Result};
use std::time::Duration;

use super::models::{EntityHeader, EntityId, EntityLookupRequest, QueryResponse};
use super::query::{Query, QueryBuilder, is_entity_id};
use crate::config::Config;
use crate::entity::RawRecord;
use crate::snapshot::ProjectSnapshot;

#[derive(Debug, Clone)]
pub struct SynapseClient {
    http: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
    page_size: usize,
}

impl SynapseClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(SynapseClient {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            auth_token: config.auth_token(),
            page_size: config.page_size,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(url))
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.post(url))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("Accept", "application/json");
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch the header fields of a single entity
    pub async fn get_entity(&self, id: &str) -> Result<EntityHeader> {
        let url = format!("{}/entity/{}", self.endpoint, urlencoding::encode(id));
        log::debug!("GET {}", url);

        let response = self
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to request entity {}", id))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Fetching entity {} failed with {}: {}", id, status, body);
        }

        response
            .json::<EntityHeader>()
            .await
            .with_context(|| format!("Failed to parse entity {}", id))
    }

    /// Resolve a project name to its entity id
    pub async fn lookup_project(&self, name: &str) -> Result<String> {
        let url = format!("{}/entity/child", self.endpoint);
        log::debug!("POST {} (entityName={})", url, name);

        let response = self
            .post(&url)
            .json(&EntityLookupRequest::project(name))
            .send()
            .await
            .with_context(|| format!("Failed to look up project '{}'", name))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("No project named '{}'", name);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Looking up project '{}' failed with {}: {}", name, status, body);
        }

        let found = response
            .json::<EntityId>()
            .await
            .with_context(|| format!("Failed to parse lookup of project '{}'", name))?;
        log::info!("Project '{}' is {}", name, found.id);
        Ok(found.id)
    }

    /// Accept either a `syn` id or a project name
    pub async fn resolve_project(&self, id_or_name: &str) -> Result<String> {
        if is_entity_id(id_or_name) {
            Ok(id_or_name.to_string())
        } else {
            self.lookup_project(id_or_name).await
        }
    }

    /// Run one page of a query
    pub async fn query(&self, query: &Query) -> Result<QueryResponse> {
        let statement = query.to_statement();
        let url = format!(
            "{}/query?query={}",
            self.endpoint,
            urlencoding::encode(&statement)
        );
        log::debug!("Query: {}", statement);

        let response = self
            .get(&url)
            .send()
            .await
            .context("Failed to send entity query")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Entity query failed with {}: {}", status, body);
        }

        response
            .json::<QueryResponse>()
            .await
            .context("Failed to parse entity query response")
    }

    /// Fetch every entity record of a project (with pagination)
    pub async fn fetch_project_records(&self, project_id: &str) -> Result<Vec<RawRecord>> {
        let mut query = QueryBuilder::project_entities(project_id)
            .limit(self.page_size)
            .build();
        let mut all_records = Vec::new();

        loop {
            let page = self.query(&query).await?;
            let fetched = page.results.len();
            all_records.extend(page.results);

            if is_last_page(fetched, query.limit, all_records.len(), page.total_number_of_results) {
                break;
            }
            query = query.next_page();
        }

        log::info!("Fetched {} entity records for {}", all_records.len(), project_id);
        Ok(all_records)
    }

    /// Fetch the project's container id and all its entity records
    ///
    /// `project` is a `syn` id or a project name.
    pub async fn fetch_snapshot(&self, project: &str) -> Result<ProjectSnapshot> {
        let project_id = self.resolve_project(project).await?;
        let project_id = project_id.as_str();
        let project = self.get_entity(project_id).await?;
        let parent_id = project
            .parent_id
            .ok_or_else(|| anyhow::anyhow!("Project {} has no parentId", project_id))?;

        let records = self.fetch_project_records(&project.id).await?;

        Ok(ProjectSnapshot {
            project_id: project.id,
            project_name: project.name,
            parent_id,
            records,
        })
    }
}

/// Paging stops on a short page, or once a known total has been collected.
/// A total of 0 means the server did not report one.
fn is_last_page(fetched: usize, limit: usize, collected: usize, total: usize) -> bool {
    fetched < limit || (total > 0 && collected >= total)
}
