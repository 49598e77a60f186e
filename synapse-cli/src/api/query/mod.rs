//! Entity query builder
//!
//! Builds the SQL-like statements accepted by the repository query service,
//! following the same Query (reusable) / QueryBuilder (fluent) split as the
//! rest of the API layer.

/// A paged entity query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub table: String,
    pub filters: Vec<(String, String)>,
    pub limit: usize,
    /// 1-based, as the query service expects
    pub offset: usize,
}

impl Query {
    /// Render the statement, e.g. `SELECT * FROM entity WHERE projectId=="123" LIMIT 1000 OFFSET 1`
    pub fn to_statement(&self) -> String {
        let mut statement = format!("SELECT * FROM {}", self.table);

        for (idx, (field, value)) in self.filters.iter().enumerate() {
            let joiner = if idx == 0 { "WHERE" } else { "AND" };
            statement.push_str(&format!(
                " {} {}==\"{}\"",
                joiner,
                field,
                value.replace('"', "\\\"")
            ));
        }

        statement.push_str(&format!(" LIMIT {} OFFSET {}", self.limit, self.offset));
        statement
    }

    /// The same query moved forward by one page
    pub fn next_page(&self) -> Self {
        Query {
            offset: self.offset + self.limit,
            ..self.clone()
        }
    }
}

/// Fluent builder for [`Query`]
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        QueryBuilder {
            query: Query {
                table: table.into(),
                filters: Vec::new(),
                limit: 1000,
                offset: 1,
            },
        }
    }

    /// All entities belonging to a project
    ///
    /// The query service wants the bare number, so a leading `syn` is dropped.
    pub fn project_entities(project_id: &str) -> Self {
        QueryBuilder::new("entity").filter_eq("projectId", numeric_id(project_id))
    }

    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.filters.push((field.into(), value.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = limit.max(1);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = offset.max(1);
        self
    }

    pub fn build(self) -> Query {
        self.query
    }
}

/// Strip the `syn` prefix from an entity id (`syn123` -> `123`)
pub fn numeric_id(id: &str) -> &str {
    id.strip_prefix("syn").unwrap_or(id)
}

/// Whether `value` is an entity id (`syn` followed by digits) rather than a name
pub fn is_entity_id(value: &str) -> bool {
    value
        .strip_prefix("syn")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_entities_statement() {
        let query = QueryBuilder::project_entities("syn123").limit(500).build();

        assert_eq!(
            query.to_statement(),
            "SELECT * FROM entity WHERE projectId==\"123\" LIMIT 500 OFFSET 1"
        );
    }

    #[test]
    fn test_next_page_advances_offset() {
        let query = QueryBuilder::project_entities("syn123").limit(100).build();

        let page = query.next_page().next_page();

        assert_eq!(page.offset, 201);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn test_multiple_filters_and_quoting() {
        let query = QueryBuilder::new("entity")
            .filter_eq("projectId", "1")
            .filter_eq("name", "a\"b")
            .build();

        assert_eq!(
            query.to_statement(),
            "SELECT * FROM entity WHERE projectId==\"1\" AND name==\"a\\\"b\" LIMIT 1000 OFFSET 1"
        );
    }

    #[test]
    fn test_numeric_id() {
        assert_eq!(numeric_id("syn42"), "42");
        assert_eq!(numeric_id("42"), "42");
    }

    #[test]
    fn test_is_entity_id() {
        assert!(is_entity_id("syn42"));
        assert!(!is_entity_id("syn"));
        assert!(!is_entity_id("42"));
        assert!(!is_entity_id("synthetic biology"));
        assert!(!is_entity_id("syn42 copy"));
    }
}
