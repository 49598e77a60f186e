//! Output formatting for built graphs

use anyhow::{Context, Result};
use colored::*;
use serde_json::json;
use std::collections::BTreeMap;

use super::OutputFormat;
use crate::entity::EntityNode;
use crate::graph::EntityGraph;

/// Format a graph according to the requested output format
pub fn format_output(graph: &EntityGraph, format: OutputFormat, label: &str) -> Result<String> {
    match format {
        OutputFormat::Tree => Ok(render_tree(graph)),
        OutputFormat::Json => render_json(graph),
        OutputFormat::Summary => Ok(render_summary(graph, label)),
    }
}

/// One-line description used by the batch command
pub fn summary_line(graph: &EntityGraph) -> String {
    format!(
        "{} entities, {} edges, depth {}, root {}",
        graph.len(),
        graph.edge_count(),
        max_depth(graph),
        graph.root().map(|n| n.id()).unwrap_or("-")
    )
}

fn max_depth(graph: &EntityGraph) -> usize {
    graph.walk().iter().map(|(depth, _)| *depth).max().unwrap_or(0)
}

/// Last segment of a dotted type name (`org.sagebionetworks.repo.model.Folder` -> `Folder`)
fn short_type(node: &EntityNode) -> Option<&str> {
    node.entity_type()
        .map(|t| t.rsplit('.').next().unwrap_or(t))
}

fn describe(node: &EntityNode) -> String {
    let mut line = if node.is_root() {
        format!("{} {}", node.id().yellow().bold(), "(container)".dimmed())
    } else {
        node.id().bold().to_string()
    };
    if let Some(name) = node.name() {
        line.push_str(&format!("  {}", name));
    }
    if let Some(kind) = short_type(node) {
        line.push_str(&format!(" {}", format!("[{}]", kind).cyan()));
    }
    line
}

fn render_tree(graph: &EntityGraph) -> String {
    let Some(root) = graph.root() else {
        return "(empty graph)\n".to_string();
    };

    let mut out = format!("{}\n", describe(root));
    let mut stack: Vec<(&EntityNode, String, bool)> = Vec::new();
    push_children(graph, root.id(), "", &mut stack);

    while let Some((node, prefix, is_last)) = stack.pop() {
        let branch = if is_last { "└── " } else { "├── " };
        out.push_str(&format!("{}{}{}\n", prefix, branch, describe(node)));

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        push_children(graph, node.id(), &child_prefix, &mut stack);
    }

    out
}

fn push_children<'a>(
    graph: &'a EntityGraph,
    id: &str,
    prefix: &str,
    stack: &mut Vec<(&'a EntityNode, String, bool)>,
) {
    let children: Vec<&'a EntityNode> = graph.children(id).collect();
    let count = children.len();
    // Reversed so the first child is popped first
    for (idx, child) in children.into_iter().enumerate().rev() {
        stack.push((child, prefix.to_string(), idx + 1 == count));
    }
}

fn render_json(graph: &EntityGraph) -> Result<String> {
    let nodes: Vec<&EntityNode> = graph.nodes().collect();
    let edges: Vec<_> = graph
        .nodes()
        .flat_map(|parent| {
            graph
                .child_ids(parent.id())
                .map(move |child| json!({ "parent": parent.id(), "child": child }))
        })
        .collect();

    let body = json!({
        "root": graph.root().map(|n| n.id()),
        "acyclic": graph.is_acyclic(),
        "nodes": nodes,
        "edges": edges,
    });

    let mut text = serde_json::to_string_pretty(&body).context("Failed to format JSON output")?;
    text.push('\n');
    Ok(text)
}

fn render_summary(graph: &EntityGraph, label: &str) -> String {
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for node in graph.nodes().filter(|n| !n.is_root()) {
        *by_type.entry(short_type(node).unwrap_or("unknown")).or_default() += 1;
    }

    let mut out = format!("{}\n", label.bold());
    out.push_str(&format!("  {}\n", summary_line(graph)));
    for (kind, count) in by_type {
        out.push_str(&format!("  {:<12} {}\n", kind, count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::loader::json::parse_records;

    fn make_graph() -> EntityGraph {
        colored::control::set_override(false);
        let records = parse_records(
            r#"[
                {"entity.id": "A", "entity.parentId": "ROOT", "entity.name": "project", "entity.concreteType": "org.sagebionetworks.repo.model.Project"},
                {"entity.id": "B", "entity.parentId": "A", "entity.name": "data", "entity.concreteType": "org.sagebionetworks.repo.model.Folder"},
                {"entity.id": "C", "entity.parentId": "A"}
            ]"#,
        )
        .unwrap();
        build(&records, "ROOT").unwrap()
    }

    #[test]
    fn test_tree_layout() {
        let tree = render_tree(&make_graph());

        let expected = "ROOT (container)\n└── A  project [Project]\n    ├── B  data [Folder]\n    └── C\n";
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_json_lists_edges() {
        let text = render_json(&make_graph()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["root"], "ROOT");
        assert_eq!(value["acyclic"], true);
        assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(value["edges"].as_array().unwrap().len(), 3);
        assert_eq!(value["nodes"][0]["id"], "A");
        assert_eq!(value["nodes"][0]["attributes"]["name"], "project");
    }

    #[test]
    fn test_summary_counts_types() {
        let summary = render_summary(&make_graph(), "VEO");

        assert!(summary.contains("4 entities, 3 edges, depth 2, root ROOT"));
        assert!(summary.contains("Folder"));
        assert!(summary.contains("unknown"));
    }

    #[test]
    fn test_empty_graph() {
        let graph = build(&[], "ROOT").unwrap();
        assert_eq!(render_tree(&graph), "(empty graph)\n");
        assert_eq!(summary_line(&graph), "0 entities, 0 edges, depth 0, root -");
    }
}
