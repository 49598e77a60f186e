//! Validated entity hierarchy
//!
//! Adjacency is kept explicitly, keyed by entity id:
//! - `nodes`: id -> node
//! - `children`: id -> ordered child ids (edges run parent -> child)
//! - `parents`: id -> parent id (reverse adjacency)

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::entity::EntityNode;

static NO_CHILDREN: BTreeSet<String> = BTreeSet::new();

/// DFS visitation state; absent from the state map means unvisited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// Directed acyclic graph of the entities in one project
///
/// Only [`EntityGraphBuilder`](super::EntityGraphBuilder) creates these, and
/// it never hands out a graph that failed validation.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    nodes: BTreeMap<String, EntityNode>,
    children: BTreeMap<String, BTreeSet<String>>,
    parents: HashMap<String, String>,
    root: Option<String>,
}

impl EntityGraph {
    pub(crate) fn insert_node(&mut self, node: EntityNode) {
        let id = node.id().to_string();
        if node.is_root() {
            self.root = Some(id.clone());
        }
        self.children.entry(id.clone()).or_default();
        self.nodes.insert(id, node);
    }

    /// Add a parent -> child edge; both ends must already be inserted
    pub(crate) fn add_edge(&mut self, parent_id: &str, child_id: &str) {
        debug_assert!(self.nodes.contains_key(parent_id) && self.nodes.contains_key(child_id));
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .insert(child_id.to_string());
        self.parents
            .insert(child_id.to_string(), parent_id.to_string());
    }

    /// Look up a node by id
    pub fn get(&self, id: &str) -> Option<&EntityNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes, ordered by id
    pub fn nodes(&self) -> impl Iterator<Item = &EntityNode> {
        self.nodes.values()
    }

    /// Children of `id` ordered by id (empty for unknown ids and leaves)
    pub fn children(&self, id: &str) -> impl Iterator<Item = &EntityNode> {
        self.child_ids(id).filter_map(|child| self.nodes.get(child))
    }

    pub fn child_ids(&self, id: &str) -> impl Iterator<Item = &str> {
        self.children
            .get(id)
            .unwrap_or(&NO_CHILDREN)
            .iter()
            .map(String::as_str)
    }

    /// Parent of `id`; `None` for the root and unknown ids
    pub fn parent(&self, id: &str) -> Option<&EntityNode> {
        self.parents.get(id).and_then(|p| self.nodes.get(p))
    }

    /// The project container node, if the graph has any nodes at all
    pub fn root(&self) -> Option<&EntityNode> {
        self.root.as_ref().and_then(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of parent -> child edges, counted from the child sets
    pub fn edge_count(&self) -> usize {
        self.children.values().map(BTreeSet::len).sum()
    }

    /// Number of incoming edges of `id`: 1 for a linked child, 0 for the root
    /// and for ids not in the graph
    pub fn in_degree(&self, id: &str) -> usize {
        usize::from(self.parents.contains_key(id))
    }

    /// Always true for a graph returned by the builder
    pub fn is_acyclic(&self) -> bool {
        self.find_cycle().is_none()
    }

    /// Ancestors of `id` from its parent up to the root
    pub fn ancestors(&self, id: &str) -> Vec<&EntityNode> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            // Guards against looping forever on a graph that was never validated
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(parent);
            current = parent.id();
        }
        path
    }

    /// Depth-first pre-order walk from the root, yielding (depth, node)
    pub fn walk(&self) -> Vec<(usize, &EntityNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root() else {
            return out;
        };

        let mut stack = vec![(0usize, root)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            // Push in reverse so children come out in id order
            let children: Vec<_> = self.children(node.id()).collect();
            for child in children.into_iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }

    /// Find a directed cycle, returned as an id path whose first id is
    /// repeated at the end
    ///
    /// Iterative DFS with unvisited / in-progress / done tagging, so deep
    /// hierarchies cannot overflow the call stack.
    pub(crate) fn find_cycle(&self) -> Option<Vec<String>> {
        let mut state: HashMap<&str, VisitState> = HashMap::with_capacity(self.nodes.len());

        for start in self.nodes.keys() {
            if state.contains_key(start.as_str()) {
                continue;
            }

            state.insert(start.as_str(), VisitState::InProgress);
            let mut stack = vec![(start.as_str(), self.child_set(start).iter())];

            loop {
                let next = match stack.last_mut() {
                    Some((_, pending)) => pending.next(),
                    None => break,
                };

                match next {
                    Some(child) => match state.get(child.as_str()) {
                        Some(VisitState::InProgress) => {
                            let pos = stack
                                .iter()
                                .position(|(id, _)| *id == child.as_str())
                                .unwrap_or(0);
                            let mut path: Vec<String> =
                                stack[pos..].iter().map(|(id, _)| id.to_string()).collect();
                            path.push(child.clone());
                            return Some(path);
                        }
                        Some(VisitState::Done) => {}
                        None => {
                            state.insert(child.as_str(), VisitState::InProgress);
                            stack.push((child.as_str(), self.child_set(child).iter()));
                        }
                    },
                    None => {
                        if let Some((id, _)) = stack.pop() {
                            state.insert(id, VisitState::Done);
                        }
                    }
                }
            }
        }

        None
    }

    fn child_set(&self, id: &str) -> &BTreeSet<String> {
        self.children.get(id).unwrap_or(&NO_CHILDREN)
    }
}
