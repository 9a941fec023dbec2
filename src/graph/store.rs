//! Adjacency-list graph store.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::{Edge, NodeInfo, NodeType, Relationship};

/// Counts reported by the graph summary endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub is_empty: bool,
}

/// Result of an actor insertion. Validation failures are reported here,
/// never as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddActorOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_relations: Option<usize>,
    /// Titles that resolved to movie nodes, in request order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_movies: Vec<String>,
}

impl AddActorOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            actor_name: None,
            added_relations: None,
            linked_movies: Vec::new(),
        }
    }
}

/// In-memory directed graph of movies and people.
///
/// `adjacency` keys are the registered nodes; each list keeps out-neighbors in
/// edge-insertion order with no repeated destination. `edges` keeps every
/// distinct (from, to, relationship) triple in insertion order.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    adjacency: HashMap<String, Vec<String>>,
    node_types: HashMap<String, NodeType>,
    edges: Vec<Edge>,
    edge_index: HashSet<Edge>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            adjacency: HashMap::with_capacity(node_count),
            node_types: HashMap::with_capacity(node_count),
            edges: Vec::with_capacity(edge_count),
            edge_index: HashSet::with_capacity(edge_count),
        }
    }

    /// Register a node. Re-adding keeps its neighbors but overwrites the type.
    pub fn add_node(&mut self, id: &str, node_type: NodeType) {
        if !self.adjacency.contains_key(id) {
            self.adjacency.insert(id.to_string(), Vec::new());
        }
        self.node_types.insert(id.to_string(), node_type);
    }

    /// Add a directed edge. Missing endpoints are registered without a type.
    pub fn add_edge(&mut self, from: &str, to: &str, relationship: Relationship) {
        if !self.adjacency.contains_key(to) {
            self.adjacency.insert(to.to_string(), Vec::new());
        }
        let neighbors = self.adjacency.entry(from.to_string()).or_default();
        // Adjacency dedup is by destination only; the label is ignored here.
        if !neighbors.iter().any(|n| n == to) {
            neighbors.push(to.to_string());
        }

        let edge = Edge::new(from, to, relationship);
        if !self.edge_index.contains(&edge) {
            self.edge_index.insert(edge.clone());
            self.edges.push(edge);
        }
    }

    /// Remove a node together with every edge touching it.
    /// Returns false if the node was not registered.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if self.adjacency.remove(id).is_none() {
            return false;
        }
        self.node_types.remove(id);
        for neighbors in self.adjacency.values_mut() {
            neighbors.retain(|n| n != id);
        }
        self.edges.retain(|e| e.from != id && e.to != id);
        self.edge_index.retain(|e| e.from != id && e.to != id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// The stored id equal to `id`, borrowed from the graph.
    pub fn node_key(&self, id: &str) -> Option<&str> {
        self.adjacency.get_key_value(id).map(|(key, _)| key.as_str())
    }

    /// All registered node ids, in no particular order.
    pub fn all_nodes(&self) -> Vec<String> {
        self.adjacency.keys().cloned().collect()
    }

    /// Ids registered with the given type. Untyped nodes never match.
    pub fn nodes_by_type(&self, node_type: NodeType) -> Vec<String> {
        self.adjacency
            .keys()
            .filter(|id| self.node_types.get(id.as_str()) == Some(&node_type))
            .cloned()
            .collect()
    }

    /// Ids that were only ever registered as an edge endpoint.
    pub fn untyped_nodes(&self) -> Vec<String> {
        self.adjacency
            .keys()
            .filter(|id| !self.node_types.contains_key(id.as_str()))
            .cloned()
            .collect()
    }

    pub fn node_type(&self, id: &str) -> Option<NodeType> {
        self.node_types.get(id).copied()
    }

    /// Out-neighbors of `id`; empty for unknown ids.
    pub fn neighbors(&self, id: &str) -> &[String] {
        self.adjacency.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All stored edge triples in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_info(&self, id: &str) -> NodeInfo {
        let neighbors = self.neighbors(id).to_vec();
        NodeInfo {
            id: id.to_string(),
            node_type: self.node_type(id),
            neighbor_count: neighbors.len(),
            neighbors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            is_empty: self.is_empty(),
        }
    }

    /// Add a new actor linked to every title that names a movie node.
    ///
    /// Fails if `name` already names a node, or if no title resolves; in the
    /// latter case the tentatively added actor node is removed again so the
    /// store is left exactly as it was.
    pub fn insert_actor(&mut self, name: &str, titles: &[String]) -> AddActorOutcome {
        if self.contains(name) {
            return AddActorOutcome::failure(format!(
                "Actor '{}' already exists in the graph",
                name
            ));
        }

        self.add_node(name, NodeType::Person);

        let mut linked_movies: Vec<String> = Vec::new();
        for title in titles {
            if self.node_type(title) != Some(NodeType::Movie) || linked_movies.contains(title) {
                continue;
            }
            self.add_edge(name, title, Relationship::ActedIn);
            self.add_edge(title, name, Relationship::ActedBy);
            linked_movies.push(title.clone());
        }

        if linked_movies.is_empty() {
            self.remove_node(name);
            return AddActorOutcome::failure(format!(
                "No valid movies found. Actor '{}' was not added.",
                name
            ));
        }

        let added = linked_movies.len();
        log::info!("Inserted actor '{}' with {} movie relation(s)", name, added);

        AddActorOutcome {
            success: true,
            message: format!("Actor '{}' added successfully with {} movie(s)", name, added),
            actor_name: Some(name.to_string()),
            added_relations: Some(added),
            linked_movies,
        }
    }
}

/// Diagnostic dump. Not a stable format.
impl fmt::Display for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GraphStore {{")?;
        writeln!(f, "  Nodes: {}", self.node_count())?;
        writeln!(f, "  Edges: {}", self.edge_count())?;

        let mut ids: Vec<&String> = self.adjacency.keys().collect();
        ids.sort();
        for id in ids {
            let type_name = self.node_type(id).map(|t| t.as_str()).unwrap_or("UNTYPED");
            write!(f, "  {} ({}) ->", id, type_name)?;
            for neighbor in self.neighbors(id) {
                write!(f, " {}", neighbor)?;
            }
            writeln!(f)?;
        }

        write!(f, "}}")
    }
}
