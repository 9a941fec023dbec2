//! Movie graph module: adjacency-list store, record-to-graph builder,
//! traversal algorithms and visualization export.
//!
//! Node ids are bare movie titles and person names. Every semantic
//! relationship is stored as a forward and an inverse directed edge so
//! traversal can move freely between movies and people.

mod builder;
mod export;
mod store;
mod traversal;

pub use builder::build_graph;
pub use export::{VisEdge, VisEdgeData, VisNode, VisNodeData, VisualizationData};
pub use store::{AddActorOutcome, GraphStore, GraphSummary};
pub use traversal::{bfs, compare_traversals, dfs, dfs_iterative, shortest_path, TraversalComparison};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    Movie,
    Person,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Movie => "MOVIE",
            NodeType::Person => "PERSON",
        }
    }

    /// Parse a type name case-insensitively. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "MOVIE" => Some(NodeType::Movie),
            "PERSON" => Some(NodeType::Person),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label carried by a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    ActedIn,
    ActedBy,
    Directed,
    DirectedBy,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::ActedIn => "ACTED_IN",
            Relationship::ActedBy => "ACTED_BY",
            Relationship::Directed => "DIRECTED",
            Relationship::DirectedBy => "DIRECTED_BY",
        }
    }

    /// The label stored on the reverse edge of the same semantic relationship.
    pub fn inverse(&self) -> Self {
        match self {
            Relationship::ActedIn => Relationship::ActedBy,
            Relationship::ActedBy => Relationship::ActedIn,
            Relationship::Directed => Relationship::DirectedBy,
            Relationship::DirectedBy => Relationship::Directed,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge triple (from --relationship--> to).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub relationship: Relationship,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, relationship: Relationship) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relationship,
        }
    }
}

/// Serialized as a `[from, to, relationship]` array.
impl Serialize for Edge {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.from, &self.to, self.relationship.as_str()).serialize(serializer)
    }
}

/// Detail record for a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub id: String,
    /// `None` for unknown ids and for nodes auto-registered by an edge.
    #[serde(rename = "type")]
    pub node_type: Option<NodeType>,
    pub neighbors: Vec<String>,
    pub neighbor_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_parse_case_insensitive() {
        assert_eq!(NodeType::parse("movie"), Some(NodeType::Movie));
        assert_eq!(NodeType::parse("Person"), Some(NodeType::Person));
        assert_eq!(NodeType::parse(" MOVIE "), Some(NodeType::Movie));
        assert_eq!(NodeType::parse("studio"), None);
    }

    #[test]
    fn test_relationship_inverse_pairs() {
        assert_eq!(Relationship::ActedIn.inverse(), Relationship::ActedBy);
        assert_eq!(Relationship::DirectedBy.inverse(), Relationship::Directed);
        for rel in [
            Relationship::ActedIn,
            Relationship::ActedBy,
            Relationship::Directed,
            Relationship::DirectedBy,
        ] {
            assert_eq!(rel.inverse().inverse(), rel);
        }
    }

    #[test]
    fn test_edge_serializes_as_triple() {
        let edge = Edge::new("Keanu Reeves", "The Matrix", Relationship::ActedIn);
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json, serde_json::json!(["Keanu Reeves", "The Matrix", "ACTED_IN"]));
    }

    #[test]
    fn test_node_info_serialization() {
        let info = NodeInfo {
            id: "Inception".to_string(),
            node_type: Some(NodeType::Movie),
            neighbors: vec!["Leonardo DiCaprio".to_string()],
            neighbor_count: 1,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "MOVIE");
        assert_eq!(json["neighborCount"], 1);
    }
}
