//! Visualization export in the Cytoscape.js elements shape.

use serde::Serialize;

use super::{GraphStore, NodeType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisNodeData {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: Option<NodeType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisNode {
    pub data: VisNodeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisEdgeData {
    /// `<from>-<to>-<relationship>`
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisEdge {
    pub data: VisEdgeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualizationData {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

impl GraphStore {
    pub fn to_visualization(&self) -> VisualizationData {
        let nodes = self
            .all_nodes()
            .into_iter()
            .map(|id| VisNode {
                data: VisNodeData {
                    node_type: self.node_type(&id),
                    label: id.clone(),
                    id,
                },
            })
            .collect();

        let edges = self
            .edges()
            .iter()
            .map(|e| VisEdge {
                data: VisEdgeData {
                    id: format!("{}-{}-{}", e.from, e.to, e.relationship),
                    source: e.from.clone(),
                    target: e.to.clone(),
                    label: e.relationship.as_str().to_string(),
                },
            })
            .collect();

        VisualizationData { nodes, edges }
    }
}
