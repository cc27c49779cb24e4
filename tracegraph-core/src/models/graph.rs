use serde::{Deserialize, Serialize};

use super::event::TraceEvent;

pub const NODE_TYPE: &str = "trace";
pub const EDGE_TYPE: &str = "smoothstep";
pub const EDGE_STROKE: &str = "rgba(255, 255, 255, 0.3)";
pub const EDGE_STROKE_WIDTH: f64 = 2.0;
pub const FULL_OPACITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceNodeData {
    pub event: TraceEvent,
    pub summary: String,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub border_color: String,
    pub opacity: f64,
}

/// A renderable node, one per trace event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    pub data: TraceNodeData,
    pub style: NodeStyle,
}

impl GraphNode {
    pub fn border_color(&self) -> &str {
        &self.style.border_color
    }

    pub fn with_opacity(&self, opacity: f64) -> Self {
        let mut node = self.clone();
        node.style.opacity = opacity;
        node
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            stroke: EDGE_STROKE.to_string(),
            stroke_width: EDGE_STROKE_WIDTH,
            opacity: FULL_OPACITY,
        }
    }
}

/// A parent→child link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub animated: bool,
    pub style: EdgeStyle,
}

impl GraphEdge {
    pub fn between(parent_id: &str, span_id: &str) -> Self {
        Self {
            id: format!("{}-{}", parent_id, span_id),
            source: parent_id.to_string(),
            target: span_id.to_string(),
            edge_type: EDGE_TYPE.to_string(),
            animated: false,
            style: EdgeStyle::default(),
        }
    }

    pub fn with_opacity(&self, opacity: f64) -> Self {
        let mut edge = self.clone();
        edge.style.opacity = opacity;
        edge
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraceGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl TraceGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }
}
