pub mod event;
pub mod graph;

pub use event::{EventType, Trace, TraceEvent};
pub use graph::{
    EdgeStyle, GraphEdge, GraphNode, NodeStyle, Position, TraceGraph, TraceNodeData,
};
