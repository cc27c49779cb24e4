pub mod compiler;
pub mod config;
pub mod error;
pub mod index;
pub mod layout;
pub mod models;
pub mod query;
pub mod view;

pub use compiler::{
    border_color, compile_trace, compile_trace_with_config, event_summary, minimap_color,
    FALLBACK_COLOR,
};
pub use config::{HighlightConfig, LayoutConfig, TraceGraphConfig};
pub use error::TraceGraphError;
pub use index::TraceIndex;
pub use layout::calculate_positions;
pub use models::{
    EventType, GraphEdge, GraphNode, Position, Trace, TraceEvent, TraceGraph, TraceNodeData,
};
pub use query::{
    clear_highlight, filter_graph_by_path, filter_graph_by_path_with, get_ancestor_ids,
    get_descendant_ids, highlight_hovered, highlight_path_ids, toggle_node_expansion,
};
pub use view::NodeView;
