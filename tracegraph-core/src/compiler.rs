//! Trace → renderable graph compilation
//!
//! Every event becomes one node (position from the layout engine, a short
//! summary, a type-colored border) and every resolvable parent link becomes
//! one edge. The output is rebuilt from scratch for each trace.

use serde_json::Value;

use crate::config::TraceGraphConfig;
use crate::error::TraceGraphError;
use crate::index::TraceIndex;
use crate::layout::layout_index;
use crate::models::graph::{FULL_OPACITY, NODE_TYPE};
use crate::models::{
    EventType, GraphEdge, GraphNode, NodeStyle, Trace, TraceEvent, TraceGraph, TraceNodeData,
};

/// Color for event types outside the known set
pub const FALLBACK_COLOR: &str = "#94a3b8";

/// Sunset gradient used for mode transitions
pub const MODE_TRANSITION_GRADIENT: &str =
    "linear-gradient(135deg, #f4a261 0%, #e76f51 50%, #ffd166 100%)";

pub fn border_color(event_type: &EventType) -> &'static str {
    match event_type {
        EventType::ModeTransition => MODE_TRANSITION_GRADIENT,
        EventType::ToolInvocation => "#3b82f6",
        EventType::PerspectiveIntegration => "#10b981",
        EventType::LlmCall => "#fbbf24",
        EventType::AgentRouting => "#8b5cf6",
        EventType::FileOperation => "#14b8a6",
        EventType::Error => "#ef4444",
        EventType::Unknown(_) => FALLBACK_COLOR,
    }
}

/// Solid color for minimap swatches, where gradients cannot be drawn.
pub fn minimap_color(event_type: &EventType) -> &'static str {
    match event_type {
        EventType::ModeTransition => "#f4a261",
        EventType::AgentRouting => "#a855f7",
        other => border_color(other),
    }
}

/// Render a metadata value for a summary, treating null/false/0/"" as missing.
fn metadata_text(event: &TraceEvent, key: &str) -> Option<String> {
    match event.metadata_value(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        // f64 Display drops the trailing ".0" that serde_json would print
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

/// Short one-line description of an event.
pub fn event_summary(event: &TraceEvent) -> String {
    let field = |key: &str, fallback: &str| {
        metadata_text(event, key).unwrap_or_else(|| fallback.to_string())
    };

    match &event.event_type {
        EventType::ModeTransition => format!("Mode: {}", field("mode", "Unknown")),
        EventType::ToolInvocation => format!("Tool: {}", field("tool_name", "Unknown")),
        EventType::PerspectiveIntegration => {
            format!("Perspectives: {}", field("perspective_count", "0"))
        }
        EventType::LlmCall => format!("LLM: {}", field("model", "Unknown")),
        EventType::AgentRouting => format!("Agent: {}", field("agent_type", "Unknown")),
        EventType::FileOperation => format!("File: {}", field("operation", "Unknown")),
        EventType::Error => format!("Error: {}", field("message", "Unknown error")),
        EventType::Unknown(raw) => raw.clone(),
    }
}

/// Compile a trace with default layout settings.
pub fn compile_trace(trace: &Trace) -> Result<TraceGraph, TraceGraphError> {
    compile_trace_with_config(trace, &TraceGraphConfig::default())
}

/// Compile a trace into nodes and edges.
///
/// A repeated span id compiles to one node, from its first occurrence.
///
/// # Errors
/// * `CycleDetected` - a parent chain loops back on itself
pub fn compile_trace_with_config(
    trace: &Trace,
    config: &TraceGraphConfig,
) -> Result<TraceGraph, TraceGraphError> {
    let events = &trace.events;
    if events.is_empty() {
        return Ok(TraceGraph::default());
    }

    let index = TraceIndex::build(events);
    let positions = layout_index(&index, &config.layout)?;

    let mut nodes = Vec::with_capacity(index.len());
    for &event in index.events() {
        let position = positions
            .get(event.span_id.as_str())
            .copied()
            .ok_or_else(|| TraceGraphError::cycle(event.span_id.as_str()))?;

        nodes.push(GraphNode {
            id: event.span_id.clone(),
            node_type: NODE_TYPE.to_string(),
            position,
            data: TraceNodeData {
                event: event.clone(),
                summary: event_summary(event),
                expanded: false,
            },
            style: NodeStyle {
                border_color: border_color(&event.event_type).to_string(),
                opacity: FULL_OPACITY,
            },
        });
    }

    let edges: Vec<GraphEdge> = index
        .events()
        .iter()
        .filter_map(|event| {
            index
                .resolved_parent(&event.span_id)
                .map(|parent_id| GraphEdge::between(parent_id, &event.span_id))
        })
        .collect();

    tracing::debug!(
        session_id = %trace.session_id,
        nodes = nodes.len(),
        edges = edges.len(),
        "Compiled trace graph"
    );

    Ok(TraceGraph { nodes, edges })
}

// ============================================================================
// TESTS
// ============================================================================
