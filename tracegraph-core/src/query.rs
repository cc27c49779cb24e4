//! Stateless queries over trace events and compiled graphs
//!
//! These back the interactive view:
//! - click → [`toggle_node_expansion`]
//! - hover enter → [`highlight_path_ids`] + [`filter_graph_by_path`]
//! - hover leave → [`clear_highlight`]
//!
//! Every function returns new collections; inputs are never mutated.

use std::collections::HashSet;

use crate::config::HighlightConfig;
use crate::error::TraceGraphError;
use crate::index::TraceIndex;
use crate::models::graph::FULL_OPACITY;
use crate::models::{GraphEdge, GraphNode, TraceEvent, TraceGraph};

/// Flip `data.expanded` on the node with `node_id`; all other nodes pass through.
pub fn toggle_node_expansion(nodes: &[GraphNode], node_id: &str) -> Vec<GraphNode> {
    nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            if node.id == node_id {
                node.data.expanded = !node.data.expanded;
            }
            node
        })
        .collect()
}

/// Parent chain of `span_id`, nearest ancestor first.
///
/// Empty for roots and unknown ids. Stops at the first parent reference that
/// does not resolve.
pub fn get_ancestor_ids(
    events: &[TraceEvent],
    span_id: &str,
) -> Result<Vec<String>, TraceGraphError> {
    let index = TraceIndex::build(events);
    Ok(ancestors_in(&index, span_id)?
        .into_iter()
        .map(str::to_string)
        .collect())
}

/// Every descendant of `span_id` in depth-first order, children in input order.
///
/// Does not include `span_id` itself. Empty for leaves and unknown ids.
pub fn get_descendant_ids(
    events: &[TraceEvent],
    span_id: &str,
) -> Result<Vec<String>, TraceGraphError> {
    let index = TraceIndex::build(events);
    Ok(descendants_in(&index, span_id)?
        .into_iter()
        .map(str::to_string)
        .collect())
}

/// The hovered span, then its ancestors, then its descendants.
pub fn highlight_path_ids(
    events: &[TraceEvent],
    span_id: &str,
) -> Result<Vec<String>, TraceGraphError> {
    let index = TraceIndex::build(events);
    let mut path = vec![span_id];
    path.extend(ancestors_in(&index, span_id)?);
    path.extend(descendants_in(&index, span_id)?);

    let mut seen = HashSet::with_capacity(path.len());
    Ok(path
        .into_iter()
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect())
}

/// Dim everything off `path_node_ids` using the default opacities.
pub fn filter_graph_by_path<S: AsRef<str>>(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    path_node_ids: &[S],
) -> TraceGraph {
    filter_graph_by_path_with(nodes, edges, path_node_ids, &HighlightConfig::default())
}

/// Nodes on the path keep full opacity; edges keep it only when both ends are
/// on the path.
pub fn filter_graph_by_path_with<S: AsRef<str>>(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    path_node_ids: &[S],
    config: &HighlightConfig,
) -> TraceGraph {
    let path: HashSet<&str> = path_node_ids.iter().map(|id| id.as_ref()).collect();

    let nodes = nodes
        .iter()
        .map(|node| {
            let opacity = if path.contains(node.id.as_str()) {
                FULL_OPACITY
            } else {
                config.dimmed_node_opacity
            };
            node.with_opacity(opacity)
        })
        .collect();

    let edges = edges
        .iter()
        .map(|edge| {
            let on_path =
                path.contains(edge.source.as_str()) && path.contains(edge.target.as_str());
            edge.with_opacity(if on_path {
                FULL_OPACITY
            } else {
                config.dimmed_edge_opacity
            })
        })
        .collect();

    TraceGraph { nodes, edges }
}

/// Hover-enter in one call: highlight `span_id` with its ancestors and descendants.
pub fn highlight_hovered(
    graph: &TraceGraph,
    events: &[TraceEvent],
    span_id: &str,
    config: &HighlightConfig,
) -> Result<TraceGraph, TraceGraphError> {
    let path = highlight_path_ids(events, span_id)?;
    tracing::debug!(span_id, highlighted = path.len(), "Highlighting hover path");
    Ok(filter_graph_by_path_with(
        &graph.nodes,
        &graph.edges,
        path.as_slice(),
        config,
    ))
}

/// Hover-leave: every node and edge back to full opacity.
pub fn clear_highlight(nodes: &[GraphNode], edges: &[GraphEdge]) -> TraceGraph {
    TraceGraph {
        nodes: nodes.iter().map(|n| n.with_opacity(FULL_OPACITY)).collect(),
        edges: edges.iter().map(|e| e.with_opacity(FULL_OPACITY)).collect(),
    }
}

fn ancestors_in<'a>(
    index: &TraceIndex<'a>,
    span_id: &str,
) -> Result<Vec<&'a str>, TraceGraphError> {
    let mut ancestors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(span_id);

    let mut current = index.resolved_parent(span_id);
    while let Some(parent_id) = current {
        if !seen.insert(parent_id) {
            return Err(TraceGraphError::cycle(parent_id));
        }
        ancestors.push(parent_id);
        current = index.resolved_parent(parent_id);
    }

    Ok(ancestors)
}

fn descendants_in<'a>(
    index: &TraceIndex<'a>,
    span_id: &str,
) -> Result<Vec<&'a str>, TraceGraphError> {
    let mut descendants = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(span_id);

    // Reversed so the first child is popped first
    let mut stack: Vec<&'a str> = index.children(span_id).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            return Err(TraceGraphError::cycle(id));
        }
        descendants.push(id);
        stack.extend(index.children(id).iter().rev().copied());
    }

    Ok(descendants)
}

// ============================================================================
// TESTS
// ============================================================================
