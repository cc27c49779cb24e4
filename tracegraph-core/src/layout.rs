//! Deterministic top-down tree layout for trace graphs
//!
//! Each root subtree is walked depth-first:
//! - `y` = depth * vertical spacing
//! - child-less spans take the next leaf slot, `x` = slot * horizontal spacing
//! - a parent sits at the midpoint of its first and last child
//!
//! Roots are placed left to right and consume contiguous slot ranges, so
//! sibling subtrees never overlap horizontally.

use std::collections::{BTreeMap, HashSet};

use crate::config::LayoutConfig;
use crate::error::TraceGraphError;
use crate::index::TraceIndex;
use crate::models::{Position, TraceEvent};

/// Compute positions for every event, keyed by span id.
pub fn calculate_positions(
    events: &[TraceEvent],
    config: &LayoutConfig,
) -> Result<BTreeMap<String, Position>, TraceGraphError> {
    let index = TraceIndex::build(events);
    let positions = layout_index(&index, config)?;

    // Anything not reached from a root hangs off a parent chain that loops
    if let Some(unplaced) = events.iter().find(|e| !positions.contains_key(e.span_id.as_str())) {
        return Err(TraceGraphError::cycle(unplaced.span_id.as_str()));
    }

    Ok(positions
        .into_iter()
        .map(|(id, pos)| (id.to_string(), pos))
        .collect())
}

struct Frame<'a> {
    span_id: &'a str,
    depth: usize,
    next_child: usize,
}

pub(crate) fn layout_index<'a>(
    index: &TraceIndex<'a>,
    config: &LayoutConfig,
) -> Result<BTreeMap<&'a str, Position>, TraceGraphError> {
    let mut positions: BTreeMap<&'a str, Position> = BTreeMap::new();
    let mut visited: HashSet<&'a str> = HashSet::with_capacity(index.len());
    let mut leaf_slot: usize = 0;

    for &root in index.roots() {
        if !visited.insert(root) {
            return Err(TraceGraphError::cycle(root));
        }
        let mut stack = vec![Frame {
            span_id: root,
            depth: 0,
            next_child: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let children = index.children(frame.span_id);

            if let Some(&child) = children.get(frame.next_child) {
                frame.next_child += 1;
                let depth = frame.depth + 1;
                if !visited.insert(child) {
                    return Err(TraceGraphError::cycle(child));
                }
                stack.push(Frame {
                    span_id: child,
                    depth,
                    next_child: 0,
                });
                continue;
            }

            // All children placed: settle this span
            let Some(Frame { span_id, depth, .. }) = stack.pop() else {
                break;
            };
            let x = match (children.first(), children.last()) {
                (Some(first), Some(last)) => {
                    let first_x = positions.get(first).map_or(0.0, |p| p.x);
                    let last_x = positions.get(last).map_or(0.0, |p| p.x);
                    (first_x + last_x) / 2.0
                }
                _ => {
                    let x = leaf_slot as f64 * config.horizontal_spacing;
                    leaf_slot += 1;
                    x
                }
            };
            let y = depth as f64 * config.vertical_spacing;
            positions.insert(span_id, Position { x, y });
        }
    }

    tracing::debug!(
        spans = positions.len(),
        roots = index.roots().len(),
        leaf_slots = leaf_slot,
        "Computed trace layout"
    );

    Ok(positions)
}

// ============================================================================
// TESTS
// ============================================================================
