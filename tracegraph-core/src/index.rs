//! Parent/child index over a flat event list.
//!
//! Both the layout engine and the query layer need the same view of the
//! implicit tree: which span ids exist, which parent references resolve, and
//! the children of every span in input order. Building it once here keeps the
//! two in agreement about what counts as a root.

use std::collections::HashMap;

use crate::models::TraceEvent;

#[derive(Debug)]
pub struct TraceIndex<'a> {
    events: Vec<&'a TraceEvent>,
    by_id: HashMap<&'a str, &'a TraceEvent>,
    children: HashMap<&'a str, Vec<&'a str>>,
    roots: Vec<&'a str>,
}

impl<'a> TraceIndex<'a> {
    /// Index `events`.
    ///
    /// A parent reference resolves when it names an event in the list,
    /// including the span itself; such loops are left for the walks to report.
    /// Events whose parent is absent or dangling become roots. When a span id
    /// repeats, the first occurrence wins and later ones are skipped.
    pub fn build(events: &'a [TraceEvent]) -> Self {
        let mut kept: Vec<&'a TraceEvent> = Vec::with_capacity(events.len());
        let mut by_id: HashMap<&'a str, &'a TraceEvent> = HashMap::with_capacity(events.len());
        for event in events {
            let span_id = event.span_id.as_str();
            if by_id.contains_key(span_id) {
                tracing::debug!(span_id, "Duplicate span id, keeping first occurrence");
                continue;
            }
            by_id.insert(span_id, event);
            kept.push(event);
        }

        let mut children: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        let mut roots = Vec::new();

        for &event in &kept {
            let span_id = event.span_id.as_str();
            match event.parent_id.as_deref() {
                Some(parent_id) if by_id.contains_key(parent_id) => {
                    children.entry(parent_id).or_default().push(span_id);
                }
                Some(parent_id) => {
                    tracing::debug!(span_id, parent_id, "Dangling parent reference, treating span as root");
                    roots.push(span_id);
                }
                None => roots.push(span_id),
            }
        }

        Self {
            events: kept,
            by_id,
            children,
            roots,
        }
    }

    /// Indexed events in input order, one per span id.
    pub fn events(&self) -> &[&'a TraceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains(&self, span_id: &str) -> bool {
        self.by_id.contains_key(span_id)
    }

    pub fn get(&self, span_id: &str) -> Option<&'a TraceEvent> {
        self.by_id.get(span_id).copied()
    }

    /// Roots in input order.
    pub fn roots(&self) -> &[&'a str] {
        &self.roots
    }

    /// Children of `span_id` in input order; empty for leaves and unknown ids.
    pub fn children(&self, span_id: &str) -> &[&'a str] {
        self.children
            .get(span_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The parent of `span_id`, only if it resolves to an event in the index.
    pub fn resolved_parent(&self, span_id: &str) -> Option<&'a str> {
        let parent_id = self.get(span_id)?.parent_id.as_deref()?;
        self.by_id.get_key_value(parent_id).map(|(k, _)| *k)
    }
}
