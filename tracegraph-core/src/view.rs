//! Presentation model for a single trace node card.
//!
//! A renderer draws a box with a type badge, a relative timestamp, the
//! summary line, and (when expanded) pretty-printed inputs/outputs.
//! Everything it needs is derived here from a compiled [`GraphNode`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{EventType, GraphNode};

/// Badge palette entry for an event type.
pub fn badge_color(event_type: &EventType) -> &'static str {
    match event_type {
        EventType::ModeTransition => "accent",
        EventType::ToolInvocation => "blue",
        EventType::PerspectiveIntegration => "green",
        EventType::LlmCall => "yellow",
        EventType::AgentRouting => "purple",
        EventType::FileOperation => "teal",
        EventType::Error => "red",
        EventType::Unknown(_) => "zinc",
    }
}

/// `42s ago`, `5m ago`, `3h ago`, or the calendar date once a day has passed.
///
/// Unparseable timestamps are returned as given.
pub fn format_relative_timestamp(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let parsed = parsed.with_timezone(&Utc);

    let secs = (now - parsed).num_seconds().max(0);
    let mins = secs / 60;
    let hours = mins / 60;

    if secs < 60 {
        format!("{}s ago", secs)
    } else if mins < 60 {
        format!("{}m ago", mins)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        parsed.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSection {
    pub title: &'static str,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub label: String,
    pub badge: &'static str,
    pub gradient_border: bool,
    pub relative_time: String,
    pub summary: String,
    pub expanded: bool,
    pub expandable: bool,
    pub details: Vec<DetailSection>,
}

impl NodeView {
    pub fn from_node(node: &GraphNode, now: DateTime<Utc>) -> Self {
        let event = &node.data.event;
        let expandable = event.has_expandable_data();

        let mut details = Vec::new();
        if node.data.expanded {
            if let Some(inputs) = &event.inputs {
                details.push(DetailSection {
                    title: "Inputs",
                    body: pretty_map(inputs),
                });
            }
            if let Some(outputs) = &event.outputs {
                details.push(DetailSection {
                    title: "Outputs",
                    body: pretty_map(outputs),
                });
            }
        }

        Self {
            id: node.id.clone(),
            label: event.event_type.label(),
            badge: badge_color(&event.event_type),
            gradient_border: event.event_type == EventType::ModeTransition,
            relative_time: format_relative_timestamp(&event.timestamp, now),
            summary: node.data.summary.clone(),
            expanded: node.data.expanded,
            expandable,
            details,
        }
    }

    /// Plain-text card.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "[{}] {} ({})\n  {}\n",
            self.label, self.id, self.relative_time, self.summary
        );
        for section in &self.details {
            out.push_str(&format!("  {}:\n", section.title));
            for line in section.body.lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        if self.expandable {
            let hint = if self.expanded {
                "Click to collapse"
            } else {
                "Click to expand"
            };
            out.push_str(&format!("  ({})\n", hint));
        }
        out
    }
}

fn pretty_map(map: &Map<String, Value>) -> String {
    serde_json::to_string_pretty(map).unwrap_or_else(|_| format!("{:?}", map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_trace;
    use crate::models::{Trace, TraceEvent};
    use crate::query::toggle_node_expansion;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 23, 12, 0, 0).unwrap()
    }

    fn single_node(event_type: EventType, with_io: bool) -> GraphNode {
        let event = TraceEvent {
            span_id: "span-1".to_string(),
            parent_id: None,
            event_type,
            timestamp: "2026-01-23T11:59:30Z".to_string(),
            inputs: with_io.then(|| json!({"query": "auth"}).as_object().cloned()).flatten(),
            outputs: with_io.then(|| json!({"hits": 2}).as_object().cloned()).flatten(),
            metadata: Some(json!({"tool_name": "FileSearch"}).as_object().cloned().unwrap()),
        };
        let trace = Trace {
            session_id: "s".to_string(),
            start_time: "2026-01-23T11:59:30Z".to_string(),
            end_time: None,
            events: vec![event],
        };
        compile_trace(&trace).unwrap().nodes.remove(0)
    }

    #[test]
    fn test_relative_timestamp_buckets() {
        assert_eq!(format_relative_timestamp("2026-01-23T11:59:15Z", now()), "45s ago");
        assert_eq!(format_relative_timestamp("2026-01-23T11:50:00Z", now()), "10m ago");
        assert_eq!(format_relative_timestamp("2026-01-23T09:00:00Z", now()), "3h ago");
        assert_eq!(format_relative_timestamp("2026-01-20T09:00:00Z", now()), "2026-01-20");
    }

    #[test]
    fn test_relative_timestamp_edge_cases() {
        assert_eq!(format_relative_timestamp("not a time", now()), "not a time");
        assert_eq!(format_relative_timestamp("2026-01-23T13:00:00Z", now()), "0s ago");
        assert_eq!(format_relative_timestamp("2026-01-23T14:00:00+02:00", now()), "0s ago");
    }

    #[test]
    fn test_view_collapsed_has_no_details() {
        let node = single_node(EventType::ToolInvocation, true);
        let view = NodeView::from_node(&node, now());

        assert_eq!(view.label, "TOOL INVOCATION");
        assert_eq!(view.badge, "blue");
        assert!(!view.gradient_border);
        assert_eq!(view.relative_time, "30s ago");
        assert_eq!(view.summary, "Tool: FileSearch");
        assert!(view.expandable);
        assert!(view.details.is_empty());
        assert!(view.render_text().contains("Click to expand"));
    }

    #[test]
    fn test_view_expanded_dumps_inputs_and_outputs() {
        let node = single_node(EventType::ToolInvocation, true);
        let expanded = toggle_node_expansion(&[node], "span-1").remove(0);
        let view = NodeView::from_node(&expanded, now());

        assert_eq!(view.details.len(), 2);
        assert_eq!(view.details[0].title, "Inputs");
        assert!(view.details[0].body.contains("\"query\": \"auth\""));
        assert_eq!(view.details[1].title, "Outputs");

        let text = view.render_text();
        assert!(text.contains("Inputs:"));
        assert!(text.contains("Click to collapse"));
    }

    #[test]
    fn test_view_without_io_is_not_expandable() {
        let node = single_node(EventType::ModeTransition, false);
        let expanded = toggle_node_expansion(&[node], "span-1").remove(0);
        let view = NodeView::from_node(&expanded, now());

        assert!(view.gradient_border);
        assert_eq!(view.badge, "accent");
        assert!(!view.expandable);
        assert!(view.details.is_empty());
        assert!(!view.render_text().contains("Click to"));
    }

    #[test]
    fn test_badge_for_unknown_type() {
        assert_eq!(badge_color(&EventType::from("SOMETHING_NEW")), "zinc");
    }
}
