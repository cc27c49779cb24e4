use std::collections::HashSet;

use proptest::prelude::*;
use proptest::sample::Index;
use tracegraph_core::{
    compile_trace, filter_graph_by_path, get_ancestor_ids, get_descendant_ids,
    toggle_node_expansion, EventType, Trace, TraceEvent,
};

const EVENT_TYPES: [&str; 8] = [
    "MODE_TRANSITION",
    "TOOL_INVOCATION",
    "PERSPECTIVE_INTEGRATION",
    "LLM_CALL",
    "AGENT_ROUTING",
    "FILE_OPERATION",
    "ERROR",
    "SOMETHING_NEW",
];

fn make_event(span_id: String, parent_id: Option<String>, kind: usize) -> TraceEvent {
    TraceEvent {
        span_id,
        parent_id,
        event_type: EventType::from(EVENT_TYPES[kind % EVENT_TYPES.len()]),
        timestamp: "2026-01-23T00:00:00Z".to_string(),
        inputs: None,
        outputs: None,
        metadata: None,
    }
}

/// Random acyclic forests. Parents always point at an earlier-generated span
/// (or nowhere, or at a missing span); the shuffle then produces forward
/// references as well.
fn arb_events() -> impl Strategy<Value = Vec<TraceEvent>> {
    prop::collection::vec((0u8..5, any::<Index>(), 0usize..8), 0..24)
        .prop_map(|specs| {
            specs
                .iter()
                .enumerate()
                .map(|(i, (link, pick, kind))| {
                    let parent = match *link {
                        0 => None,
                        1 => Some(format!("ghost-{}", i)),
                        _ if i == 0 => None,
                        _ => Some(format!("span-{}", pick.index(i))),
                    };
                    make_event(format!("span-{}", i), parent, *kind)
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn trace_of(events: Vec<TraceEvent>) -> Trace {
    Trace {
        session_id: "prop".to_string(),
        start_time: "2026-01-23T00:00:00Z".to_string(),
        end_time: None,
        events,
    }
}

fn resolves(events: &[TraceEvent], event: &TraceEvent) -> bool {
    event
        .parent_id
        .as_deref()
        .is_some_and(|p| events.iter().any(|e| e.span_id == p))
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn compile_is_deterministic(events in arb_events()) {
        let trace = trace_of(events);
        let first = serde_json::to_string(&compile_trace(&trace).unwrap()).unwrap();
        let second = serde_json::to_string(&compile_trace(&trace).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn edge_count_matches_resolvable_parents(events in arb_events()) {
        let expected = events.iter().filter(|e| resolves(&events, e)).count();
        let graph = compile_trace(&trace_of(events)).unwrap();
        prop_assert_eq!(graph.edges.len(), expected);
    }

    #[test]
    fn ancestor_descendant_duality(events in arb_events()) {
        for a in &events {
            let descendants: HashSet<String> =
                get_descendant_ids(&events, &a.span_id).unwrap().into_iter().collect();
            for b in &events {
                let ancestors = get_ancestor_ids(&events, &b.span_id).unwrap();
                prop_assert_eq!(
                    descendants.contains(&b.span_id),
                    ancestors.contains(&a.span_id)
                );
            }
        }
    }

    #[test]
    fn roots_have_no_ancestors(events in arb_events()) {
        for event in events.iter().filter(|e| !resolves(&events, e)) {
            prop_assert!(get_ancestor_ids(&events, &event.span_id).unwrap().is_empty());
        }
    }

    #[test]
    fn toggle_twice_is_identity(events in arb_events(), pick in any::<Index>()) {
        let graph = compile_trace(&trace_of(events)).unwrap();
        prop_assume!(!graph.nodes.is_empty());
        let id = graph.nodes[pick.index(graph.nodes.len())].id.clone();

        let once = toggle_node_expansion(&graph.nodes, &id);
        for (before, after) in graph.nodes.iter().zip(&once) {
            if before.id == id {
                prop_assert_eq!(after.data.expanded, !before.data.expanded);
            } else {
                prop_assert_eq!(before, after);
            }
        }
        prop_assert_eq!(toggle_node_expansion(&once, &id), graph.nodes);
    }

    #[test]
    fn path_highlight_is_complete(
        events in arb_events(),
        mask in prop::collection::vec(any::<bool>(), 24),
    ) {
        let graph = compile_trace(&trace_of(events)).unwrap();
        let path: Vec<String> = graph
            .nodes
            .iter()
            .zip(&mask)
            .filter(|(_, on)| **on)
            .map(|(n, _)| n.id.clone())
            .collect();
        let on_path: HashSet<&str> = path.iter().map(String::as_str).collect();

        let filtered = filter_graph_by_path(&graph.nodes, &graph.edges, path.as_slice());
        for node in &filtered.nodes {
            let expected = if on_path.contains(node.id.as_str()) { 1.0 } else { 0.3 };
            prop_assert_eq!(node.style.opacity, expected);
        }
        for edge in &filtered.edges {
            let both = on_path.contains(edge.source.as_str()) && on_path.contains(edge.target.as_str());
            prop_assert_eq!(edge.style.opacity, if both { 1.0 } else { 0.1 });
        }
    }

    #[test]
    fn layout_places_children_one_level_down_and_leaves_apart(events in arb_events()) {
        let graph = compile_trace(&trace_of(events)).unwrap();

        for edge in &graph.edges {
            let parent = graph.node(&edge.source).unwrap();
            let child = graph.node(&edge.target).unwrap();
            prop_assert_eq!(child.position.y, parent.position.y + 150.0);
        }

        let parents: HashSet<&str> = graph.edges.iter().map(|e| e.source.as_str()).collect();
        let mut leaf_xs: Vec<f64> = graph
            .nodes
            .iter()
            .filter(|n| !parents.contains(n.id.as_str()))
            .map(|n| n.position.x)
            .collect();
        let leaf_count = leaf_xs.len();
        leaf_xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        leaf_xs.dedup();
        prop_assert_eq!(leaf_xs.len(), leaf_count);
    }
}
