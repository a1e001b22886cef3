//! Property-based tests for the component registry.
//!
//! Edge streams are drawn over a small vertex alphabet so that redundant
//! edges, self-loops and long merge chains all show up frequently.

use std::collections::{HashMap, HashSet};

use concord_core::{ComponentRegistry, EdgeOutcome, EntityPair, Partition};
use proptest::prelude::*;

use concord_test_support::proptest_profile::suite_config;

const ALPHABET: u8 = 12;
const MAX_EDGES: usize = 48;

type Edge = (String, String);

fn vertex() -> impl Strategy<Value = String> {
    (0..ALPHABET).prop_map(|index| format!("v-{index}"))
}

fn edge_stream() -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::vec((vertex(), vertex()), 0..MAX_EDGES)
}

fn build(edges: &[Edge]) -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    for (left, right) in edges {
        registry.add_edge(left, right);
    }
    registry
}

type Snapshot = (Vec<(String, u64)>, Vec<(u64, Vec<String>)>, usize, u64);

fn snapshot(registry: &ComponentRegistry) -> Snapshot {
    let mapping = registry
        .sorted_assignments()
        .into_iter()
        .map(|(vertex, component)| (vertex.to_owned(), component.get()))
        .collect();
    let members = registry
        .components()
        .into_iter()
        .map(|(component, members)| (component.get(), members.to_vec()))
        .collect();
    (
        mapping,
        members,
        registry.live_component_count(),
        registry.next_component_id().get(),
    )
}

/// Reference partition computed by flood fill over an adjacency list.
fn oracle_partition(edges: &[Edge]) -> Partition {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for (left, right) in edges {
        adjacency.entry(left).or_default().push(right);
        adjacency.entry(right).or_default().push(left);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut groups = Vec::new();
    let mut roots: Vec<&str> = adjacency.keys().copied().collect();
    roots.sort_unstable();
    for root in roots {
        if !seen.insert(root) {
            continue;
        }
        let mut group = vec![root];
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            for next in adjacency.get(current).into_iter().flatten().copied() {
                if seen.insert(next) {
                    group.push(next);
                    stack.push(next);
                }
            }
        }
        groups.push(group);
    }
    Partition::from_groups(groups)
}

proptest! {
    #![proptest_config(suite_config(256))]

    #[test]
    fn invariants_hold_after_every_edge(edges in edge_stream()) {
        let mut registry = ComponentRegistry::new();
        for (left, right) in &edges {
            registry.add_edge(left, right);
            prop_assert_eq!(registry.invariants().check_all(), Ok(()));
        }
    }

    #[test]
    fn live_count_moves_by_at_most_one(edges in edge_stream()) {
        let mut registry = ComponentRegistry::new();
        for (left, right) in &edges {
            let before = registry.live_component_count();
            let outcome = registry.add_edge(left, right);
            let after = registry.live_component_count();
            match outcome {
                EdgeOutcome::Created { .. } => prop_assert_eq!(after, before + 1),
                EdgeOutcome::Merged { .. } => prop_assert_eq!(after + 1, before),
                EdgeOutcome::Extended { .. } | EdgeOutcome::Redundant { .. } => {
                    prop_assert_eq!(after, before);
                }
            }
        }
    }

    #[test]
    fn final_partition_matches_flood_fill(edges in edge_stream()) {
        let registry = build(&edges);
        let partition = registry.partition();
        prop_assert_eq!(&partition, &oracle_partition(&edges));
        prop_assert_eq!(partition.len(), registry.live_component_count());
        let grouped: usize = partition.groups().iter().map(Vec::len).sum();
        prop_assert_eq!(grouped, registry.vertex_count());
    }

    #[test]
    fn reversing_edges_changes_no_assignment(edges in edge_stream()) {
        let reversed: Vec<Edge> = edges
            .iter()
            .cloned()
            .map(|edge| EntityPair::from(edge).reversed().into_parts())
            .collect();
        let forward = build(&edges);
        let backward = build(&reversed);

        prop_assert_eq!(forward.sorted_assignments(), backward.sorted_assignments());
        prop_assert_eq!(forward.live_component_count(), backward.live_component_count());
        prop_assert_eq!(forward.next_component_id(), backward.next_component_id());
        prop_assert_eq!(forward.partition(), backward.partition());
    }

    #[test]
    fn permuted_streams_yield_the_same_partition(
        (edges, shuffled) in edge_stream()
            .prop_flat_map(|edges| (Just(edges.clone()), Just(edges).prop_shuffle()))
    ) {
        let original = build(&edges);
        let permuted = build(&shuffled);
        prop_assert_eq!(original.partition(), permuted.partition());
        prop_assert_eq!(original.live_component_count(), permuted.live_component_count());
    }

    #[test]
    fn replaying_seen_edges_is_a_no_op(edges in edge_stream()) {
        let mut registry = build(&edges);
        let before = snapshot(&registry);
        for (left, right) in &edges {
            let outcome = registry.add_edge(left, right);
            prop_assert!(
                matches!(outcome, EdgeOutcome::Redundant { .. }),
                "replayed edge {}-{} produced {:?}",
                left,
                right,
                outcome
            );
        }
        prop_assert_eq!(snapshot(&registry), before);
    }

    #[test]
    fn joined_vertices_never_separate(edges in edge_stream()) {
        let mut registry = ComponentRegistry::new();
        let mut joined: Vec<(String, String)> = Vec::new();
        for (left, right) in &edges {
            registry.add_edge(left, right);
            joined.push((left.clone(), right.clone()));
            for (a, b) in &joined {
                prop_assert_eq!(registry.component_of(a), registry.component_of(b));
            }
        }
    }

    #[test]
    fn live_identifiers_never_increase_for_a_vertex(edges in edge_stream()) {
        let mut registry = ComponentRegistry::new();
        let mut last_seen: HashMap<String, u64> = HashMap::new();
        for (left, right) in &edges {
            registry.add_edge(left, right);
            for (vertex, component) in registry.vertex_to_component() {
                let current = component.get();
                if let Some(previous) = last_seen.insert(vertex.clone(), current) {
                    prop_assert!(current <= previous);
                }
            }
        }
    }
}
