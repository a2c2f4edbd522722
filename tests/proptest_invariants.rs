//! Property-based invariant tests for graph analysis, ordering and
//! highlighting.
//!
//! 1. A node's depth is 0 without parents, else one more than its shallowest parent.
//! 2. Inverting and reverting adjacency keeps every edge.
//! 3. The identity order changes nothing.
//! 4. Any order carries depths and edges to the new positions.
//! 5. Built-in sort strategies always produce permutations.
//! 6. Highlight depths are shortest distances from the origin.
//! 7. Reset leaves no highlight tag behind.
//! 8. Arcs stay within the maximum arc height of the axis.

use std::collections::VecDeque;

use proptest::prelude::*;
use thread_arcs::graph::revert;
use thread_arcs::{
    Adjacency, ArcTarget, Chain, Direction, GraphIndex, LayoutConfig, LayoutEngine,
    RetainedSurface, SortStrategy, ThreadArcs, ThreadArcsOptions, invert,
};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Random DAG: edges go forward in a hidden topological order, which is
/// then shuffled onto node labels so index order says nothing.
fn dag_strategy() -> impl Strategy<Value = Adjacency> {
    (1usize..=16)
        .prop_flat_map(|len| {
            let edges = prop::collection::vec((0..len, 0..len, any::<bool>()), 0..=len * 2);
            let labels = Just((0..len).collect::<Vec<_>>()).prop_shuffle();
            (Just(len), edges, labels)
        })
        .prop_map(|(len, edges, labels)| {
            let mut adjacency: Adjacency = vec![Vec::new(); len];
            for (a, b, negative) in edges {
                if a == b {
                    continue;
                }
                let (from, to) = (labels[a.min(b)], labels[a.max(b)]);
                if adjacency[from].iter().any(|target| target.index == to) {
                    continue;
                }
                let dir = if negative {
                    Direction::Negative
                } else {
                    Direction::Positive
                };
                adjacency[from].push(ArcTarget::new(to, dir));
            }
            adjacency
        })
}

fn dag_with_order() -> impl Strategy<Value = (Adjacency, Vec<usize>)> {
    dag_strategy().prop_flat_map(|adjacency| {
        let order = Just((0..adjacency.len()).collect::<Vec<_>>()).prop_shuffle();
        (Just(adjacency), order)
    })
}

fn dag_with_origins() -> impl Strategy<Value = (Adjacency, Vec<usize>)> {
    dag_strategy().prop_flat_map(|adjacency| {
        let len = adjacency.len();
        (Just(adjacency), prop::collection::vec(0..len, 1..=3))
    })
}

fn edge_set(adjacency: &Adjacency) -> Vec<(usize, usize)> {
    let mut edges = adjacency
        .iter()
        .enumerate()
        .flat_map(|(from, targets)| targets.iter().map(move |target| (from, target.index)))
        .collect::<Vec<_>>();
    edges.sort_unstable();
    edges
}

/// Hop count of the shortest path from `origin` to every node.
fn hops_from(adjacency: &Adjacency, origin: usize) -> Vec<Option<usize>> {
    let mut hops = vec![None; adjacency.len()];
    let mut queue = VecDeque::from([(origin, 0usize)]);
    while let Some((node, distance)) = queue.pop_front() {
        for target in &adjacency[node] {
            if hops[target.index].is_none() {
                hops[target.index] = Some(distance + 1);
                queue.push_back((target.index, distance + 1));
            }
        }
    }
    hops
}

fn drawn(adjacency: Adjacency) -> ThreadArcs<RetainedSurface, usize> {
    let nodes = (0..adjacency.len()).collect();
    let mut diagram =
        ThreadArcs::new(RetainedSurface::new(), nodes, adjacency, &ThreadArcsOptions::default())
            .expect("generated graphs are acyclic");
    diagram.draw();
    diagram
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Depth is one more than the shallowest parent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn depth_follows_shallowest_parent(adjacency in dag_strategy()) {
        let graph = GraphIndex::new(adjacency).unwrap();
        for (node, parents) in graph.inverse().iter().enumerate() {
            let expected = parents
                .iter()
                .map(|&parent| graph.depths()[parent] + 1)
                .min()
                .unwrap_or(0);
            prop_assert_eq!(graph.depths()[node], expected, "node {}", node);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Invert / revert keeps every edge
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn revert_undoes_invert(adjacency in dag_strategy()) {
        let reverted = revert(&invert(&adjacency));
        prop_assert_eq!(edge_set(&reverted), edge_set(&adjacency));
        prop_assert!(reverted.iter().flatten().all(|target| target.dir == Direction::Positive));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Identity order is a no-op on structure
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn identity_order_keeps_structure(adjacency in dag_strategy()) {
        let graph = GraphIndex::new(adjacency).unwrap();
        let identity = (0..graph.len()).collect::<Vec<_>>();
        let (reordered, positions) = graph.reorder(&identity).unwrap();

        prop_assert_eq!(&positions, &identity);
        prop_assert_eq!(reordered.depths(), graph.depths());
        prop_assert_eq!(reordered.inverse(), graph.inverse());
        prop_assert_eq!(edge_set(reordered.adjacency()), edge_set(graph.adjacency()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Reordering moves depths and edges with their nodes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reorder_relabels_consistently((adjacency, order) in dag_with_order()) {
        let graph = GraphIndex::new(adjacency).unwrap();
        let (reordered, positions) = graph.reorder(&order).unwrap();

        for (new, &old) in order.iter().enumerate() {
            prop_assert_eq!(positions[old], new);
            prop_assert_eq!(reordered.depths()[new], graph.depths()[old]);
        }

        let mut expected = edge_set(graph.adjacency())
            .into_iter()
            .map(|(from, to)| (positions[from], positions[to]))
            .collect::<Vec<_>>();
        expected.sort_unstable();
        prop_assert_eq!(edge_set(reordered.adjacency()), expected);

        for (from, target) in reordered.edges() {
            prop_assert_eq!(target.dir, Direction::for_depth(reordered.depths()[from]));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Sort strategies produce permutations
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn strategies_are_permutations(adjacency in dag_strategy()) {
        let graph = GraphIndex::new(adjacency).unwrap();
        for strategy in [SortStrategy::ByGeneration, SortStrategy::DepthZeroFirst] {
            let mut order = strategy.order(&graph);
            order.sort_unstable();
            prop_assert_eq!(order, (0..graph.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn by_generation_is_monotone_in_depth(adjacency in dag_strategy()) {
        let graph = GraphIndex::new(adjacency).unwrap();
        let order = SortStrategy::ByGeneration.order(&graph);
        for pair in order.windows(2) {
            prop_assert!(graph.depths()[pair[0]] <= graph.depths()[pair[1]]);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Highlight depths are shortest distances
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn highlight_tags_shortest_distance((adjacency, origins) in dag_with_origins()) {
        let origin = origins[0];
        let hops = hops_from(&adjacency, origin);
        let mut diagram = drawn(adjacency);
        diagram.highlight(origin).unwrap();

        for point in diagram.scene().points() {
            let expected = hops[point.index].map(|hops| hops - 1);
            prop_assert_eq!(point.depths.get(Chain::Descendants), expected, "point {}", point.index);
        }
        for arc in diagram.scene().arcs() {
            if let Some(depth) = arc.depths.descendant {
                let source_hops = if arc.from == origin { Some(0) } else { hops[arc.from] };
                prop_assert_eq!(Some(depth), source_hops);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Reset clears every tag
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reset_clears_all_tags((adjacency, origins) in dag_with_origins()) {
        let mut diagram = drawn(adjacency);
        for &origin in &origins {
            diagram.highlight(origin).unwrap();
        }
        diagram.reset_highlighting();

        prop_assert!(diagram.scene().points().iter().all(|point| point.depths.is_unset()));
        prop_assert!(diagram.scene().arcs().iter().all(|arc| arc.depths.is_unset()));
        for (_, element) in diagram.surface().iter() {
            prop_assert!(
                element
                    .classes
                    .iter()
                    .all(|class| class != "highlight" && Chain::parse_class(class).is_none()),
                "left over classes: {:?}",
                element.classes
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Arc heights are bounded
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arcs_stay_within_max_height(adjacency in dag_strategy(), lambda in 0.1f64..2.0) {
        let graph = GraphIndex::new(adjacency).unwrap();
        let config = LayoutConfig {
            lambda,
            ..LayoutConfig::default()
        };
        let layout = LayoutEngine::new(config, &graph);

        for (from, target) in graph.edges() {
            let height = layout.arc_height(
                layout.position(from),
                layout.position(target.index),
                target.dir,
            );
            let offset = (height - config.axis_pos).abs();
            prop_assert!(offset <= config.max_arc_height + 1e-9, "offset {} for {}->{}", offset, from, target.index);
        }
    }
}
