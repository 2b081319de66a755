// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use proptest::prelude::*;
use wirenet::model::{NetworkNode, NodeId, NodeKind, Segment, SegmentId};
use wirenet::query::{
    build_routing_graph_index, find_shortest_route, is_ordered_route_valid, RoutingGraph,
};

const MAX_NODES: usize = 7;

fn node_id(index: usize) -> NodeId {
    NodeId::new(format!("N{index}")).expect("node id")
}

fn nodes(count: usize) -> Vec<NetworkNode> {
    (0..count)
        .map(|index| {
            NetworkNode::new(
                node_id(index),
                NodeKind::Intermediate {
                    label: format!("N{index}"),
                },
            )
        })
        .collect()
}

fn segments(raw: &[(usize, usize, u8)], node_count: usize) -> Vec<Segment> {
    raw.iter()
        .enumerate()
        .map(|(index, (a, b, length_mm))| Segment {
            id: SegmentId::new(format!("S{index:02}")).expect("segment id"),
            node_a: node_id(a % node_count),
            node_b: node_id(b % node_count),
            length_mm: f64::from(*length_mm),
            sub_network_tag: None,
        })
        .collect()
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, u8)>)> {
    (2..=MAX_NODES).prop_flat_map(|node_count| {
        (
            Just(node_count),
            prop::collection::vec((0..MAX_NODES, 0..MAX_NODES, 0u8..12), 0..16),
        )
    })
}

fn all_routes(graph: &RoutingGraph, node_count: usize) -> Vec<Option<(Vec<SegmentId>, f64)>> {
    let mut routes = Vec::new();
    for from in 0..node_count {
        for to in 0..node_count {
            let route = find_shortest_route(graph, &node_id(from), &node_id(to));
            routes.push(route.map(|route| (route.segment_ids, route.length_mm)));
        }
    }
    routes
}

proptest! {
    #[test]
    fn routes_do_not_depend_on_insertion_order(
        (node_count, raw) in graph_strategy(),
        rotate in 0usize..16,
    ) {
        let nodes = nodes(node_count);
        let segments = segments(&raw, node_count);

        let mut shuffled = segments.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let shift = rotate % shuffled.len();
            shuffled.rotate_left(shift);
        }
        let mut shuffled_nodes = nodes.clone();
        shuffled_nodes.reverse();

        let graph = build_routing_graph_index(&nodes, &segments);
        let shuffled_graph = build_routing_graph_index(&shuffled_nodes, &shuffled);
        prop_assert_eq!(all_routes(&graph, node_count), all_routes(&shuffled_graph, node_count));
    }

    #[test]
    fn returned_routes_walk_from_start_to_end(
        (node_count, raw) in graph_strategy(),
    ) {
        let nodes = nodes(node_count);
        let segments = segments(&raw, node_count);
        let graph = build_routing_graph_index(&nodes, &segments);

        for from in 0..node_count {
            for to in 0..node_count {
                let (from, to) = (node_id(from), node_id(to));
                let Some(route) = find_shortest_route(&graph, &from, &to) else {
                    continue;
                };
                prop_assert!(is_ordered_route_valid(&graph, &from, &to, &route.segment_ids));
                prop_assert_eq!(route.node_ids.first(), Some(&from));
                prop_assert_eq!(route.node_ids.last(), Some(&to));
                prop_assert!(route.segment_ids.len() < node_count);

                let total: f64 = route
                    .segment_ids
                    .iter()
                    .map(|id| {
                        segments
                            .iter()
                            .find(|segment| &segment.id == id)
                            .map_or(f64::NAN, |segment| segment.length_mm)
                    })
                    .sum();
                prop_assert_eq!(total, route.length_mm);
            }
        }
    }

    #[test]
    fn routes_are_symmetric_in_length(
        (node_count, raw) in graph_strategy(),
    ) {
        let nodes = nodes(node_count);
        let segments = segments(&raw, node_count);
        let graph = build_routing_graph_index(&nodes, &segments);

        for from in 0..node_count {
            for to in 0..node_count {
                let forward = find_shortest_route(&graph, &node_id(from), &node_id(to));
                let backward = find_shortest_route(&graph, &node_id(to), &node_id(from));
                prop_assert_eq!(
                    forward.map(|route| route.length_mm),
                    backward.map(|route| route.length_mm)
                );
            }
        }
    }
}
