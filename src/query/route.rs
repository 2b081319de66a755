// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use super::graph::RoutingGraph;
use crate::model::{NodeId, SegmentId};

/// A walk through the segment graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub node_ids: Vec<NodeId>,
    pub segment_ids: Vec<SegmentId>,
    pub length_mm: f64,
}

impl Route {
    fn trivial(node_id: &NodeId) -> Self {
        Self {
            node_ids: vec![node_id.clone()],
            segment_ids: Vec::new(),
            length_mm: 0.0,
        }
    }

    fn extend(&self, segment_id: &SegmentId, to_node_id: &NodeId, length_mm: f64) -> Self {
        let mut node_ids = Vec::with_capacity(self.node_ids.len() + 1);
        node_ids.extend(self.node_ids.iter().cloned());
        node_ids.push(to_node_id.clone());

        let mut segment_ids = Vec::with_capacity(self.segment_ids.len() + 1);
        segment_ids.extend(self.segment_ids.iter().cloned());
        segment_ids.push(segment_id.clone());

        Self {
            node_ids,
            segment_ids,
            length_mm: self.length_mm + length_mm,
        }
    }

    pub fn end_node_id(&self) -> &NodeId {
        self.node_ids.last().expect("route always holds its start node")
    }
}

/// Preference order between two routes ending at the same node: shorter length, then fewer
/// segments, then the lexicographically smaller segment id sequence.
fn cmp_routes(a: &Route, b: &Route) -> Ordering {
    a.length_mm
        .total_cmp(&b.length_mm)
        .then_with(|| a.segment_ids.len().cmp(&b.segment_ids.len()))
        .then_with(|| a.segment_ids.cmp(&b.segment_ids))
}

/// Priority queue entry. Ordering is reversed so `BinaryHeap` pops the best candidate first.
#[derive(Debug)]
struct QueueEntry(Route);

impl QueueEntry {
    fn cmp_best_first(&self, other: &Self) -> Ordering {
        cmp_routes(&self.0, &other.0).then_with(|| self.0.end_node_id().cmp(other.0.end_node_id()))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cmp_best_first(self)
    }
}

/// Least-cost route between two nodes, or `None` when `to` is unreachable.
///
/// Ties are broken by segment count and then by the segment id sequence, and edges are relaxed in
/// segment id order, so the result depends only on the graph contents.
pub fn find_shortest_route(graph: &RoutingGraph, from: &NodeId, to: &NodeId) -> Option<Route> {
    if from == to {
        return Some(Route::trivial(from));
    }
    if !graph.contains_node(from) || !graph.contains_node(to) {
        return None;
    }

    let mut best: BTreeMap<NodeId, Route> = BTreeMap::new();
    let mut queue = BinaryHeap::new();

    let start = Route::trivial(from);
    best.insert(from.clone(), start.clone());
    queue.push(QueueEntry(start));

    while let Some(QueueEntry(candidate)) = queue.pop() {
        let node_id = candidate.end_node_id().clone();
        let is_current = best
            .get(&node_id)
            .is_some_and(|known| cmp_routes(known, &candidate) == Ordering::Equal);
        if !is_current {
            continue;
        }
        if &node_id == to {
            return Some(candidate);
        }

        for edge in graph.edges_from(&node_id) {
            if candidate.node_ids.contains(&edge.to_node_id) {
                continue;
            }
            let next = candidate.extend(&edge.segment_id, &edge.to_node_id, edge.length_mm);
            let improves = best
                .get(&edge.to_node_id)
                .map_or(true, |known| cmp_routes(&next, known) == Ordering::Less);
            if improves {
                best.insert(edge.to_node_id.clone(), next.clone());
                queue.push(QueueEntry(next));
            }
        }
    }

    None
}

/// Follows `segment_ids` in order starting at `from`. Returns the walk if every segment continues
/// from where the previous one ended and the walk stops at `to`.
pub fn walk_ordered_route(
    graph: &RoutingGraph,
    from: &NodeId,
    to: &NodeId,
    segment_ids: &[SegmentId],
) -> Option<Route> {
    let mut route = Route::trivial(from);
    for segment_id in segment_ids {
        let current = route.end_node_id();
        let edge = graph
            .edges_from(current)
            .iter()
            .find(|edge| &edge.segment_id == segment_id)?;
        route = route.extend(&edge.segment_id, &edge.to_node_id, edge.length_mm);
    }
    (route.end_node_id() == to).then_some(route)
}

pub fn is_ordered_route_valid(
    graph: &RoutingGraph,
    from: &NodeId,
    to: &NodeId,
    segment_ids: &[SegmentId],
) -> bool {
    walk_ordered_route(graph, from, to, segment_ids).is_some()
}
