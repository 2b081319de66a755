// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use crate::model::{NetworkNode, NodeId, Segment, SegmentId};

/// One direction of a segment. Every usable segment contributes two mirrored edges.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingEdge {
    pub segment_id: SegmentId,
    pub from_node_id: NodeId,
    pub to_node_id: NodeId,
    pub length_mm: f64,
    pub sub_network_tag: Option<String>,
}

type EdgeList = SmallVec<[RoutingEdge; 4]>;

/// Adjacency index over the segment graph.
///
/// Node ids, segment ids, and each node's outgoing edges are kept sorted, so two graphs built from
/// the same records compare equal regardless of input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutingGraph {
    node_ids: Vec<NodeId>,
    segment_ids: Vec<SegmentId>,
    edges_by_node_id: BTreeMap<NodeId, EdgeList>,
}

impl RoutingGraph {
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    pub fn segment_ids(&self) -> &[SegmentId] {
        &self.segment_ids
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.edges_by_node_id.contains_key(node_id)
    }

    /// Outgoing edges of `node_id`, ordered by segment id then target node id.
    pub fn edges_from(&self, node_id: &NodeId) -> &[RoutingEdge] {
        self.edges_by_node_id
            .get(node_id)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }
}

/// Segments that cannot carry a route are left out silently.
fn is_routable(segment: &Segment, known_nodes: &BTreeSet<NodeId>) -> bool {
    segment.node_a != segment.node_b
        && known_nodes.contains(&segment.node_a)
        && known_nodes.contains(&segment.node_b)
        && segment.length_mm.is_finite()
        && segment.length_mm > 0.0
}

pub fn build_routing_graph_index<'a>(
    nodes: impl IntoIterator<Item = &'a NetworkNode>,
    segments: impl IntoIterator<Item = &'a Segment>,
) -> RoutingGraph {
    let known_nodes = nodes
        .into_iter()
        .map(|node| node.id.clone())
        .collect::<BTreeSet<_>>();

    let mut edges_by_node_id: BTreeMap<NodeId, EdgeList> = known_nodes
        .iter()
        .map(|node_id| (node_id.clone(), EdgeList::new()))
        .collect();
    let mut segment_ids = BTreeSet::new();

    for segment in segments {
        if !is_routable(segment, &known_nodes) {
            continue;
        }
        if !segment_ids.insert(segment.id.clone()) {
            continue;
        }

        for (from, to) in [
            (&segment.node_a, &segment.node_b),
            (&segment.node_b, &segment.node_a),
        ] {
            edges_by_node_id
                .entry(from.clone())
                .or_default()
                .push(RoutingEdge {
                    segment_id: segment.id.clone(),
                    from_node_id: from.clone(),
                    to_node_id: to.clone(),
                    length_mm: segment.length_mm,
                    sub_network_tag: segment.sub_network_tag.clone(),
                });
        }
    }

    for edges in edges_by_node_id.values_mut() {
        edges.sort_by(|a, b| {
            a.segment_id
                .cmp(&b.segment_id)
                .then_with(|| a.to_node_id.cmp(&b.to_node_id))
        });
    }

    RoutingGraph {
        node_ids: known_nodes.into_iter().collect(),
        segment_ids: segment_ids.into_iter().collect(),
        edges_by_node_id,
    }
}
