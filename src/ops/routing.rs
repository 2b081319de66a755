// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::DispatchError;
use crate::model::{NetworkScope, NodeId, SegmentId, WireEndpoint, WireId};
use crate::query::{build_routing_graph_index, find_shortest_route, walk_ordered_route, Route, RoutingGraph};

pub(super) fn resolve_wire_nodes(
    scope: &NetworkScope,
    wire_id: &WireId,
    endpoint_a: &WireEndpoint,
    endpoint_b: &WireEndpoint,
) -> Result<(NodeId, NodeId), DispatchError> {
    let resolve = |endpoint: &WireEndpoint| {
        scope.node_for_endpoint(endpoint).cloned().ok_or_else(|| {
            DispatchError::Routing(format!(
                "Wire {wire_id}: {endpoint} is not placed on any node."
            ))
        })
    };
    Ok((resolve(endpoint_a)?, resolve(endpoint_b)?))
}

pub(super) fn auto_route(
    graph: &RoutingGraph,
    wire_id: &WireId,
    from: &NodeId,
    to: &NodeId,
) -> Result<Route, DispatchError> {
    find_shortest_route(graph, from, to).ok_or_else(|| {
        DispatchError::Routing(format!(
            "Wire {wire_id}: no route between nodes {from} and {to}."
        ))
    })
}

pub(super) fn locked_route(
    graph: &RoutingGraph,
    wire_id: &WireId,
    from: &NodeId,
    to: &NodeId,
    segment_ids: &[SegmentId],
) -> Result<Route, DispatchError> {
    walk_ordered_route(graph, from, to, segment_ids).ok_or_else(|| {
        DispatchError::Routing(format!(
            "Wire {wire_id}: locked route does not connect nodes {from} and {to}."
        ))
    })
}

/// Re-derives every wire in `scope` against the current topology.
///
/// Auto-routed wires get a fresh shortest route; locked wires keep their segment list and only
/// have their length recomputed. Either every wire resolves and `scope` is updated, or an error is
/// returned and the wires are left as they were.
pub fn recompute_all_routes(scope: &mut NetworkScope) -> Result<(), DispatchError> {
    let graph = build_routing_graph_index(scope.nodes.values(), scope.segments.values());

    let mut rerouted = Vec::with_capacity(scope.wires.len());
    for wire in scope.wires.values() {
        let (from, to) = resolve_wire_nodes(scope, &wire.id, &wire.endpoint_a, &wire.endpoint_b)?;
        let route = if wire.is_route_locked {
            locked_route(&graph, &wire.id, &from, &to, &wire.route_segment_ids)?
        } else {
            auto_route(&graph, &wire.id, &from, &to)?
        };

        let mut wire = wire.clone();
        wire.route_segment_ids = route.segment_ids;
        wire.length_mm = route.length_mm;
        rerouted.push(wire);
    }

    for wire in rerouted {
        scope.wires.upsert(wire.id.clone(), wire);
    }
    Ok(())
}
