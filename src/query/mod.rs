// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only routing queries over a network scope.
//!
//! The graph index and route finder are pure functions of nodes and segments; the reducer calls
//! them whenever topology changes or a wire is saved, locked, or reset.

pub mod graph;
pub mod route;

pub use graph::{build_routing_graph_index, RoutingEdge, RoutingGraph};
pub use route::{find_shortest_route, is_ordered_route_valid, walk_ordered_route, Route};
