// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{CatalogItemId, ConnectorId, NetworkId, NodeId, SegmentId, SpliceId, WireId};
use super::network::Network;
use super::occupancy::OccupancyLedger;
use super::parts::{CatalogItem, Connector, Splice};
use super::table::EntityTable;
use super::topology::{NetworkNode, Segment};
use super::wire::{Wire, WireEndpoint};

pub const DEFAULT_NETWORK_ID: &str = "network-main";
pub const DEFAULT_NETWORK_TECHNICAL_ID: &str = "NET-MAIN";

/// Everything that belongs to one network.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkScope {
    pub catalog_items: EntityTable<CatalogItemId, CatalogItem>,
    pub connectors: EntityTable<ConnectorId, Connector>,
    pub splices: EntityTable<SpliceId, Splice>,
    pub nodes: EntityTable<NodeId, NetworkNode>,
    pub segments: EntityTable<SegmentId, Segment>,
    pub wires: EntityTable<WireId, Wire>,
    pub occupancy: OccupancyLedger,
}

impl NetworkScope {
    pub fn node_for_connector(&self, connector_id: &ConnectorId) -> Option<&NetworkNode> {
        self.nodes
            .values()
            .find(|node| node.connector_id() == Some(connector_id))
    }

    pub fn node_for_splice(&self, splice_id: &SpliceId) -> Option<&NetworkNode> {
        self.nodes
            .values()
            .find(|node| node.splice_id() == Some(splice_id))
    }

    /// Routing node a wire end attaches to, if its connector/splice has been placed.
    pub fn node_for_endpoint(&self, endpoint: &WireEndpoint) -> Option<&NodeId> {
        let node = match endpoint {
            WireEndpoint::ConnectorCavity { connector_id, .. } => {
                self.node_for_connector(connector_id)
            }
            WireEndpoint::SplicePort { splice_id, .. } => self.node_for_splice(splice_id),
        }?;
        Some(&node.id)
    }

    /// Number of slots on the part an endpoint points at.
    pub fn endpoint_capacity(&self, endpoint: &WireEndpoint) -> Option<u32> {
        match endpoint {
            WireEndpoint::ConnectorCavity { connector_id, .. } => self
                .connectors
                .get(connector_id)
                .map(|connector| connector.cavity_count),
            WireEndpoint::SplicePort { splice_id, .. } => {
                self.splices.get(splice_id).map(|splice| splice.port_count)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    CatalogItem,
    Connector,
    Splice,
    Node,
    Segment,
    Wire,
}

/// UI selection. Carried in state but never read by domain rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub kind: SelectionKind,
    pub id: String,
}

/// Top-level engine state.
///
/// Exactly one network's entities are live in `scope`; every other network's scope is parked in
/// `stored_scopes` under its id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkState {
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub networks: EntityTable<NetworkId, Network>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_network_id: Option<NetworkId>,
    pub stored_scopes: BTreeMap<NetworkId, NetworkScope>,
    pub scope: NetworkScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

impl NetworkState {
    /// A state with a single empty default network selected.
    pub fn initial(created_at: &str) -> Self {
        let mut state = Self::default();
        let network_id = NetworkId::new(DEFAULT_NETWORK_ID).expect("static network id");
        state.networks.upsert(
            network_id.clone(),
            Network {
                id: network_id.clone(),
                name: "Main network".to_owned(),
                technical_id: DEFAULT_NETWORK_TECHNICAL_ID.to_owned(),
                description: None,
                created_at: created_at.to_owned(),
                updated_at: created_at.to_owned(),
            },
        );
        state.active_network_id = Some(network_id);
        state
    }

    pub fn active_network(&self) -> Option<&Network> {
        self.networks.get(self.active_network_id.as_ref()?)
    }

    /// Scope of any network, live or parked.
    pub fn scope_of(&self, network_id: &NetworkId) -> Option<&NetworkScope> {
        if self.active_network_id.as_ref() == Some(network_id) {
            return Some(&self.scope);
        }
        self.stored_scopes.get(network_id)
    }
}
