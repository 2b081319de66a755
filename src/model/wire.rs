// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{ConnectorId, SegmentId, SpliceId, WireId};

/// A numbered slot a wire end can occupy: a connector cavity or a splice port.
///
/// Indexes are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireEndpoint {
    ConnectorCavity {
        connector_id: ConnectorId,
        cavity_index: u32,
    },
    SplicePort {
        splice_id: SpliceId,
        port_index: u32,
    },
}

impl WireEndpoint {
    pub fn cavity(connector_id: ConnectorId, cavity_index: u32) -> Self {
        Self::ConnectorCavity {
            connector_id,
            cavity_index,
        }
    }

    pub fn port(splice_id: SpliceId, port_index: u32) -> Self {
        Self::SplicePort {
            splice_id,
            port_index,
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            Self::ConnectorCavity { cavity_index, .. } => *cavity_index,
            Self::SplicePort { port_index, .. } => *port_index,
        }
    }

    pub fn is_on_connector(&self, connector_id: &ConnectorId) -> bool {
        matches!(self, Self::ConnectorCavity { connector_id: id, .. } if id == connector_id)
    }

    pub fn is_on_splice(&self, splice_id: &SpliceId) -> bool {
        matches!(self, Self::SplicePort { splice_id: id, .. } if id == splice_id)
    }
}

impl fmt::Display for WireEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectorCavity {
                connector_id,
                cavity_index,
            } => write!(f, "connector {connector_id} cavity {cavity_index}"),
            Self::SplicePort {
                splice_id,
                port_index,
            } => write!(f, "splice {splice_id} port {port_index}"),
        }
    }
}

/// Which end of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WireSide {
    A,
    B,
}

impl WireSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub id: WireId,
    pub name: String,
    pub technical_id: String,
    pub endpoint_a: WireEndpoint,
    pub endpoint_b: WireEndpoint,
    pub route_segment_ids: Vec<SegmentId>,
    pub length_mm: f64,
    pub is_route_locked: bool,
}

impl Wire {
    pub fn uses_connector(&self, connector_id: &ConnectorId) -> bool {
        self.endpoint_a.is_on_connector(connector_id) || self.endpoint_b.is_on_connector(connector_id)
    }

    pub fn uses_splice(&self, splice_id: &SpliceId) -> bool {
        self.endpoint_a.is_on_splice(splice_id) || self.endpoint_b.is_on_splice(splice_id)
    }
}
