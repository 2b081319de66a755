// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{ConnectorId, NodeId, SegmentId, SpliceId};

/// What a routing node stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Connector { connector_id: ConnectorId },
    Splice { splice_id: SpliceId },
    Intermediate { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl NetworkNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self { id, kind }
    }

    pub fn connector_id(&self) -> Option<&ConnectorId> {
        match &self.kind {
            NodeKind::Connector { connector_id } => Some(connector_id),
            _ => None,
        }
    }

    pub fn splice_id(&self) -> Option<&SpliceId> {
        match &self.kind {
            NodeKind::Splice { splice_id } => Some(splice_id),
            _ => None,
        }
    }
}

/// A physical cable section between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub length_mm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_network_tag: Option<String>,
}

impl Segment {
    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.node_a == node_id || &self.node_b == node_id
    }
}
