// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! All records are plain values: the reducer clones the state it is handed, edits the copy, and
//! returns it. Nothing in here enforces cross-entity rules; that is the job of [`crate::ops`].

pub mod ids;
pub mod network;
pub mod occupancy;
pub mod parts;
pub mod state;
pub mod table;
pub mod topology;
pub mod wire;

pub use ids::{
    CatalogItemId, ConnectorId, Id, IdError, NetworkId, NodeId, SegmentId, SpliceId, WireId,
};
pub use network::Network;
pub use occupancy::{
    ClaimConflict, ClaimOutcome, OccupancyEntry, OccupancyLedger, OccupantRef, OccupantRefError,
    Slot,
};
pub use parts::{CatalogItem, Connector, Splice, MANUFACTURER_REFERENCE_MAX_LEN};
pub use state::{NetworkScope, NetworkState, Selection, SelectionKind};
pub use table::EntityTable;
pub use topology::{NetworkNode, NodeKind, Segment};
pub use wire::{Wire, WireEndpoint, WireSide};
