// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Action vocabulary and the reducer that applies it.
//!
//! [`try_apply`] validates an [`Action`] against the current state and either returns a new state
//! or a [`DispatchError`]; the input state is never touched. [`dispatch`] is the lenient form used
//! by hosts: a rejected action yields the unchanged state with `last_error` set.

use serde::{Deserialize, Serialize};

use crate::model::{
    CatalogItem, CatalogItemId, ClaimConflict, ClaimOutcome, Connector, ConnectorId, Network,
    NetworkId, NetworkNode, NetworkScope, NetworkState, NodeId, NodeKind, OccupantRef, Segment,
    SegmentId, Selection, SelectionKind, Splice, SpliceId, Wire, WireEndpoint, WireId,
    MANUFACTURER_REFERENCE_MAX_LEN,
};
use crate::query::build_routing_graph_index;

mod network;
mod routing;

pub use routing::recompute_all_routes;

/// Every edit the engine understands.
///
/// Serialized as `{"type": "<family>/<verb>", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Catalog(CatalogAction),
    Connector(ConnectorAction),
    Splice(SpliceAction),
    Node(NodeAction),
    Segment(SegmentAction),
    Wire(WireAction),
    Network(NetworkAction),
    Ui(UiAction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum CatalogAction {
    #[serde(rename = "catalog/upsert")]
    Upsert(CatalogItemInput),
    #[serde(rename = "catalog/remove")]
    Remove { id: CatalogItemId },
}

/// Counts arrive as raw numbers and are checked for integer-ness by the reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItemInput {
    pub id: CatalogItemId,
    pub manufacturer_reference: String,
    pub connection_count: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit_price_excl_tax: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ConnectorAction {
    #[serde(rename = "connector/upsert")]
    Upsert(ConnectorInput),
    #[serde(rename = "connector/remove")]
    Remove { id: ConnectorId },
    #[serde(rename = "connector/occupyCavity")]
    OccupyCavity {
        connector_id: ConnectorId,
        cavity_index: u32,
        occupant_ref: String,
    },
    #[serde(rename = "connector/releaseCavity")]
    ReleaseCavity {
        connector_id: ConnectorId,
        cavity_index: u32,
        expected_occupant_ref: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorInput {
    pub id: ConnectorId,
    pub name: String,
    pub technical_id: String,
    pub cavity_count: f64,
    #[serde(default)]
    pub catalog_item_id: Option<CatalogItemId>,
    #[serde(default)]
    pub manufacturer_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SpliceAction {
    #[serde(rename = "splice/upsert")]
    Upsert(SpliceInput),
    #[serde(rename = "splice/remove")]
    Remove { id: SpliceId },
    #[serde(rename = "splice/occupyPort")]
    OccupyPort {
        splice_id: SpliceId,
        port_index: u32,
        occupant_ref: String,
    },
    #[serde(rename = "splice/releasePort")]
    ReleasePort {
        splice_id: SpliceId,
        port_index: u32,
        expected_occupant_ref: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpliceInput {
    pub id: SpliceId,
    pub name: String,
    pub technical_id: String,
    pub port_count: f64,
    #[serde(default)]
    pub catalog_item_id: Option<CatalogItemId>,
    #[serde(default)]
    pub manufacturer_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum NodeAction {
    #[serde(rename = "node/upsert")]
    Upsert(NetworkNode),
    #[serde(rename = "node/remove")]
    Remove { id: NodeId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SegmentAction {
    #[serde(rename = "segment/upsert")]
    Upsert(Segment),
    #[serde(rename = "segment/remove")]
    Remove { id: SegmentId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WireAction {
    #[serde(rename = "wire/save")]
    Save(WireInput),
    #[serde(rename = "wire/lockRoute")]
    LockRoute {
        wire_id: WireId,
        segment_ids: Vec<SegmentId>,
    },
    #[serde(rename = "wire/resetRoute")]
    ResetRoute { wire_id: WireId },
    #[serde(rename = "wire/remove")]
    Remove { id: WireId },
}

/// Route and length are always derived, never supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireInput {
    pub id: WireId,
    pub name: String,
    pub technical_id: String,
    pub endpoint_a: WireEndpoint,
    pub endpoint_b: WireEndpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum NetworkAction {
    #[serde(rename = "network/create")]
    Create(NetworkInput),
    #[serde(rename = "network/select")]
    Select { network_id: NetworkId },
    #[serde(rename = "network/rename")]
    Rename {
        network_id: NetworkId,
        name: String,
        updated_at: String,
    },
    #[serde(rename = "network/duplicate")]
    Duplicate {
        source_network_id: NetworkId,
        network: NetworkInput,
    },
    #[serde(rename = "network/delete")]
    Delete { network_id: NetworkId },
    #[serde(rename = "network/importMany")]
    ImportMany { networks: Vec<NetworkImport> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInput {
    pub id: NetworkId,
    pub name: String,
    pub technical_id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
}

/// A network plus its entities, as produced by an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkImport {
    pub network: Network,
    #[serde(default)]
    pub scope: NetworkScope,
}

/// Selection-only actions. They never touch domain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum UiAction {
    #[serde(rename = "ui/select")]
    Select(Selection),
    #[serde(rename = "ui/clearSelection")]
    ClearSelection,
    #[serde(rename = "ui/clearError")]
    ClearError,
}

impl Action {
    /// Wire-format type tag, also used as the undo label.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Catalog(action) => match action {
                CatalogAction::Upsert(_) => "catalog/upsert",
                CatalogAction::Remove { .. } => "catalog/remove",
            },
            Self::Connector(action) => match action {
                ConnectorAction::Upsert(_) => "connector/upsert",
                ConnectorAction::Remove { .. } => "connector/remove",
                ConnectorAction::OccupyCavity { .. } => "connector/occupyCavity",
                ConnectorAction::ReleaseCavity { .. } => "connector/releaseCavity",
            },
            Self::Splice(action) => match action {
                SpliceAction::Upsert(_) => "splice/upsert",
                SpliceAction::Remove { .. } => "splice/remove",
                SpliceAction::OccupyPort { .. } => "splice/occupyPort",
                SpliceAction::ReleasePort { .. } => "splice/releasePort",
            },
            Self::Node(action) => match action {
                NodeAction::Upsert(_) => "node/upsert",
                NodeAction::Remove { .. } => "node/remove",
            },
            Self::Segment(action) => match action {
                SegmentAction::Upsert(_) => "segment/upsert",
                SegmentAction::Remove { .. } => "segment/remove",
            },
            Self::Wire(action) => match action {
                WireAction::Save(_) => "wire/save",
                WireAction::LockRoute { .. } => "wire/lockRoute",
                WireAction::ResetRoute { .. } => "wire/resetRoute",
                WireAction::Remove { .. } => "wire/remove",
            },
            Self::Network(action) => match action {
                NetworkAction::Create(_) => "network/create",
                NetworkAction::Select { .. } => "network/select",
                NetworkAction::Rename { .. } => "network/rename",
                NetworkAction::Duplicate { .. } => "network/duplicate",
                NetworkAction::Delete { .. } => "network/delete",
                NetworkAction::ImportMany { .. } => "network/importMany",
            },
            Self::Ui(action) => match action {
                UiAction::Select(_) => "ui/select",
                UiAction::ClearSelection => "ui/clearSelection",
                UiAction::ClearError => "ui/clearError",
            },
        }
    }
}

/// Why an action was rejected. The `Display` text is what lands in `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Missing or malformed field, out-of-range number.
    #[error("{0}")]
    Validation(String),
    /// Duplicate identifier or slot held by someone else.
    #[error("{0}")]
    Conflict(String),
    /// Reference to a missing entity, or deletion blocked by a live reference.
    #[error("{0}")]
    ReferentialIntegrity(String),
    /// No path between wire endpoints, or a locked route that no longer connects them.
    #[error("{0}")]
    Routing(String),
}

impl DispatchError {
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::Conflict(message)
            | Self::ReferentialIntegrity(message)
            | Self::Routing(message) => message,
        }
    }
}

/// Whether a successful action changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Changed,
    Unchanged,
}

impl Outcome {
    fn changed_if(changed: bool) -> Self {
        if changed {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }
}

/// Applies `action` to a copy of `state`.
///
/// On success the copy has `last_error` cleared and `revision` bumped. An action that turns out to
/// be a no-op returns `state` as-is unless an error was pending, in which case only the error is
/// cleared (and the revision bumped).
pub fn try_apply(state: &NetworkState, action: &Action) -> Result<NetworkState, DispatchError> {
    let mut next = state.clone();
    let outcome = apply_action(&mut next, action).map_err(|err| {
        tracing::debug!(action = action.type_name(), error = %err, "action rejected");
        err
    })?;

    if outcome == Outcome::Unchanged && state.last_error.is_none() {
        return Ok(next);
    }

    if outcome == Outcome::Changed && selection_is_stale(&next) {
        next.selection = None;
    }
    next.last_error = None;
    next.revision = next.revision.saturating_add(1);
    tracing::trace!(
        action = action.type_name(),
        revision = next.revision,
        "action committed"
    );
    Ok(next)
}

/// Pure reducer: rejected actions return the unchanged state with `last_error` set.
pub fn dispatch(state: &NetworkState, action: &Action) -> NetworkState {
    match try_apply(state, action) {
        Ok(next) => next,
        Err(err) => {
            let mut rejected = state.clone();
            rejected.last_error = Some(err.to_string());
            rejected
        }
    }
}

fn apply_action(state: &mut NetworkState, action: &Action) -> Result<Outcome, DispatchError> {
    match action {
        Action::Catalog(action) => apply_catalog_action(live_scope(state)?, action),
        Action::Connector(action) => apply_connector_action(live_scope(state)?, action),
        Action::Splice(action) => apply_splice_action(live_scope(state)?, action),
        Action::Node(action) => apply_node_action(live_scope(state)?, action),
        Action::Segment(action) => apply_segment_action(live_scope(state)?, action),
        Action::Wire(action) => apply_wire_action(live_scope(state)?, action),
        Action::Network(action) => network::apply_network_action(state, action),
        Action::Ui(action) => Ok(apply_ui_action(state, action)),
    }
}

fn live_scope(state: &mut NetworkState) -> Result<&mut NetworkScope, DispatchError> {
    if state.active_network_id.is_none() {
        return Err(DispatchError::Validation(
            "No active network. Create or select a network first.".to_owned(),
        ));
    }
    Ok(&mut state.scope)
}

fn apply_ui_action(state: &mut NetworkState, action: &UiAction) -> Outcome {
    match action {
        UiAction::Select(selection) => {
            if state.selection.as_ref() == Some(selection) {
                return Outcome::Unchanged;
            }
            state.selection = Some(selection.clone());
            Outcome::Changed
        }
        UiAction::ClearSelection => Outcome::changed_if(state.selection.take().is_some()),
        UiAction::ClearError => Outcome::Unchanged,
    }
}

fn selection_is_stale(state: &NetworkState) -> bool {
    let Some(selection) = &state.selection else {
        return false;
    };
    let scope = &state.scope;
    let id = selection.id.as_str();
    let exists = match selection.kind {
        SelectionKind::CatalogItem => scope.catalog_items.by_id().contains_key(id),
        SelectionKind::Connector => scope.connectors.by_id().contains_key(id),
        SelectionKind::Splice => scope.splices.by_id().contains_key(id),
        SelectionKind::Node => scope.nodes.by_id().contains_key(id),
        SelectionKind::Segment => scope.segments.by_id().contains_key(id),
        SelectionKind::Wire => scope.wires.by_id().contains_key(id),
    };
    !exists
}

// Per-family handlers and field validation.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
