// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{
    CatalogItemId, ConnectorId, Network, NetworkId, NetworkNode, NetworkScope, NetworkState,
    NodeId, NodeKind, OccupantRef, Segment, SegmentId, Selection, SelectionKind, SpliceId,
    WireEndpoint, WireId, WireSide,
};

use super::{
    dispatch, try_apply, Action, CatalogAction, CatalogItemInput, ConnectorAction, ConnectorInput,
    DispatchError, NetworkAction, NetworkImport, NetworkInput, NodeAction, SegmentAction,
    SpliceAction, SpliceInput, UiAction, WireAction, WireInput,
};

const CREATED_AT: &str = "2026-01-01T00:00:00Z";

fn cid(id: &str) -> ConnectorId {
    ConnectorId::new(id).expect("connector id")
}

fn nid(id: &str) -> NodeId {
    NodeId::new(id).expect("node id")
}

fn sid(id: &str) -> SegmentId {
    SegmentId::new(id).expect("segment id")
}

fn wid(id: &str) -> WireId {
    WireId::new(id).expect("wire id")
}

fn net(id: &str) -> NetworkId {
    NetworkId::new(id).expect("network id")
}

fn cavity(connector_id: &str, index: u32) -> WireEndpoint {
    WireEndpoint::cavity(cid(connector_id), index)
}

fn apply(state: &NetworkState, action: Action) -> NetworkState {
    try_apply(state, &action).expect(action.type_name())
}

fn rejected(state: &NetworkState, action: Action) -> DispatchError {
    match try_apply(state, &action) {
        Ok(_) => panic!("expected {} to be rejected", action.type_name()),
        Err(err) => err,
    }
}

fn connector(id: &str, technical_id: &str, cavity_count: f64) -> Action {
    Action::Connector(ConnectorAction::Upsert(ConnectorInput {
        id: cid(id),
        name: format!("Connector {id}"),
        technical_id: technical_id.to_owned(),
        cavity_count,
        catalog_item_id: None,
        manufacturer_reference: None,
    }))
}

fn splice(id: &str, technical_id: &str, port_count: f64) -> Action {
    Action::Splice(SpliceAction::Upsert(SpliceInput {
        id: SpliceId::new(id).expect("splice id"),
        name: format!("Splice {id}"),
        technical_id: technical_id.to_owned(),
        port_count,
        catalog_item_id: None,
        manufacturer_reference: None,
    }))
}

fn catalog_item(id: &str, manufacturer_reference: &str, connection_count: f64) -> Action {
    Action::Catalog(CatalogAction::Upsert(CatalogItemInput {
        id: CatalogItemId::new(id).expect("catalog item id"),
        manufacturer_reference: manufacturer_reference.to_owned(),
        connection_count,
        name: None,
        unit_price_excl_tax: None,
        url: None,
    }))
}

fn node(id: &str, kind: NodeKind) -> Action {
    Action::Node(NodeAction::Upsert(NetworkNode::new(nid(id), kind)))
}

fn connector_node(id: &str, connector_id: &str) -> Action {
    node(
        id,
        NodeKind::Connector {
            connector_id: cid(connector_id),
        },
    )
}

fn segment(id: &str, node_a: &str, node_b: &str, length_mm: f64) -> Action {
    Action::Segment(SegmentAction::Upsert(Segment {
        id: sid(id),
        node_a: nid(node_a),
        node_b: nid(node_b),
        length_mm,
        sub_network_tag: None,
    }))
}

fn wire(id: &str, endpoint_a: WireEndpoint, endpoint_b: WireEndpoint) -> Action {
    Action::Wire(WireAction::Save(WireInput {
        id: wid(id),
        name: format!("Wire {id}"),
        technical_id: format!("T-{id}"),
        endpoint_a,
        endpoint_b,
    }))
}

fn occupy(connector_id: &str, cavity_index: u32, occupant_ref: &str) -> Action {
    Action::Connector(ConnectorAction::OccupyCavity {
        connector_id: cid(connector_id),
        cavity_index,
        occupant_ref: occupant_ref.to_owned(),
    })
}

fn release(connector_id: &str, cavity_index: u32, expected_occupant_ref: &str) -> Action {
    Action::Connector(ConnectorAction::ReleaseCavity {
        connector_id: cid(connector_id),
        cavity_index,
        expected_occupant_ref: expected_occupant_ref.to_owned(),
    })
}

fn network_input(id: &str, technical_id: &str, created_at: &str) -> NetworkInput {
    NetworkInput {
        id: net(id),
        name: format!("Network {id}"),
        technical_id: technical_id.to_owned(),
        description: None,
        created_at: created_at.to_owned(),
    }
}

/// Connectors C1 and C2 (two cavities each) on nodes A and C, an intermediate node B, and
/// segments S1 A-B (4), S2 B-C (4), S3 A-C (15).
fn abc_network() -> NetworkState {
    let mut state = NetworkState::initial(CREATED_AT);
    for action in [
        connector("C1", "X-1", 2.0),
        connector("C2", "X-2", 2.0),
        connector_node("A", "C1"),
        node(
            "B",
            NodeKind::Intermediate {
                label: "B".to_owned(),
            },
        ),
        connector_node("C", "C2"),
        segment("S1", "A", "B", 4.0),
        segment("S2", "B", "C", 4.0),
        segment("S3", "A", "C", 15.0),
    ] {
        state = apply(&state, action);
    }
    state
}

fn route_of(state: &NetworkState, wire_id: &str) -> (Vec<SegmentId>, f64, bool) {
    let wire = state.scope.wires.get(&wid(wire_id)).expect("wire");
    (
        wire.route_segment_ids.clone(),
        wire.length_mm,
        wire.is_route_locked,
    )
}

#[test]
fn successful_actions_bump_revision_and_clear_error() {
    let state = NetworkState::initial(CREATED_AT);
    assert_eq!(state.revision, 0);

    let failed = dispatch(&state, &connector("C1", "", 2.0));
    assert_eq!(failed.revision, 0);
    assert_eq!(failed.last_error.as_deref(), Some("Connector technical ID is required."));

    let next = dispatch(&failed, &connector("C1", "X-1", 2.0));
    assert_eq!(next.revision, 1);
    assert_eq!(next.last_error, None);
}

#[test]
fn connector_upsert_rejects_non_integer_counts() {
    let state = NetworkState::initial(CREATED_AT);
    for raw in [0.0, 2.5, -1.0, f64::NAN, f64::INFINITY] {
        let err = rejected(&state, connector("C1", "X-1", raw));
        assert!(matches!(err, DispatchError::Validation(_)), "{raw}: {err:?}");

        let after = dispatch(&state, &connector("C1", "X-1", raw));
        assert_eq!(after.scope, state.scope);
        assert_eq!(after.revision, state.revision);
        assert_eq!(
            after.last_error.as_deref(),
            Some("Cavity count must be an integer >= 1.")
        );
    }
}

#[test]
fn connector_technical_id_must_be_unique() {
    let state = apply(&NetworkState::initial(CREATED_AT), connector("C1", "X-1", 2.0));

    let err = rejected(&state, connector("C2", "X-1", 2.0));
    assert!(matches!(err, DispatchError::Conflict(_)));

    // Re-saving the same connector keeps its own technical id.
    let state = apply(&state, connector("C1", "X-1", 3.0));
    assert_eq!(
        state.scope.connectors.get(&cid("C1")).expect("C1").cavity_count,
        3
    );
}

#[test]
fn cavity_claims_follow_single_occupancy() {
    let state = apply(&NetworkState::initial(CREATED_AT), connector("C1", "X-1", 2.0));
    let base_revision = state.revision;

    let claimed = apply(&state, occupy("C1", 1, "wire:W1:A"));
    assert_eq!(claimed.revision, base_revision + 1);
    assert_eq!(
        claimed
            .scope
            .occupancy
            .holder(&cavity("C1", 1))
            .map(OccupantRef::as_str),
        Some("wire:W1:A")
    );

    // Same holder again is a no-op.
    let again = apply(&claimed, occupy("C1", 1, "wire:W1:A"));
    assert_eq!(again, claimed);

    let err = rejected(&claimed, occupy("C1", 1, "wire:W2:A"));
    assert!(matches!(err, DispatchError::Conflict(_)));
    let with_error = dispatch(&claimed, &occupy("C1", 1, "wire:W2:A"));
    assert_eq!(with_error.scope, claimed.scope);
    assert!(with_error.last_error.is_some());

    // A no-op with a pending error clears it and counts as a transition.
    let cleared = apply(&with_error, occupy("C1", 1, "wire:W1:A"));
    assert_eq!(cleared.last_error, None);
    assert_eq!(cleared.revision, with_error.revision + 1);

    let wrong_release = apply(&claimed, release("C1", 1, "wire:W2:A"));
    assert_eq!(wrong_release, claimed);

    let released = apply(&claimed, release("C1", 1, "wire:W1:A"));
    assert_eq!(released.scope.occupancy.holder(&cavity("C1", 1)), None);
    assert_eq!(released.revision, claimed.revision + 1);
}

#[test]
fn cavity_index_must_be_in_range() {
    let state = apply(&NetworkState::initial(CREATED_AT), connector("C1", "X-1", 2.0));
    for index in [0, 3] {
        let err = rejected(&state, occupy("C1", index, "manual"));
        assert!(matches!(err, DispatchError::Validation(_)), "{index}: {err:?}");
    }
    let err = rejected(&state, occupy("C9", 1, "manual"));
    assert!(matches!(err, DispatchError::ReferentialIntegrity(_)));
}

#[test]
fn wire_save_routes_shortest_path_and_claims_endpoints() {
    let state = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));

    let (segments, length_mm, locked) = route_of(&state, "W1");
    assert_eq!(segments, vec![sid("S1"), sid("S2")]);
    assert_eq!(length_mm, 8.0);
    assert!(!locked);

    let ledger = &state.scope.occupancy;
    assert_eq!(ledger.len(), 2);
    assert_eq!(
        ledger.holder(&cavity("C1", 1)),
        Some(&OccupantRef::wire(&wid("W1"), WireSide::A))
    );
    assert_eq!(
        ledger.holder(&cavity("C2", 1)),
        Some(&OccupantRef::wire(&wid("W1"), WireSide::B))
    );
}

#[test]
fn wire_resave_move_and_remove_keep_ledger_consistent() {
    let state = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));
    let resaved = apply(&state, wire("W1", cavity("C1", 1), cavity("C2", 1)));
    assert_eq!(resaved.scope.occupancy, state.scope.occupancy);

    let moved = apply(&state, wire("W1", cavity("C1", 1), cavity("C2", 2)));
    assert_eq!(moved.scope.occupancy.len(), 2);
    assert_eq!(moved.scope.occupancy.holder(&cavity("C2", 1)), None);
    assert_eq!(
        moved.scope.occupancy.holder(&cavity("C2", 2)),
        Some(&OccupantRef::wire(&wid("W1"), WireSide::B))
    );

    let removed = apply(&moved, Action::Wire(WireAction::Remove { id: wid("W1") }));
    assert!(removed.scope.occupancy.is_empty());
    assert!(removed.scope.wires.is_empty());

    let saved_again = apply(&removed, wire("W1", cavity("C1", 1), cavity("C2", 1)));
    assert_eq!(saved_again.scope.occupancy, state.scope.occupancy);
}

#[test]
fn wire_swapping_its_own_ends_is_allowed() {
    let state = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));
    let swapped = apply(&state, wire("W1", cavity("C2", 1), cavity("C1", 1)));
    assert_eq!(
        swapped.scope.occupancy.holder(&cavity("C2", 1)),
        Some(&OccupantRef::wire(&wid("W1"), WireSide::A))
    );
    assert_eq!(swapped.scope.occupancy.len(), 2);
}

#[test]
fn wire_save_rejects_slot_held_by_someone_else() {
    let state = apply(&abc_network(), occupy("C2", 1, "manual"));
    let err = rejected(&state, wire("W1", cavity("C1", 1), cavity("C2", 1)));
    assert!(matches!(err, DispatchError::Conflict(_)));

    let after = dispatch(&state, &wire("W1", cavity("C1", 1), cavity("C2", 1)));
    assert_eq!(after.scope, state.scope);

    let state = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));
    let err = rejected(&state, wire("W2", cavity("C1", 1), cavity("C2", 2)));
    assert!(matches!(err, DispatchError::Conflict(_)));
}

#[test]
fn wire_save_validates_endpoints() {
    let state = abc_network();

    let err = rejected(&state, wire("W1", cavity("C1", 1), cavity("C1", 1)));
    assert!(matches!(err, DispatchError::Validation(_)));

    let err = rejected(&state, wire("W1", cavity("C1", 3), cavity("C2", 1)));
    assert!(matches!(err, DispatchError::Validation(_)));

    let err = rejected(&state, wire("W1", cavity("C9", 1), cavity("C2", 1)));
    assert!(matches!(err, DispatchError::ReferentialIntegrity(_)));

    // Shape is checked before references.
    let err = rejected(&state, wire("W1", cavity("C9", 1), cavity("C9", 1)));
    assert!(matches!(err, DispatchError::Validation(_)));
}

#[test]
fn wire_save_needs_placed_and_connected_endpoints() {
    let state = apply(&abc_network(), connector("C3", "X-3", 1.0));
    let err = rejected(&state, wire("W1", cavity("C1", 1), cavity("C3", 1)));
    assert!(matches!(err, DispatchError::Routing(_)));

    let state = apply(&state, connector_node("D", "C3"));
    let err = rejected(&state, wire("W1", cavity("C1", 1), cavity("C3", 1)));
    assert!(matches!(err, DispatchError::Routing(_)));
    assert_eq!(
        err.message(),
        "Wire W1: no route between nodes A and D."
    );
}

#[test]
fn lock_then_reset_matches_fresh_auto_route() {
    let state = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));
    let fresh = route_of(&state, "W1");

    let locked = apply(
        &state,
        Action::Wire(WireAction::LockRoute {
            wire_id: wid("W1"),
            segment_ids: vec![sid("S3")],
        }),
    );
    assert_eq!(route_of(&locked, "W1"), (vec![sid("S3")], 15.0, true));

    // Saving with unchanged endpoints keeps the lock.
    let resaved = apply(&locked, wire("W1", cavity("C1", 1), cavity("C2", 1)));
    assert_eq!(route_of(&resaved, "W1"), (vec![sid("S3")], 15.0, true));

    // Moving an endpoint drops it.
    let moved = apply(&locked, wire("W1", cavity("C1", 2), cavity("C2", 1)));
    assert_eq!(route_of(&moved, "W1"), (vec![sid("S1"), sid("S2")], 8.0, false));

    let reset = apply(
        &locked,
        Action::Wire(WireAction::ResetRoute { wire_id: wid("W1") }),
    );
    assert_eq!(route_of(&reset, "W1"), fresh);
}

#[test]
fn lock_route_rejects_disconnected_sequence() {
    let state = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));
    for segment_ids in [vec![sid("S2")], vec![sid("S2"), sid("S1")], vec![sid("S9")]] {
        let err = rejected(
            &state,
            Action::Wire(WireAction::LockRoute {
                wire_id: wid("W1"),
                segment_ids,
            }),
        );
        assert!(matches!(err, DispatchError::Routing(_)));
    }
}

#[test]
fn segment_edits_recompute_routes() {
    let state = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));
    let state = apply(
        &state,
        Action::Wire(WireAction::LockRoute {
            wire_id: wid("W1"),
            segment_ids: vec![sid("S1"), sid("S2")],
        }),
    );
    let state = apply(&state, wire("W2", cavity("C1", 2), cavity("C2", 2)));

    let state = apply(&state, segment("S1", "A", "B", 20.0));
    assert_eq!(route_of(&state, "W1"), (vec![sid("S1"), sid("S2")], 24.0, true));
    assert_eq!(route_of(&state, "W2"), (vec![sid("S3")], 15.0, false));
}

#[test]
fn node_delete_blocked_by_segment() {
    let state = abc_network();
    let err = rejected(&state, Action::Node(NodeAction::Remove { id: nid("B") }));
    assert!(matches!(err, DispatchError::ReferentialIntegrity(_)));
    assert_eq!(err.message(), "Node B is used by segment S1.");

    let after = dispatch(&state, &Action::Node(NodeAction::Remove { id: nid("B") }));
    assert_eq!(after.scope.nodes, state.scope.nodes);
    assert_eq!(after.scope.segments, state.scope.segments);
}

#[test]
fn node_edits_orphaning_a_wire_endpoint_are_rejected_whole() {
    let mut state = abc_network();
    for action in [
        connector("C3", "X-3", 2.0),
        connector_node("D", "C3"),
        wire("W1", cavity("C3", 1), cavity("C3", 2)),
    ] {
        state = apply(&state, action);
    }
    assert_eq!(route_of(&state, "W1"), (Vec::new(), 0.0, false));

    let remove = Action::Node(NodeAction::Remove { id: nid("D") });
    let retype = node(
        "D",
        NodeKind::Intermediate {
            label: "D".to_owned(),
        },
    );
    for action in [remove, retype] {
        let err = rejected(&state, action.clone());
        assert!(matches!(err, DispatchError::Routing(_)), "{err}");
        assert_eq!(
            err.message(),
            "Wire W1: connector C3 cavity 1 is not placed on any node."
        );

        let after = dispatch(&state, &action);
        assert_eq!(after.scope.nodes, state.scope.nodes);
        assert_eq!(after.scope.wires, state.scope.wires);
        assert_eq!(after.scope.occupancy, state.scope.occupancy);
        assert_eq!(after.revision, state.revision);
    }
}

#[test]
fn segment_remove_breaking_locked_route_is_rejected_whole() {
    let state = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));
    let state = apply(
        &state,
        Action::Wire(WireAction::LockRoute {
            wire_id: wid("W1"),
            segment_ids: vec![sid("S1"), sid("S2")],
        }),
    );
    let state = apply(&state, wire("W2", cavity("C1", 2), cavity("C2", 2)));

    let remove_s2 = Action::Segment(SegmentAction::Remove { id: sid("S2") });
    let err = rejected(&state, remove_s2.clone());
    assert!(matches!(err, DispatchError::Routing(_)));

    let after = dispatch(&state, &remove_s2);
    assert_eq!(after.scope, state.scope);
    assert_eq!(after.revision, state.revision);
    assert!(after.last_error.is_some());

    let without_s3 = apply(&state, Action::Segment(SegmentAction::Remove { id: sid("S3") }));
    assert_eq!(
        route_of(&without_s3, "W1"),
        (vec![sid("S1"), sid("S2")], 8.0, true)
    );
}

#[test]
fn segment_remove_leaving_auto_wire_unroutable_is_rejected() {
    let state = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));
    let state = apply(&state, Action::Segment(SegmentAction::Remove { id: sid("S3") }));
    let err = rejected(&state, Action::Segment(SegmentAction::Remove { id: sid("S1") }));
    assert!(matches!(err, DispatchError::Routing(_)));
}

#[test]
fn segment_upsert_validates_length_and_nodes() {
    let state = abc_network();
    for length_mm in [0.0, -3.0, f64::NAN] {
        let err = rejected(&state, segment("S4", "A", "B", length_mm));
        assert!(matches!(err, DispatchError::Validation(_)));
    }
    let err = rejected(&state, segment("S4", "A", "A", 1.0));
    assert!(matches!(err, DispatchError::Validation(_)));
    let err = rejected(&state, segment("S4", "A", "Z", 1.0));
    assert!(matches!(err, DispatchError::ReferentialIntegrity(_)));
}

#[test]
fn connector_removal_is_blocked_by_node_and_wires() {
    let state = abc_network();
    let err = rejected(&state, Action::Connector(ConnectorAction::Remove { id: cid("C1") }));
    assert!(matches!(err, DispatchError::ReferentialIntegrity(_)));

    let state = apply(&state, connector("C3", "X-3", 2.0));
    let state = apply(&state, occupy("C3", 2, "manual"));
    let state = apply(&state, Action::Connector(ConnectorAction::Remove { id: cid("C3") }));
    assert!(!state.scope.connectors.contains(&cid("C3")));
    assert_eq!(state.scope.occupancy.holder(&cavity("C3", 2)), None);
}

#[test]
fn shrinking_below_an_occupied_cavity_is_a_conflict() {
    let state = apply(&abc_network(), wire("W1", cavity("C1", 2), cavity("C2", 1)));
    let err = rejected(&state, connector("C1", "X-1", 1.0));
    assert!(matches!(err, DispatchError::Conflict(_)));

    let state = apply(&state, connector("C1", "X-1", 4.0));
    assert_eq!(
        state.scope.connectors.get(&cid("C1")).expect("C1").cavity_count,
        4
    );
}

#[test]
fn catalog_link_drives_counts_and_blocks_removal() {
    let state = apply(&abc_network(), catalog_item("K1", "REF-1", 4.0));
    let mut linked = ConnectorInput {
        id: cid("C9"),
        name: "Linked".to_owned(),
        technical_id: "X-9".to_owned(),
        cavity_count: 1.0,
        catalog_item_id: Some(CatalogItemId::new("K1").expect("catalog item id")),
        manufacturer_reference: None,
    };
    let state = apply(
        &state,
        Action::Connector(ConnectorAction::Upsert(linked.clone())),
    );
    let c9 = state.scope.connectors.get(&cid("C9")).expect("C9");
    assert_eq!(c9.cavity_count, 4);
    assert_eq!(c9.manufacturer_reference.as_deref(), Some("REF-1"));

    let state = apply(&state, occupy("C9", 4, "manual"));
    let err = rejected(&state, catalog_item("K1", "REF-1", 2.0));
    assert!(matches!(err, DispatchError::Conflict(_)));

    let state = apply(&state, catalog_item("K1", "REF-1B", 6.0));
    let c9 = state.scope.connectors.get(&cid("C9")).expect("C9");
    assert_eq!(c9.cavity_count, 6);
    assert_eq!(c9.manufacturer_reference.as_deref(), Some("REF-1B"));

    let remove_k1 = Action::Catalog(CatalogAction::Remove {
        id: CatalogItemId::new("K1").expect("catalog item id"),
    });
    let err = rejected(&state, remove_k1.clone());
    assert!(matches!(err, DispatchError::ReferentialIntegrity(_)));

    linked.catalog_item_id = Some(CatalogItemId::new("K404").expect("catalog item id"));
    let err = rejected(&state, Action::Connector(ConnectorAction::Upsert(linked)));
    assert!(matches!(err, DispatchError::ReferentialIntegrity(_)));
}

#[test]
fn catalog_item_fields_are_validated() {
    let state = apply(&NetworkState::initial(CREATED_AT), catalog_item("K1", "REF-1", 2.0));

    let err = rejected(&state, catalog_item("K2", "REF-1", 2.0));
    assert!(matches!(err, DispatchError::Conflict(_)));

    let err = rejected(&state, catalog_item("K2", &"R".repeat(121), 2.0));
    assert!(matches!(err, DispatchError::Validation(_)));

    let err = rejected(&state, catalog_item("K2", "   ", 2.0));
    assert!(matches!(err, DispatchError::Validation(_)));

    let err = rejected(
        &state,
        Action::Catalog(CatalogAction::Upsert(CatalogItemInput {
            id: CatalogItemId::new("K2").expect("catalog item id"),
            manufacturer_reference: "REF-2".to_owned(),
            connection_count: 2.0,
            name: None,
            unit_price_excl_tax: Some(-0.5),
            url: None,
        })),
    );
    assert!(matches!(err, DispatchError::Validation(_)));
}

#[test]
fn node_cannot_reuse_placed_connector() {
    let state = abc_network();
    let err = rejected(&state, connector_node("D", "C1"));
    assert!(matches!(err, DispatchError::Conflict(_)));

    let err = rejected(&state, connector_node("D", "C404"));
    assert!(matches!(err, DispatchError::ReferentialIntegrity(_)));

    // Re-saving the node that already holds the connector is fine.
    apply(&state, connector_node("A", "C1"));
}

#[test]
fn splice_ports_route_and_release_like_cavities() {
    let state = apply(&abc_network(), splice("P1", "SP-1", 3.0));
    let state = apply(
        &state,
        node(
            "P",
            NodeKind::Splice {
                splice_id: SpliceId::new("P1").expect("splice id"),
            },
        ),
    );
    let state = apply(&state, segment("S4", "B", "P", 1.0));

    let port = WireEndpoint::port(SpliceId::new("P1").expect("splice id"), 2);
    let state = apply(&state, wire("W1", cavity("C1", 1), port.clone()));
    assert_eq!(route_of(&state, "W1"), (vec![sid("S1"), sid("S4")], 5.0, false));
    assert_eq!(
        state.scope.occupancy.holder(&port),
        Some(&OccupantRef::wire(&wid("W1"), WireSide::B))
    );

    let occupy_port = Action::Splice(SpliceAction::OccupyPort {
        splice_id: SpliceId::new("P1").expect("splice id"),
        port_index: 3,
        occupant_ref: "manual".to_owned(),
    });
    let state = apply(&state, occupy_port);
    let release_port = Action::Splice(SpliceAction::ReleasePort {
        splice_id: SpliceId::new("P1").expect("splice id"),
        port_index: 3,
        expected_occupant_ref: "manual".to_owned(),
    });
    let state = apply(&state, release_port);
    assert_eq!(state.scope.occupancy.len(), 2);
}

#[test]
fn removing_selected_entity_clears_selection() {
    let state = apply(&abc_network(), connector("C3", "X-3", 1.0));
    let select = Action::Ui(UiAction::Select(Selection {
        kind: SelectionKind::Connector,
        id: "C3".to_owned(),
    }));
    let state = apply(&state, select.clone());
    assert!(state.selection.is_some());
    assert_eq!(apply(&state, select), state);

    let state = apply(&state, Action::Connector(ConnectorAction::Remove { id: cid("C3") }));
    assert_eq!(state.selection, None);
}

#[test]
fn scoped_actions_require_an_active_network() {
    let state = NetworkState::default();
    let err = rejected(&state, connector("C1", "X-1", 2.0));
    assert!(matches!(err, DispatchError::Validation(_)));

    let state = apply(
        &state,
        Action::Network(NetworkAction::Create(network_input(
            "net-a", "NET-A", CREATED_AT,
        ))),
    );
    apply(&state, connector("C1", "X-1", 2.0));
}

#[test]
fn network_switch_parks_and_restores_scopes() {
    let main = abc_network();
    let main_scope = main.scope.clone();

    let state = apply(
        &main,
        Action::Network(NetworkAction::Create(network_input(
            "net-b", "NET-B", CREATED_AT,
        ))),
    );
    assert_eq!(state.active_network_id, Some(net("net-b")));
    assert_eq!(state.scope, NetworkScope::default());
    assert_eq!(state.scope_of(&net("network-main")), Some(&main_scope));

    // Technical ids only need to be unique per network.
    let state = apply(&state, connector("C1", "X-1", 2.0));

    let state = apply(
        &state,
        Action::Network(NetworkAction::Select {
            network_id: net("network-main"),
        }),
    );
    assert_eq!(state.scope, main_scope);
    assert_eq!(
        state
            .scope_of(&net("net-b"))
            .expect("parked scope")
            .connectors
            .len(),
        1
    );

    let unchanged = apply(
        &state,
        Action::Network(NetworkAction::Select {
            network_id: net("network-main"),
        }),
    );
    assert_eq!(unchanged, state);
}

#[test]
fn duplicate_copies_scope_and_activates_copy() {
    let main = apply(&abc_network(), wire("W1", cavity("C1", 1), cavity("C2", 1)));
    let state = apply(
        &main,
        Action::Network(NetworkAction::Duplicate {
            source_network_id: net("network-main"),
            network: network_input("net-copy", "NET-COPY", "2026-01-02T00:00:00Z"),
        }),
    );
    assert_eq!(state.active_network_id, Some(net("net-copy")));
    assert_eq!(state.scope, main.scope);

    let err = rejected(
        &state,
        Action::Network(NetworkAction::Duplicate {
            source_network_id: net("network-main"),
            network: network_input("net-copy-2", "NET-COPY", CREATED_AT),
        }),
    );
    assert!(matches!(err, DispatchError::Conflict(_)));
}

#[test]
fn deleting_active_network_falls_back_to_oldest() {
    let mut state = NetworkState::initial(CREATED_AT);
    for input in [
        network_input("net-b", "NET-B", "2026-02-01T00:00:00Z"),
        network_input("net-c", "NET-C", "2026-01-15T00:00:00Z"),
    ] {
        state = apply(&state, Action::Network(NetworkAction::Create(input)));
    }
    let state = apply(
        &state,
        Action::Network(NetworkAction::Select {
            network_id: net("network-main"),
        }),
    );

    let state = apply(
        &state,
        Action::Network(NetworkAction::Delete {
            network_id: net("network-main"),
        }),
    );
    assert_eq!(state.active_network_id, Some(net("net-c")));
    assert!(!state.stored_scopes.contains_key(&net("network-main")));

    // Deleting an inactive network leaves the active one alone.
    let state = apply(
        &state,
        Action::Network(NetworkAction::Delete {
            network_id: net("net-b"),
        }),
    );
    assert_eq!(state.active_network_id, Some(net("net-c")));

    let state = apply(
        &state,
        Action::Network(NetworkAction::Delete {
            network_id: net("net-c"),
        }),
    );
    assert_eq!(state.active_network_id, None);
    assert!(state.networks.is_empty());
}

#[test]
fn import_many_activates_first_import_when_nothing_is_active() {
    let imported = |id: &str, technical_id: &str| NetworkImport {
        network: Network {
            id: net(id),
            name: format!("Imported {id}"),
            technical_id: technical_id.to_owned(),
            description: None,
            created_at: CREATED_AT.to_owned(),
            updated_at: CREATED_AT.to_owned(),
        },
        scope: abc_network().scope,
    };

    let state = apply(
        &NetworkState::default(),
        Action::Network(NetworkAction::ImportMany {
            networks: vec![imported("net-x", "NET-X"), imported("net-y", "NET-Y")],
        }),
    );
    assert_eq!(state.active_network_id, Some(net("net-x")));
    assert_eq!(state.scope.connectors.len(), 2);
    assert!(state.stored_scopes.contains_key(&net("net-y")));

    let err = rejected(
        &state,
        Action::Network(NetworkAction::ImportMany {
            networks: vec![imported("net-x", "NET-Z")],
        }),
    );
    assert!(matches!(err, DispatchError::Conflict(_)));

    let err = rejected(
        &state,
        Action::Network(NetworkAction::ImportMany {
            networks: vec![imported("net-z", "NET-Z"), imported("net-w", "NET-Z")],
        }),
    );
    assert!(matches!(err, DispatchError::Conflict(_)));
}

#[test]
fn import_many_stores_trimmed_text() {
    let state = apply(
        &NetworkState::initial(CREATED_AT),
        Action::Network(NetworkAction::ImportMany {
            networks: vec![NetworkImport {
                network: Network {
                    id: net("net-x"),
                    name: "  Imported  ".to_owned(),
                    technical_id: " NET-X ".to_owned(),
                    description: Some("   ".to_owned()),
                    created_at: CREATED_AT.to_owned(),
                    updated_at: CREATED_AT.to_owned(),
                },
                scope: NetworkScope::default(),
            }],
        }),
    );
    let imported = state.networks.get(&net("net-x")).expect("imported network");
    assert_eq!(imported.name, "Imported");
    assert_eq!(imported.technical_id, "NET-X");
    assert_eq!(imported.description, None);

    let err = rejected(
        &state,
        Action::Network(NetworkAction::Create(network_input(
            "net-y", "NET-X", CREATED_AT,
        ))),
    );
    assert!(matches!(err, DispatchError::Conflict(_)));
}

#[test]
fn rename_requires_name() {
    let state = NetworkState::initial(CREATED_AT);
    let err = rejected(
        &state,
        Action::Network(NetworkAction::Rename {
            network_id: net("network-main"),
            name: "  ".to_owned(),
            updated_at: CREATED_AT.to_owned(),
        }),
    );
    assert!(matches!(err, DispatchError::Validation(_)));

    let state = apply(
        &state,
        Action::Network(NetworkAction::Rename {
            network_id: net("network-main"),
            name: " Harness A ".to_owned(),
            updated_at: "2026-03-01T00:00:00Z".to_owned(),
        }),
    );
    let network = state.active_network().expect("active network");
    assert_eq!(network.name, "Harness A");
    assert_eq!(network.updated_at, "2026-03-01T00:00:00Z");
    assert_eq!(network.created_at, CREATED_AT);
}

#[test]
fn actions_use_type_and_payload_json() {
    let action: Action = serde_json::from_str(
        r#"{"type":"connector/upsert","payload":{"id":"C1","name":"Main","technical_id":"C-1","cavity_count":2}}"#,
    )
    .expect("connector action");
    assert_eq!(action.type_name(), "connector/upsert");
    let state = apply(&NetworkState::initial(CREATED_AT), action);
    assert_eq!(
        state.scope.connectors.get(&cid("C1")).expect("C1").cavity_count,
        2
    );

    let action: Action = serde_json::from_str(
        r#"{"type":"wire/save","payload":{"id":"W1","name":"W","technical_id":"T-1",
            "endpoint_a":{"kind":"connector_cavity","connector_id":"C1","cavity_index":1},
            "endpoint_b":{"kind":"splice_port","splice_id":"P1","port_index":2}}}"#,
    )
    .expect("wire action");
    assert_eq!(action.type_name(), "wire/save");

    let action: Action =
        serde_json::from_str(r#"{"type":"ui/clearSelection"}"#).expect("ui action");
    assert_eq!(action, Action::Ui(UiAction::ClearSelection));

    let encoded = serde_json::to_value(Action::Wire(WireAction::ResetRoute { wire_id: wid("W1") }))
        .expect("encode");
    assert_eq!(
        encoded,
        serde_json::json!({"type": "wire/resetRoute", "payload": {"wire_id": "W1"}})
    );

    assert!(serde_json::from_str::<Action>(r#"{"type":"wire/teleport","payload":{}}"#).is_err());
}
