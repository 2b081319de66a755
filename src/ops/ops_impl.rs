// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Entity handlers used by `apply_action`. Each handler checks fields, uniqueness, references and
// capacity before writing into the scope it was handed, which is a private copy of the caller's
// state.

fn required_text(field: &str, value: &str) -> Result<String, DispatchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::Validation(format!("{field} is required.")));
    }
    Ok(trimmed.to_owned())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn count_from_raw(field: &str, raw: f64) -> Result<u32, DispatchError> {
    if !raw.is_finite() || raw.fract() != 0.0 || raw < 1.0 || raw > f64::from(u32::MAX) {
        return Err(DispatchError::Validation(format!(
            "{field} must be an integer >= 1."
        )));
    }
    Ok(raw as u32)
}

fn occupant_ref_from_raw(raw: &str) -> Result<OccupantRef, DispatchError> {
    OccupantRef::new(raw.trim())
        .map_err(|_| DispatchError::Validation("Occupant reference is required.".to_owned()))
}

fn slot_in_range(endpoint: &WireEndpoint, capacity: u32) -> Result<(), DispatchError> {
    let index = endpoint.index();
    if index < 1 || index > capacity {
        return Err(DispatchError::Validation(format!(
            "Index {index} is out of range for {endpoint} (valid: 1..={capacity})."
        )));
    }
    Ok(())
}

fn claim_conflict(conflict: ClaimConflict) -> DispatchError {
    DispatchError::Conflict(format!(
        "{} is already occupied by '{}'.",
        conflict.slot, conflict.holder
    ))
}

/// Highest slot index in use on a part, counting ledger claims and wire endpoints.
fn highest_used_index(
    scope: &NetworkScope,
    on_part: impl Fn(&WireEndpoint) -> bool,
) -> Option<u32> {
    let from_ledger = scope
        .occupancy
        .iter()
        .filter(|(slot, _)| on_part(*slot))
        .map(|(slot, _)| slot.index());
    let from_wires = scope
        .wires
        .values()
        .flat_map(|wire| [&wire.endpoint_a, &wire.endpoint_b])
        .filter(|endpoint| on_part(*endpoint))
        .map(WireEndpoint::index);
    from_ledger.chain(from_wires).max()
}

fn ensure_capacity_covers_usage(
    scope: &NetworkScope,
    part: &str,
    capacity: u32,
    on_part: impl Fn(&WireEndpoint) -> bool,
) -> Result<(), DispatchError> {
    match highest_used_index(scope, on_part) {
        Some(used) if used > capacity => Err(DispatchError::Conflict(format!(
            "Cannot reduce {part} to {capacity}: index {used} is in use."
        ))),
        _ => Ok(()),
    }
}

fn apply_catalog_action(
    scope: &mut NetworkScope,
    action: &CatalogAction,
) -> Result<Outcome, DispatchError> {
    match action {
        CatalogAction::Upsert(input) => {
            let manufacturer_reference =
                required_text("Manufacturer reference", &input.manufacturer_reference)?;
            if manufacturer_reference.chars().count() > MANUFACTURER_REFERENCE_MAX_LEN {
                return Err(DispatchError::Validation(format!(
                    "Manufacturer reference must be at most {MANUFACTURER_REFERENCE_MAX_LEN} characters."
                )));
            }
            let connection_count = count_from_raw("Connection count", input.connection_count)?;
            if let Some(price) = input.unit_price_excl_tax {
                if !price.is_finite() || price < 0.0 {
                    return Err(DispatchError::Validation(
                        "Unit price must be a finite number >= 0.".to_owned(),
                    ));
                }
            }

            if let Some(other) = scope.catalog_items.values().find(|item| {
                item.id != input.id && item.manufacturer_reference == manufacturer_reference
            }) {
                return Err(DispatchError::Conflict(format!(
                    "Manufacturer reference '{manufacturer_reference}' is already used by catalog item {}.",
                    other.id
                )));
            }

            for connector in scope
                .connectors
                .values()
                .filter(|connector| connector.catalog_item_id.as_ref() == Some(&input.id))
            {
                ensure_capacity_covers_usage(
                    scope,
                    &format!("connector {} cavity count", connector.id),
                    connection_count,
                    |endpoint| endpoint.is_on_connector(&connector.id),
                )?;
            }
            for splice in scope
                .splices
                .values()
                .filter(|splice| splice.catalog_item_id.as_ref() == Some(&input.id))
            {
                ensure_capacity_covers_usage(
                    scope,
                    &format!("splice {} port count", splice.id),
                    connection_count,
                    |endpoint| endpoint.is_on_splice(&splice.id),
                )?;
            }

            scope.catalog_items.upsert(
                input.id.clone(),
                CatalogItem {
                    id: input.id.clone(),
                    manufacturer_reference: manufacturer_reference.clone(),
                    connection_count,
                    name: optional_text(input.name.as_deref()),
                    unit_price_excl_tax: input.unit_price_excl_tax,
                    url: optional_text(input.url.as_deref()),
                },
            );

            let linked_connectors = scope
                .connectors
                .values()
                .filter(|connector| connector.catalog_item_id.as_ref() == Some(&input.id))
                .cloned()
                .collect::<Vec<_>>();
            for mut connector in linked_connectors {
                connector.cavity_count = connection_count;
                connector.manufacturer_reference = Some(manufacturer_reference.clone());
                scope.connectors.upsert(connector.id.clone(), connector);
            }
            let linked_splices = scope
                .splices
                .values()
                .filter(|splice| splice.catalog_item_id.as_ref() == Some(&input.id))
                .cloned()
                .collect::<Vec<_>>();
            for mut splice in linked_splices {
                splice.port_count = connection_count;
                splice.manufacturer_reference = Some(manufacturer_reference.clone());
                scope.splices.upsert(splice.id.clone(), splice);
            }
            Ok(Outcome::Changed)
        }
        CatalogAction::Remove { id } => {
            if !scope.catalog_items.contains(id) {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Catalog item {id} does not exist."
                )));
            }
            if let Some(connector) = scope
                .connectors
                .values()
                .find(|connector| connector.catalog_item_id.as_ref() == Some(id))
            {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Catalog item {id} is used by connector {}.",
                    connector.id
                )));
            }
            if let Some(splice) = scope
                .splices
                .values()
                .find(|splice| splice.catalog_item_id.as_ref() == Some(id))
            {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Catalog item {id} is used by splice {}.",
                    splice.id
                )));
            }
            scope.catalog_items.remove(id);
            Ok(Outcome::Changed)
        }
    }
}

/// Count and manufacturer reference after applying an optional catalog link.
fn linked_part_fields(
    scope: &NetworkScope,
    catalog_item_id: Option<&CatalogItemId>,
    count: u32,
    manufacturer_reference: Option<String>,
) -> Result<(u32, Option<String>), DispatchError> {
    let Some(catalog_item_id) = catalog_item_id else {
        return Ok((count, manufacturer_reference));
    };
    let Some(item) = scope.catalog_items.get(catalog_item_id) else {
        return Err(DispatchError::ReferentialIntegrity(format!(
            "Catalog item {catalog_item_id} does not exist."
        )));
    };
    Ok((
        item.connection_count,
        Some(item.manufacturer_reference.clone()),
    ))
}

fn apply_connector_action(
    scope: &mut NetworkScope,
    action: &ConnectorAction,
) -> Result<Outcome, DispatchError> {
    match action {
        ConnectorAction::Upsert(input) => {
            let name = required_text("Connector name", &input.name)?;
            let technical_id = required_text("Connector technical ID", &input.technical_id)?;
            let cavity_count = count_from_raw("Cavity count", input.cavity_count)?;

            if let Some(other) = scope
                .connectors
                .values()
                .find(|other| other.id != input.id && other.technical_id == technical_id)
            {
                return Err(DispatchError::Conflict(format!(
                    "Connector technical ID '{technical_id}' is already used by connector {}.",
                    other.id
                )));
            }

            let (cavity_count, manufacturer_reference) = linked_part_fields(
                scope,
                input.catalog_item_id.as_ref(),
                cavity_count,
                optional_text(input.manufacturer_reference.as_deref()),
            )?;

            ensure_capacity_covers_usage(
                scope,
                &format!("connector {} cavity count", input.id),
                cavity_count,
                |endpoint| endpoint.is_on_connector(&input.id),
            )?;

            scope.connectors.upsert(
                input.id.clone(),
                Connector {
                    id: input.id.clone(),
                    name,
                    technical_id,
                    cavity_count,
                    catalog_item_id: input.catalog_item_id.clone(),
                    manufacturer_reference,
                },
            );
            Ok(Outcome::Changed)
        }
        ConnectorAction::Remove { id } => {
            if !scope.connectors.contains(id) {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Connector {id} does not exist."
                )));
            }
            if let Some(node) = scope.node_for_connector(id) {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Connector {id} is placed on node {}.",
                    node.id
                )));
            }
            if let Some(wire) = scope.wires.values().find(|wire| wire.uses_connector(id)) {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Connector {id} is used by wire {}.",
                    wire.id
                )));
            }
            scope.connectors.remove(id);
            scope.occupancy.clear_connector(id);
            Ok(Outcome::Changed)
        }
        ConnectorAction::OccupyCavity {
            connector_id,
            cavity_index,
            occupant_ref,
        } => {
            let occupant = occupant_ref_from_raw(occupant_ref)?;
            let slot = WireEndpoint::cavity(connector_id.clone(), *cavity_index);
            let capacity = existing_connector_capacity(scope, connector_id)?;
            slot_in_range(&slot, capacity)?;
            match scope.occupancy.claim(&slot, &occupant) {
                Ok(ClaimOutcome::Claimed) => Ok(Outcome::Changed),
                Ok(ClaimOutcome::AlreadyHeld) => Ok(Outcome::Unchanged),
                Err(conflict) => Err(claim_conflict(conflict)),
            }
        }
        ConnectorAction::ReleaseCavity {
            connector_id,
            cavity_index,
            expected_occupant_ref,
        } => {
            let expected = occupant_ref_from_raw(expected_occupant_ref)?;
            let slot = WireEndpoint::cavity(connector_id.clone(), *cavity_index);
            let capacity = existing_connector_capacity(scope, connector_id)?;
            slot_in_range(&slot, capacity)?;
            Ok(Outcome::changed_if(
                scope.occupancy.release(&slot, &expected),
            ))
        }
    }
}

fn existing_connector_capacity(
    scope: &NetworkScope,
    connector_id: &ConnectorId,
) -> Result<u32, DispatchError> {
    scope
        .connectors
        .get(connector_id)
        .map(|connector| connector.cavity_count)
        .ok_or_else(|| {
            DispatchError::ReferentialIntegrity(format!("Connector {connector_id} does not exist."))
        })
}

fn apply_splice_action(
    scope: &mut NetworkScope,
    action: &SpliceAction,
) -> Result<Outcome, DispatchError> {
    match action {
        SpliceAction::Upsert(input) => {
            let name = required_text("Splice name", &input.name)?;
            let technical_id = required_text("Splice technical ID", &input.technical_id)?;
            let port_count = count_from_raw("Port count", input.port_count)?;

            if let Some(other) = scope
                .splices
                .values()
                .find(|other| other.id != input.id && other.technical_id == technical_id)
            {
                return Err(DispatchError::Conflict(format!(
                    "Splice technical ID '{technical_id}' is already used by splice {}.",
                    other.id
                )));
            }

            let (port_count, manufacturer_reference) = linked_part_fields(
                scope,
                input.catalog_item_id.as_ref(),
                port_count,
                optional_text(input.manufacturer_reference.as_deref()),
            )?;

            ensure_capacity_covers_usage(
                scope,
                &format!("splice {} port count", input.id),
                port_count,
                |endpoint| endpoint.is_on_splice(&input.id),
            )?;

            scope.splices.upsert(
                input.id.clone(),
                Splice {
                    id: input.id.clone(),
                    name,
                    technical_id,
                    port_count,
                    catalog_item_id: input.catalog_item_id.clone(),
                    manufacturer_reference,
                },
            );
            Ok(Outcome::Changed)
        }
        SpliceAction::Remove { id } => {
            if !scope.splices.contains(id) {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Splice {id} does not exist."
                )));
            }
            if let Some(node) = scope.node_for_splice(id) {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Splice {id} is placed on node {}.",
                    node.id
                )));
            }
            if let Some(wire) = scope.wires.values().find(|wire| wire.uses_splice(id)) {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Splice {id} is used by wire {}.",
                    wire.id
                )));
            }
            scope.splices.remove(id);
            scope.occupancy.clear_splice(id);
            Ok(Outcome::Changed)
        }
        SpliceAction::OccupyPort {
            splice_id,
            port_index,
            occupant_ref,
        } => {
            let occupant = occupant_ref_from_raw(occupant_ref)?;
            let slot = WireEndpoint::port(splice_id.clone(), *port_index);
            let capacity = existing_splice_capacity(scope, splice_id)?;
            slot_in_range(&slot, capacity)?;
            match scope.occupancy.claim(&slot, &occupant) {
                Ok(ClaimOutcome::Claimed) => Ok(Outcome::Changed),
                Ok(ClaimOutcome::AlreadyHeld) => Ok(Outcome::Unchanged),
                Err(conflict) => Err(claim_conflict(conflict)),
            }
        }
        SpliceAction::ReleasePort {
            splice_id,
            port_index,
            expected_occupant_ref,
        } => {
            let expected = occupant_ref_from_raw(expected_occupant_ref)?;
            let slot = WireEndpoint::port(splice_id.clone(), *port_index);
            let capacity = existing_splice_capacity(scope, splice_id)?;
            slot_in_range(&slot, capacity)?;
            Ok(Outcome::changed_if(
                scope.occupancy.release(&slot, &expected),
            ))
        }
    }
}

fn existing_splice_capacity(
    scope: &NetworkScope,
    splice_id: &SpliceId,
) -> Result<u32, DispatchError> {
    scope
        .splices
        .get(splice_id)
        .map(|splice| splice.port_count)
        .ok_or_else(|| {
            DispatchError::ReferentialIntegrity(format!("Splice {splice_id} does not exist."))
        })
}

fn apply_node_action(
    scope: &mut NetworkScope,
    action: &NodeAction,
) -> Result<Outcome, DispatchError> {
    match action {
        NodeAction::Upsert(node) => {
            let kind = match &node.kind {
                NodeKind::Intermediate { label } => NodeKind::Intermediate {
                    label: required_text("Node label", label)?,
                },
                NodeKind::Connector { connector_id } => {
                    if !scope.connectors.contains(connector_id) {
                        return Err(DispatchError::ReferentialIntegrity(format!(
                            "Connector {connector_id} does not exist."
                        )));
                    }
                    if let Some(other) = scope
                        .node_for_connector(connector_id)
                        .filter(|other| other.id != node.id)
                    {
                        return Err(DispatchError::Conflict(format!(
                            "Connector {connector_id} is already placed on node {}.",
                            other.id
                        )));
                    }
                    node.kind.clone()
                }
                NodeKind::Splice { splice_id } => {
                    if !scope.splices.contains(splice_id) {
                        return Err(DispatchError::ReferentialIntegrity(format!(
                            "Splice {splice_id} does not exist."
                        )));
                    }
                    if let Some(other) = scope
                        .node_for_splice(splice_id)
                        .filter(|other| other.id != node.id)
                    {
                        return Err(DispatchError::Conflict(format!(
                            "Splice {splice_id} is already placed on node {}.",
                            other.id
                        )));
                    }
                    node.kind.clone()
                }
            };

            scope
                .nodes
                .upsert(node.id.clone(), NetworkNode::new(node.id.clone(), kind));
            recompute_all_routes(scope)?;
            Ok(Outcome::Changed)
        }
        NodeAction::Remove { id } => {
            if !scope.nodes.contains(id) {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Node {id} does not exist."
                )));
            }
            if let Some(segment) = scope.segments.values().find(|segment| segment.touches(id)) {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Node {id} is used by segment {}.",
                    segment.id
                )));
            }
            scope.nodes.remove(id);
            recompute_all_routes(scope)?;
            Ok(Outcome::Changed)
        }
    }
}

fn apply_segment_action(
    scope: &mut NetworkScope,
    action: &SegmentAction,
) -> Result<Outcome, DispatchError> {
    match action {
        SegmentAction::Upsert(segment) => {
            if !segment.length_mm.is_finite() || segment.length_mm <= 0.0 {
                return Err(DispatchError::Validation(
                    "Segment length must be a finite number > 0.".to_owned(),
                ));
            }
            if segment.node_a == segment.node_b {
                return Err(DispatchError::Validation(
                    "Segment must connect two different nodes.".to_owned(),
                ));
            }
            for node_id in [&segment.node_a, &segment.node_b] {
                if !scope.nodes.contains(node_id) {
                    return Err(DispatchError::ReferentialIntegrity(format!(
                        "Node {node_id} does not exist."
                    )));
                }
            }

            scope.segments.upsert(
                segment.id.clone(),
                Segment {
                    sub_network_tag: optional_text(segment.sub_network_tag.as_deref()),
                    ..segment.clone()
                },
            );
            recompute_all_routes(scope)?;
            Ok(Outcome::Changed)
        }
        SegmentAction::Remove { id } => {
            if scope.segments.remove(id).is_none() {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Segment {id} does not exist."
                )));
            }
            recompute_all_routes(scope)?;
            Ok(Outcome::Changed)
        }
    }
}

fn apply_wire_action(
    scope: &mut NetworkScope,
    action: &WireAction,
) -> Result<Outcome, DispatchError> {
    match action {
        WireAction::Save(input) => {
            let name = required_text("Wire name", &input.name)?;
            let technical_id = required_text("Wire technical ID", &input.technical_id)?;
            if input.endpoint_a == input.endpoint_b {
                return Err(DispatchError::Validation(
                    "Wire endpoints must use two different slots.".to_owned(),
                ));
            }

            if let Some(other) = scope
                .wires
                .values()
                .find(|other| other.id != input.id && other.technical_id == technical_id)
            {
                return Err(DispatchError::Conflict(format!(
                    "Wire technical ID '{technical_id}' is already used by wire {}.",
                    other.id
                )));
            }

            for endpoint in [&input.endpoint_a, &input.endpoint_b] {
                let Some(capacity) = scope.endpoint_capacity(endpoint) else {
                    return Err(DispatchError::ReferentialIntegrity(format!(
                        "Wire endpoint {endpoint} points at a missing part."
                    )));
                };
                slot_in_range(endpoint, capacity)?;
            }

            let previous = scope.wires.get(&input.id).cloned();
            scope
                .occupancy
                .rebind_wire(
                    &input.id,
                    previous
                        .as_ref()
                        .map(|wire| (&wire.endpoint_a, &wire.endpoint_b)),
                    (&input.endpoint_a, &input.endpoint_b),
                )
                .map_err(claim_conflict)?;

            let graph = build_routing_graph_index(scope.nodes.values(), scope.segments.values());
            let (from, to) =
                routing::resolve_wire_nodes(scope, &input.id, &input.endpoint_a, &input.endpoint_b)?;

            let keeps_lock = previous.as_ref().is_some_and(|wire| {
                wire.is_route_locked
                    && wire.endpoint_a == input.endpoint_a
                    && wire.endpoint_b == input.endpoint_b
            });
            let route = match previous.as_ref().filter(|_| keeps_lock) {
                Some(wire) => routing::locked_route(
                    &graph,
                    &input.id,
                    &from,
                    &to,
                    &wire.route_segment_ids,
                )?,
                None => routing::auto_route(&graph, &input.id, &from, &to)?,
            };

            scope.wires.upsert(
                input.id.clone(),
                Wire {
                    id: input.id.clone(),
                    name,
                    technical_id,
                    endpoint_a: input.endpoint_a.clone(),
                    endpoint_b: input.endpoint_b.clone(),
                    route_segment_ids: route.segment_ids,
                    length_mm: route.length_mm,
                    is_route_locked: keeps_lock,
                },
            );
            Ok(Outcome::Changed)
        }
        WireAction::LockRoute {
            wire_id,
            segment_ids,
        } => {
            let wire = existing_wire(scope, wire_id)?;
            let graph = build_routing_graph_index(scope.nodes.values(), scope.segments.values());
            let (from, to) =
                routing::resolve_wire_nodes(scope, wire_id, &wire.endpoint_a, &wire.endpoint_b)?;
            let route = routing::locked_route(&graph, wire_id, &from, &to, segment_ids)?;

            scope.wires.upsert(
                wire_id.clone(),
                Wire {
                    route_segment_ids: route.segment_ids,
                    length_mm: route.length_mm,
                    is_route_locked: true,
                    ..wire
                },
            );
            Ok(Outcome::Changed)
        }
        WireAction::ResetRoute { wire_id } => {
            let wire = existing_wire(scope, wire_id)?;
            let graph = build_routing_graph_index(scope.nodes.values(), scope.segments.values());
            let (from, to) =
                routing::resolve_wire_nodes(scope, wire_id, &wire.endpoint_a, &wire.endpoint_b)?;
            let route = routing::auto_route(&graph, wire_id, &from, &to)?;

            scope.wires.upsert(
                wire_id.clone(),
                Wire {
                    route_segment_ids: route.segment_ids,
                    length_mm: route.length_mm,
                    is_route_locked: false,
                    ..wire
                },
            );
            Ok(Outcome::Changed)
        }
        WireAction::Remove { id } => {
            let Some(wire) = scope.wires.remove(id) else {
                return Err(DispatchError::ReferentialIntegrity(format!(
                    "Wire {id} does not exist."
                )));
            };
            scope
                .occupancy
                .release_wire(id, &wire.endpoint_a, &wire.endpoint_b);
            Ok(Outcome::Changed)
        }
    }
}

fn existing_wire(scope: &NetworkScope, wire_id: &WireId) -> Result<Wire, DispatchError> {
    scope
        .wires
        .get(wire_id)
        .cloned()
        .ok_or_else(|| DispatchError::ReferentialIntegrity(format!("Wire {wire_id} does not exist.")))
}
