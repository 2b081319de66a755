// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Network scoping: which network's entities are live in `NetworkState::scope`.

use std::collections::BTreeSet;

use super::{optional_text, required_text, DispatchError, NetworkAction, NetworkInput, Outcome};
use crate::model::{Network, NetworkId, NetworkState};

pub(super) fn apply_network_action(
    state: &mut NetworkState,
    action: &NetworkAction,
) -> Result<Outcome, DispatchError> {
    match action {
        NetworkAction::Create(input) => {
            let network = new_network(state, input)?;
            let network_id = network.id.clone();
            state.networks.upsert(network_id.clone(), network);
            activate(state, &network_id);
            Ok(Outcome::Changed)
        }
        NetworkAction::Select { network_id } => {
            existing_network(state, network_id)?;
            if state.active_network_id.as_ref() == Some(network_id) {
                return Ok(Outcome::Unchanged);
            }
            activate(state, network_id);
            Ok(Outcome::Changed)
        }
        NetworkAction::Rename {
            network_id,
            name,
            updated_at,
        } => {
            let mut network = existing_network(state, network_id)?.clone();
            network.name = required_text("Network name", name)?;
            network.updated_at = required_text("Updated at", updated_at)?;
            state.networks.upsert(network_id.clone(), network);
            Ok(Outcome::Changed)
        }
        NetworkAction::Duplicate {
            source_network_id,
            network,
        } => {
            existing_network(state, source_network_id)?;
            let network = new_network(state, network)?;
            let network_id = network.id.clone();
            let scope = state
                .scope_of(source_network_id)
                .cloned()
                .unwrap_or_default();

            state.networks.upsert(network_id.clone(), network);
            state.stored_scopes.insert(network_id.clone(), scope);
            activate(state, &network_id);
            Ok(Outcome::Changed)
        }
        NetworkAction::Delete { network_id } => {
            existing_network(state, network_id)?;
            state.networks.remove(network_id);
            state.stored_scopes.remove(network_id);

            if state.active_network_id.as_ref() == Some(network_id) {
                // The outgoing scope belongs to the deleted network; drop it instead of parking it.
                state.active_network_id = None;
                state.scope = Default::default();
                state.selection = None;

                let mut remaining = state.networks.values().collect::<Vec<_>>();
                remaining.sort_by(|a, b| a.cmp_for_fallback(b));
                if let Some(fallback_id) = remaining.first().map(|network| network.id.clone()) {
                    activate(state, &fallback_id);
                }
            }
            Ok(Outcome::Changed)
        }
        NetworkAction::ImportMany { networks } => {
            if networks.is_empty() {
                return Err(DispatchError::Validation("Nothing to import.".to_owned()));
            }

            let mut batch_ids = BTreeSet::new();
            let mut batch_technical_ids = BTreeSet::new();
            let mut imported = Vec::with_capacity(networks.len());
            for import in networks {
                let network = imported_network(&import.network)?;
                if state.networks.contains(&network.id) || !batch_ids.insert(network.id.clone()) {
                    return Err(DispatchError::Conflict(format!(
                        "Network id {} already exists.",
                        network.id
                    )));
                }
                if technical_id_taken(state, &network.technical_id)
                    || !batch_technical_ids.insert(network.technical_id.clone())
                {
                    return Err(DispatchError::Conflict(format!(
                        "Network technical ID '{}' is already used.",
                        network.technical_id
                    )));
                }
                imported.push((network, &import.scope));
            }

            for (network, scope) in imported {
                let network_id = network.id.clone();
                state.networks.upsert(network_id.clone(), network);
                state.stored_scopes.insert(network_id, scope.clone());
            }
            if state.active_network_id.is_none() {
                let first_id = networks[0].network.id.clone();
                activate(state, &first_id);
            }
            Ok(Outcome::Changed)
        }
    }
}

fn existing_network<'a>(
    state: &'a NetworkState,
    network_id: &NetworkId,
) -> Result<&'a Network, DispatchError> {
    state.networks.get(network_id).ok_or_else(|| {
        DispatchError::ReferentialIntegrity(format!("Network {network_id} does not exist."))
    })
}

fn technical_id_taken(state: &NetworkState, technical_id: &str) -> bool {
    state
        .networks
        .values()
        .any(|network| network.technical_id == technical_id)
}

fn new_network(state: &NetworkState, input: &NetworkInput) -> Result<Network, DispatchError> {
    let name = required_text("Network name", &input.name)?;
    let technical_id = required_text("Network technical ID", &input.technical_id)?;
    let created_at = required_text("Created at", &input.created_at)?;

    if state.networks.contains(&input.id) {
        return Err(DispatchError::Conflict(format!(
            "Network id {} already exists.",
            input.id
        )));
    }
    if technical_id_taken(state, &technical_id) {
        return Err(DispatchError::Conflict(format!(
            "Network technical ID '{technical_id}' is already used."
        )));
    }

    Ok(Network {
        id: input.id.clone(),
        name,
        technical_id,
        description: optional_text(input.description.as_deref()),
        created_at: created_at.clone(),
        updated_at: created_at,
    })
}

/// Imported records go through the same text rules as created ones; timestamps are kept as given.
fn imported_network(network: &Network) -> Result<Network, DispatchError> {
    Ok(Network {
        id: network.id.clone(),
        name: required_text("Network name", &network.name)?,
        technical_id: required_text("Network technical ID", &network.technical_id)?,
        description: optional_text(network.description.as_deref()),
        created_at: network.created_at.clone(),
        updated_at: network.updated_at.clone(),
    })
}

/// Parks the live scope under the outgoing network (if any) and loads `target`'s scope.
fn activate(state: &mut NetworkState, target: &NetworkId) {
    if let Some(outgoing) = state.active_network_id.take() {
        let live = std::mem::take(&mut state.scope);
        state.stored_scopes.insert(outgoing, live);
    }
    state.scope = state.stored_scopes.remove(target).unwrap_or_default();
    state.active_network_id = Some(target.clone());
    state.selection = None;
}
