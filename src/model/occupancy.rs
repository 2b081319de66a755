// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Exclusive claims on connector cavities and splice ports.
//!
//! The ledger maps a slot to the opaque occupant ref holding it. Claims succeed when the slot is
//! free or already held by the same ref; releases only take effect when the caller names the
//! current holder, so a stale release can never free a slot somebody else has since claimed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{ConnectorId, SpliceId, WireId};
use super::wire::{WireEndpoint, WireSide};

pub type Slot = WireEndpoint;

/// Opaque identifier of whoever holds a slot. Wires use `wire:<wire_id>:<A|B>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupantRef(String);

impl OccupantRef {
    pub fn new(value: impl Into<String>) -> Result<Self, OccupantRefError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(OccupantRefError::Empty);
        }
        Ok(Self(value))
    }

    pub fn wire(wire_id: &WireId, side: WireSide) -> Self {
        Self(format!("wire:{wire_id}:{}", side.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OccupantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OccupantRefError {
    #[error("occupant ref must not be empty")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    AlreadyHeld,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{slot} is already occupied by {holder}")]
pub struct ClaimConflict {
    pub slot: Slot,
    pub holder: OccupantRef,
}

/// Persisted form of one ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyEntry {
    pub slot: Slot,
    pub occupant: OccupantRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<OccupancyEntry>", into = "Vec<OccupancyEntry>")]
pub struct OccupancyLedger {
    slots: BTreeMap<Slot, OccupantRef>,
}

impl From<Vec<OccupancyEntry>> for OccupancyLedger {
    fn from(entries: Vec<OccupancyEntry>) -> Self {
        Self {
            slots: entries
                .into_iter()
                .map(|entry| (entry.slot, entry.occupant))
                .collect(),
        }
    }
}

impl From<OccupancyLedger> for Vec<OccupancyEntry> {
    fn from(ledger: OccupancyLedger) -> Self {
        ledger
            .slots
            .into_iter()
            .map(|(slot, occupant)| OccupancyEntry { slot, occupant })
            .collect()
    }
}

impl OccupancyLedger {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn holder(&self, slot: &Slot) -> Option<&OccupantRef> {
        self.slots.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Slot, &OccupantRef)> + '_ {
        self.slots.iter()
    }

    pub fn claim(
        &mut self,
        slot: &Slot,
        occupant: &OccupantRef,
    ) -> Result<ClaimOutcome, ClaimConflict> {
        match self.slots.get(slot) {
            Some(holder) if holder == occupant => Ok(ClaimOutcome::AlreadyHeld),
            Some(holder) => Err(ClaimConflict {
                slot: slot.clone(),
                holder: holder.clone(),
            }),
            None => {
                self.slots.insert(slot.clone(), occupant.clone());
                Ok(ClaimOutcome::Claimed)
            }
        }
    }

    /// Frees `slot` only if `expected` still holds it. Returns whether anything was released.
    pub fn release(&mut self, slot: &Slot, expected: &OccupantRef) -> bool {
        if self.slots.get(slot) != Some(expected) {
            return false;
        }
        self.slots.remove(slot);
        true
    }

    /// Moves a wire's claims from its previous endpoints (if any) to `next`.
    ///
    /// All-or-nothing: if either new slot is held by anything other than this wire's own A/B
    /// refs, the ledger is left untouched.
    pub fn rebind_wire(
        &mut self,
        wire_id: &WireId,
        previous: Option<(&Slot, &Slot)>,
        next: (&Slot, &Slot),
    ) -> Result<(), ClaimConflict> {
        let own_a = OccupantRef::wire(wire_id, WireSide::A);
        let own_b = OccupantRef::wire(wire_id, WireSide::B);

        let mut staged = self.clone();
        if let Some((previous_a, previous_b)) = previous {
            staged.release(previous_a, &own_a);
            staged.release(previous_b, &own_b);
        }

        for (slot, occupant) in [(next.0, &own_a), (next.1, &own_b)] {
            if let Some(holder) = staged.slots.get(slot) {
                if holder != &own_a && holder != &own_b {
                    return Err(ClaimConflict {
                        slot: slot.clone(),
                        holder: holder.clone(),
                    });
                }
            }
            staged.slots.insert(slot.clone(), occupant.clone());
        }

        *self = staged;
        Ok(())
    }

    /// Releases both ends of a wire, each only if the wire still holds it.
    pub fn release_wire(&mut self, wire_id: &WireId, endpoint_a: &Slot, endpoint_b: &Slot) {
        self.release(endpoint_a, &OccupantRef::wire(wire_id, WireSide::A));
        self.release(endpoint_b, &OccupantRef::wire(wire_id, WireSide::B));
    }

    pub fn clear_connector(&mut self, connector_id: &ConnectorId) {
        self.slots.retain(|slot, _| !slot.is_on_connector(connector_id));
    }

    pub fn clear_splice(&mut self, splice_id: &SpliceId) {
        self.slots.retain(|slot, _| !slot.is_on_splice(splice_id));
    }
}
