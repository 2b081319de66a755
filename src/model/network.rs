// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::ids::NetworkId;

/// An independent harness network. Its entities live in a [`super::NetworkScope`].
///
/// Timestamps are caller-supplied strings (ISO-8601 in practice) so the reducer stays
/// deterministic; they are compared lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: NetworkId,
    pub name: String,
    pub technical_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Network {
    /// Fallback order used when the active network disappears.
    pub fn cmp_for_fallback(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.technical_id.cmp(&other.technical_id))
    }
}
