// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Normalized entity collection: records keyed by id plus the order they were first inserted.
///
/// Upserting an existing id replaces the record in place and keeps its position in `all_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize + Ord, V: Serialize",
    deserialize = "K: Deserialize<'de> + Ord + Clone, V: Deserialize<'de>"
))]
pub struct EntityTable<K, V> {
    by_id: BTreeMap<K, V>,
    all_ids: Vec<K>,
}

impl<K, V> Default for EntityTable<K, V> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
            all_ids: Vec::new(),
        }
    }
}

impl<K: Ord + Clone, V> EntityTable<K, V> {
    pub fn len(&self) -> usize {
        self.all_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_ids.is_empty()
    }

    pub fn get(&self, id: &K) -> Option<&V> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn all_ids(&self) -> &[K] {
        &self.all_ids
    }

    pub fn by_id(&self) -> &BTreeMap<K, V> {
        &self.by_id
    }

    /// Records in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.all_ids.iter().filter_map(|id| self.by_id.get(id))
    }

    /// Returns the replaced record, if any.
    pub fn upsert(&mut self, id: K, value: V) -> Option<V> {
        let previous = self.by_id.insert(id.clone(), value);
        if previous.is_none() {
            self.all_ids.push(id);
        }
        previous
    }

    pub fn remove(&mut self, id: &K) -> Option<V> {
        let removed = self.by_id.remove(id)?;
        self.all_ids.retain(|candidate| candidate != id);
        Some(removed)
    }
}
