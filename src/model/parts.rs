// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Physical parts: catalog entries plus the connectors and splices placed in a network.

use serde::{Deserialize, Serialize};

use super::ids::{CatalogItemId, ConnectorId, SpliceId};

pub const MANUFACTURER_REFERENCE_MAX_LEN: usize = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub manufacturer_reference: String,
    pub connection_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price_excl_tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub id: ConnectorId,
    pub name: String,
    pub technical_id: String,
    pub cavity_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_item_id: Option<CatalogItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Splice {
    pub id: SpliceId,
    pub name: String,
    pub technical_id: String,
    pub port_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_item_id: Option<CatalogItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_reference: Option<String>,
}
