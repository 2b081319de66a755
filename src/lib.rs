// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wirenet: consistency and routing engine for wiring harness networks.
//!
//! The engine is a pure reducer over [`model::NetworkState`]: every edit is an [`ops::Action`],
//! and [`ops::try_apply`] either returns the next state or explains why the edit was refused.
//! Wire routes are derived from the segment graph by [`query::find_shortest_route`] and kept in
//! sync with every topology edit.

pub mod host;
pub mod logging;
pub mod model;
pub mod ops;
pub mod query;
pub mod store;
