// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for engine state on disk.
//!
//! The engine itself never touches the filesystem; the CLI and embedding hosts use this module to
//! load a starting state and write the result back as a versioned JSON snapshot.

pub mod snapshot;

pub use snapshot::{
    from_json_str, load_from_path, save_to_path, to_json_string, Snapshot, SnapshotError,
    WriteDurability, FORMAT_VERSION,
};
