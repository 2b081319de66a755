// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::model::NetworkState;

/// Schema version written by this build. Snapshots with any other version are refused.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub state: NetworkState,
}

impl Snapshot {
    pub fn new(state: NetworkState) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            state,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place, without fsync.
    #[default]
    BestEffort,

    /// Also syncs the file contents and the parent directory entry where the platform allows.
    Durable,
}

/// Serializes `state` as a pretty-printed snapshot with a trailing newline.
///
/// All maps in the state are ordered, so equal states always produce identical bytes.
pub fn to_json_string(state: &NetworkState) -> Result<String, SnapshotError> {
    let snapshot = SnapshotRef {
        format_version: FORMAT_VERSION,
        state,
    };
    let mut json = serde_json::to_string_pretty(&snapshot)?;
    json.push('\n');
    Ok(json)
}

pub fn from_json_str(json: &str) -> Result<NetworkState, SnapshotError> {
    let header: SnapshotHeader = serde_json::from_str(json)?;
    if header.format_version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: header.format_version,
            expected: FORMAT_VERSION,
        });
    }
    let snapshot: Snapshot = serde_json::from_str(json)?;
    Ok(snapshot.state)
}

pub fn load_from_path(path: &Path) -> Result<NetworkState, SnapshotError> {
    let json = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let state = from_json_str(&json)?;
    tracing::debug!(path = %path.display(), revision = state.revision, "snapshot loaded");
    Ok(state)
}

/// Writes `state` to `path` through a temp sibling and an atomic rename.
pub fn save_to_path(
    path: &Path,
    state: &NetworkState,
    durability: WriteDurability,
) -> Result<(), SnapshotError> {
    let json = to_json_string(state)?;
    write_atomic(path, json.as_bytes(), durability)?;
    tracing::debug!(
        path = %path.display(),
        revision = state.revision,
        ?durability,
        "snapshot saved"
    );
    Ok(())
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    format_version: u32,
    state: &'a NetworkState,
}

// Read first so a version mismatch is reported as such rather than as a shape error.
#[derive(Deserialize)]
struct SnapshotHeader {
    format_version: u32,
}

fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), SnapshotError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(SnapshotError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(io_error(path)(source)),
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(io_error(path)(io::Error::other("path has no file name")));
    };
    fs::create_dir_all(parent).map_err(io_error(parent))?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".wirenet.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_error(&tmp_path))?;
    let written = file.write_all(contents).and_then(|()| {
        if durability == WriteDurability::Durable {
            file.sync_all()
        } else {
            Ok(())
        }
    });
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(&tmp_path)(source));
    }

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(path)(source));
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(io_error(parent))?;
            dir.sync_all().map_err(io_error(parent))?;
        }
    }

    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SnapshotError {
    let path = path.to_path_buf();
    move |source| SnapshotError::Io { path, source }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}
