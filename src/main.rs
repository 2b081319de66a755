// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wirenet CLI entrypoint.
//!
//! Replays a JSON array of actions against a snapshot (or a fresh state with one empty network)
//! and writes the resulting snapshot to a file or to stdout.

use std::error::Error;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use wirenet::host::{DispatchStatus, Host};
use wirenet::logging::{init_logging, LogConfig, LogFormat};
use wirenet::model::NetworkState;
use wirenet::ops::Action;
use wirenet::store::{self, WriteDurability};

const DEFAULT_CREATED_AT: &str = "1970-01-01T00:00:00Z";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --actions <file> [--state <file>] [--out <file>] [--created-at <timestamp>]\n      [--log <filter>] [--log-format compact|json] [--durable-writes] [--strict]\n\n--actions is a JSON array of actions ({{\"type\": \"connector/upsert\", \"payload\": {{...}}}}).\n--state loads a snapshot; without it the run starts from one empty network created at\n--created-at (default {DEFAULT_CREATED_AT}).\n--out writes the resulting snapshot atomically; without it the snapshot is printed to stdout.\n--log takes tracing filter directives (default: $WIRENET_LOG, then info).\n--durable-writes opts into fsync of the output snapshot where supported.\n--strict exits with status 1 if any action was rejected."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    actions_path: Option<String>,
    state_path: Option<String>,
    out_path: Option<String>,
    created_at: Option<String>,
    log_filter: Option<String>,
    log_format: Option<LogFormat>,
    durable_writes: bool,
    strict: bool,
}

fn set_once<T>(slot: &mut Option<T>, value: Option<T>) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value.ok_or(())?);
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--actions" => set_once(&mut options.actions_path, args.next())?,
            "--state" => set_once(&mut options.state_path, args.next())?,
            "--out" => set_once(&mut options.out_path, args.next())?,
            "--created-at" => set_once(&mut options.created_at, args.next())?,
            "--log" => set_once(&mut options.log_filter, args.next())?,
            "--log-format" => {
                let format = args.next().ok_or(())?.parse::<LogFormat>().map_err(|_| ())?;
                set_once(&mut options.log_format, Some(format))?;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--strict" => {
                if options.strict {
                    return Err(());
                }
                options.strict = true;
            }
            _ => return Err(()),
        }
    }

    if options.actions_path.is_none() {
        return Err(());
    }
    if options.state_path.is_some() && options.created_at.is_some() {
        return Err(());
    }

    Ok(options)
}

#[derive(Debug, thiserror::Error)]
enum ActionLogError {
    #[error("cannot read actions from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid actions in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn load_actions(path: &Path) -> Result<Vec<Action>, ActionLogError> {
    let json = std::fs::read_to_string(path).map_err(|source| ActionLogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| ActionLogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ReplaySummary {
    committed: usize,
    unchanged: usize,
    rejected: usize,
    faulted: usize,
}

fn replay(host: &mut Host, actions: &[Action]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for (index, action) in actions.iter().enumerate() {
        match host.dispatch(action) {
            DispatchStatus::Committed => summary.committed += 1,
            DispatchStatus::Unchanged => summary.unchanged += 1,
            DispatchStatus::Rejected(err) => {
                summary.rejected += 1;
                tracing::warn!(index, action = action.type_name(), error = %err, "action rejected");
            }
            DispatchStatus::Faulted => summary.faulted += 1,
        }
    }
    summary
}

fn main() {
    let result = (|| -> Result<bool, Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "wirenet".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging(
            &LogConfig::default()
                .with_filter(options.log_filter.clone())
                .with_format(options.log_format.unwrap_or_default())
                .with_ansi(std::io::stderr().is_terminal()),
        )?;

        let state = match &options.state_path {
            Some(path) => store::load_from_path(Path::new(path))?,
            None => NetworkState::initial(
                options.created_at.as_deref().unwrap_or(DEFAULT_CREATED_AT),
            ),
        };
        let actions_path = options.actions_path.as_deref().unwrap_or_default();
        let actions = load_actions(Path::new(actions_path))?;

        let mut host = Host::new(state);
        let summary = replay(&mut host, &actions);
        tracing::info!(
            actions = actions.len(),
            committed = summary.committed,
            unchanged = summary.unchanged,
            rejected = summary.rejected,
            faulted = summary.faulted,
            revision = host.state().revision,
            "replay finished"
        );

        match &options.out_path {
            Some(path) => {
                let durability = if options.durable_writes {
                    WriteDurability::Durable
                } else {
                    WriteDurability::BestEffort
                };
                store::save_to_path(Path::new(path), host.state(), durability)?;
                tracing::info!(path = %path, "snapshot written");
            }
            None => print!("{}", store::to_json_string(host.state())?),
        }

        let clean = summary.rejected == 0 && summary.faulted == 0;
        Ok(clean || !options.strict)
    })();

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("wirenet: {err}");
            std::process::exit(1);
        }
    }
}
