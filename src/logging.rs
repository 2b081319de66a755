// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `tracing` subscriber setup for the `wirenet` binary.
//!
//! Library code only emits events; installing a subscriber is left to the binary (or to an
//! embedding host). Levels used across the crate:
//!
//! - `error`: a panic caught while applying an action
//! - `warn`: an action rejected during a replay run
//! - `info`: per-run summaries
//! - `debug`: reducer rejections, snapshot load/save
//! - `trace`: every committed action with its new revision

use std::fmt;
use std::io;
use std::str::FromStr;

use tracing_subscriber::{
    filter::ParseError,
    fmt::MakeWriter,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Environment variable consulted when no explicit filter is given.
pub const LOG_ENV_VAR: &str = "WIRENET_LOG";

pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(UnknownLogFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format {0:?} (expected compact or json)")]
pub struct UnknownLogFormat(String);

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}: {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: ParseError,
    },
    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive string. `None` falls back to `WIRENET_LOG`, then to `info`.
    pub filter: Option<String>,
    pub format: LogFormat,
    pub with_ansi: bool,
}

impl LogConfig {
    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    /// Filter directives in effect: explicit filter, then the environment, then the default.
    pub fn effective_filter(&self, from_env: Option<String>) -> String {
        self.filter
            .clone()
            .or(from_env)
            .map(|filter| filter.trim().to_owned())
            .filter(|filter| !filter.is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
    }
}

/// Installs the global subscriber, writing to stderr so stdout stays free for snapshot output.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    init_logging_with_writer(config, io::stderr)
}

pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> Result<(), LoggingError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(&config.effective_filter(std::env::var(LOG_ENV_VAR).ok()))?;

    match config.format {
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
        LogFormat::Compact => {
            let layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(false)
                .without_time();
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
    }
    Ok(())
}

fn build_env_filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directives).map_err(|source| LoggingError::InvalidFilter {
        filter: directives.to_owned(),
        source,
    })
}
