// SPDX-License-Identifier: MPL-2.0
//! Console logging setup.
//!
//! `RUST_LOG` directives take precedence over the level given on the
//! command line, e.g. `RUST_LOG=backpack_configurator::material=debug`.

use crate::error::{Error, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Parses a `--log-level` value (`error`, `warn`, `info`, `debug`, `trace`, `off`).
pub fn parse_level(raw: &str) -> Result<LevelFilter> {
    raw.trim()
        .parse::<LevelFilter>()
        .map_err(|_| Error::InvalidOption {
            field: "log-level",
            value: raw.to_string(),
        })
}

fn build_env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Installs the global subscriber.
///
/// # Errors
/// Returns [`Error::Config`] when a global subscriber is already set.
pub fn init(level: LevelFilter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level))
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Config(format!("logger already initialized: {e}")))
}
