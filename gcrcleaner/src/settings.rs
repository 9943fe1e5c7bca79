//! Resolved run configuration.
//!
//! Settings are built once at startup following the precedence order:
//! 1. Default values
//! 2. Environment variables (`GCRCLEANER_*`)
//! 3. CLI flags
//!
//! Once built, the settings are passed read-only through the pipeline.

use crate::format::OutputFormat;
use config::{Config as ConfigRs, ConfigBuilder, Environment, builder::DefaultState};
use libgcrcleaner::{GcrError, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Prefix of the environment variables read by [`Settings::resolve`].
pub const ENV_PREFIX: &str = "GCRCLEANER";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub token: Option<String>,
    pub repo: Option<String>,
    pub timeout: Option<u64>,
    pub format: Option<OutputFormat>,
}

/// Layered values before validation.
#[derive(Debug, Deserialize)]
struct RawSettings {
    token: String,
    repo: String,
    timeout: u64,
    format: String,
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Bearer token; empty means "discover ambient credentials"
    pub token: String,
    /// Repository to list
    pub repository: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Output format for the listing
    pub format: OutputFormat,
}

impl Settings {
    /// Resolves settings from the process environment and `cli`.
    pub fn load(cli: &CliOverrides) -> Result<Self> {
        Self::resolve(cli, None)
    }

    /// Resolves settings from `env` (the process environment when `None`)
    /// and `cli`.
    pub fn resolve(cli: &CliOverrides, env: Option<HashMap<String, String>>) -> Result<Self> {
        let builder = Self::builder(cli, env).map_err(config_error)?;
        let raw: RawSettings = builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(config_error)?;

        let repository = raw.repo.trim().to_string();
        if repository.is_empty() {
            return Err(GcrError::config(
                format!(
                    "missing -repo: pass --repo <REPOSITORY> or set {}_REPO",
                    ENV_PREFIX
                ),
                None,
            ));
        }

        if raw.timeout == 0 {
            return Err(GcrError::config("timeout must be at least 1 second", None));
        }

        let format = raw
            .format
            .parse::<OutputFormat>()
            .map_err(|message| GcrError::config(message, None))?;

        Ok(Self {
            token: raw.token,
            repository,
            timeout_seconds: raw.timeout,
            format,
        })
    }

    fn builder(
        cli: &CliOverrides,
        env: Option<HashMap<String, String>>,
    ) -> std::result::Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        ConfigRs::builder()
            .set_default("token", "")?
            .set_default("repo", "")?
            .set_default("timeout", DEFAULT_TIMEOUT_SECONDS)?
            .set_default("format", OutputFormat::default().to_string())?
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .set_override_option("token", cli.token.clone())?
            .set_override_option("repo", cli.repo.clone())?
            .set_override_option("timeout", cli.timeout)?
            .set_override_option("format", cli.format.map(|f| f.to_string()))
    }
}

fn config_error(e: config::ConfigError) -> GcrError {
    GcrError::config_with_source("Failed to resolve settings".to_string(), None, e)
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
