//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::Cli;
use crate::config::RemovalConfig;
use anyhow::{Context, Result};

/// Layers CLI arguments over the environment configuration
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build a [`RemovalConfig`] from the process environment and CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<RemovalConfig> {
        Self::from_cli_with_lookup(cli, |name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_cli`] with an injectable environment
    pub(crate) fn from_cli_with_lookup<F>(cli: &Cli, lookup: F) -> Result<RemovalConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = RemovalConfig::from_lookup(lookup)
            .context("Invalid configuration in environment")?;

        let mut builder = RemovalConfig::builder()
            .model(cli.model.clone().unwrap_or(base.model))
            .endpoint(cli.endpoint.clone().unwrap_or(base.endpoint))
            .timeout_secs(cli.timeout.unwrap_or(base.timeout_secs))
            .instruction(base.instruction);
        // A missing key is reported by the adapter at request time.
        if let Some(key) = base.api_key {
            builder = builder.api_key(key);
        }

        builder.build().context("Invalid configuration")
    }
}
