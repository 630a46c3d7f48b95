//! Configuration module for tradeledger.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Account and Observability.

mod account_config;
mod observability_config;

pub use account_config::AccountEnvConfig;
pub use observability_config::ObservabilityEnvConfig;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Account (from AccountEnvConfig)
    pub owner: String,
    pub initial_deposit: Decimal,
    pub prices_file: Option<PathBuf>,

    // Observability (from ObservabilityEnvConfig)
    pub log_level: String,
    pub log_pretty: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let account =
            AccountEnvConfig::from_lookup(&lookup).context("Failed to load account config")?;
        let observability = ObservabilityEnvConfig::from_lookup(&lookup);

        Ok(Self {
            owner: account.owner,
            initial_deposit: account.initial_deposit,
            prices_file: account.prices_file,

            log_level: observability.log_level,
            log_pretty: observability.pretty,
        })
    }
}
