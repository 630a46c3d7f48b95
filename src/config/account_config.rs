//! Account configuration parsing from environment variables.
//!
//! This module handles the settings needed to open the ledger account:
//! owner, initial deposit and the optional price table file.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// Account environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AccountEnvConfig {
    pub owner: String,
    pub initial_deposit: Decimal,
    pub prices_file: Option<PathBuf>,
}

impl Default for AccountEnvConfig {
    fn default() -> Self {
        Self {
            owner: "default".to_string(),
            initial_deposit: Decimal::ZERO,
            prices_file: None,
        }
    }
}

impl AccountEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let owner = lookup("LEDGER_OWNER")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "default".to_string());

        let initial_deposit = match lookup("LEDGER_INITIAL_DEPOSIT") {
            Some(raw) => Decimal::from_str(raw.trim())
                .with_context(|| format!("Invalid LEDGER_INITIAL_DEPOSIT: {}", raw))?,
            None => Decimal::ZERO,
        };
        if initial_deposit < Decimal::ZERO {
            anyhow::bail!(
                "Invalid LEDGER_INITIAL_DEPOSIT: {}. Must be zero or positive",
                initial_deposit
            );
        }

        let prices_file = lookup("LEDGER_PRICES_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            owner,
            initial_deposit,
            prices_file,
        })
    }
}
