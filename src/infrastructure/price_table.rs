//! In-memory price source.
//!
//! Backs the command-line driver and serves as the deterministic oracle in
//! tests. Prices can be changed after construction so tests can move the
//! market between trades.

use crate::domain::ports::PriceOracle;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tracing::info;

#[derive(Debug, Default)]
pub struct StaticPriceOracle {
    prices: RwLock<HashMap<String, Decimal>>,
}

#[derive(Debug, Deserialize)]
struct PriceFile {
    #[serde(default)]
    prices: HashMap<String, Decimal>,
}

impl StaticPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_prices<I, S>(prices: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let oracle = Self::new();
        for (symbol, price) in prices {
            oracle.set_price(symbol.as_ref(), price);
        }
        oracle
    }

    /// Parse a TOML document with a `[prices]` table of `SYMBOL = "price"` entries.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: PriceFile = toml::from_str(content).context("Failed to parse price table")?;
        for (symbol, price) in &file.prices {
            if *price <= Decimal::ZERO {
                anyhow::bail!("Invalid price for {}: {} (must be positive)", symbol, price);
            }
        }
        Ok(Self::from_prices(file.prices))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read price table {}", path.display()))?;
        let oracle = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid price table {}", path.display()))?;
        info!(
            "PriceTable: loaded {} prices from {}",
            oracle.len(),
            path.display()
        );
        Ok(oracle)
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        self.write().insert(symbol.trim().to_uppercase(), price);
    }

    /// Makes a symbol unpriceable.
    pub fn remove_price(&self, symbol: &str) -> Option<Decimal> {
        self.write().remove(&symbol.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-written, so poisoning is ignored.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Decimal>> {
        self.prices.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Decimal>> {
        self.prices.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl PriceOracle for StaticPriceOracle {
    fn price(&self, symbol: &str) -> Option<Decimal> {
        self.read().get(&symbol.trim().to_uppercase()).copied()
    }
}
