use crate::domain::errors::LedgerError;
use crate::domain::trading::account::Account;
use crate::domain::trading::types::Transaction;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A single ledger mutation, as written on the command line.
///
/// Accepted forms: `deposit:AMOUNT`, `withdraw:AMOUNT`, `buy:SYMBOL:QTY`,
/// `sell:SYMBOL:QTY`.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Deposit(Decimal),
    Withdraw(Decimal),
    Buy { symbol: String, quantity: Decimal },
    Sell { symbol: String, quantity: Decimal },
}

impl LedgerCommand {
    pub fn apply(&self, account: &mut Account) -> Result<Transaction, LedgerError> {
        match self {
            LedgerCommand::Deposit(amount) => account.deposit(*amount),
            LedgerCommand::Withdraw(amount) => account.withdraw(*amount),
            LedgerCommand::Buy { symbol, quantity } => account.buy(symbol, *quantity),
            LedgerCommand::Sell { symbol, quantity } => account.sell(symbol, *quantity),
        }
    }
}

fn parse_decimal(field: &str, raw: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", field, raw, e))
}

impl FromStr for LedgerCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match (parts[0].to_lowercase().as_str(), &parts[1..]) {
            ("deposit", [amount]) => Ok(LedgerCommand::Deposit(parse_decimal("amount", amount)?)),
            ("withdraw", [amount]) => {
                Ok(LedgerCommand::Withdraw(parse_decimal("amount", amount)?))
            }
            ("buy", [symbol, quantity]) => Ok(LedgerCommand::Buy {
                symbol: symbol.to_string(),
                quantity: parse_decimal("quantity", quantity)?,
            }),
            ("sell", [symbol, quantity]) => Ok(LedgerCommand::Sell {
                symbol: symbol.to_string(),
                quantity: parse_decimal("quantity", quantity)?,
            }),
            _ => anyhow::bail!(
                "Invalid command: {}. Expected deposit:AMOUNT, withdraw:AMOUNT, buy:SYMBOL:QTY or sell:SYMBOL:QTY",
                s
            ),
        }
    }
}

impl fmt::Display for LedgerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerCommand::Deposit(amount) => write!(f, "deposit:{}", amount),
            LedgerCommand::Withdraw(amount) => write!(f, "withdraw:{}", amount),
            LedgerCommand::Buy { symbol, quantity } => write!(f, "buy:{}:{}", symbol, quantity),
            LedgerCommand::Sell { symbol, quantity } => write!(f, "sell:{}:{}", symbol, quantity),
        }
    }
}
