use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Buy,
    Sell,
}

impl TransactionKind {
    pub fn is_trade(&self) -> bool {
        matches!(self, TransactionKind::Buy | TransactionKind::Sell)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "DEPOSIT"),
            TransactionKind::Withdraw => write!(f, "WITHDRAW"),
            TransactionKind::Buy => write!(f, "BUY"),
            TransactionKind::Sell => write!(f, "SELL"),
        }
    }
}

/// One entry of the account's audit trail.
///
/// Only the account creates these, and it never hands out mutable access
/// to them once they are in the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    id: Uuid,
    timestamp: DateTime<Utc>,
    kind: TransactionKind,
    symbol: Option<String>,
    quantity: Decimal,
    price: Decimal,
    amount: Decimal,
}

impl Transaction {
    pub(crate) fn cash(kind: TransactionKind, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            kind,
            symbol: None,
            quantity: Decimal::ZERO,
            price: Decimal::ZERO,
            amount,
        }
    }

    pub(crate) fn trade(
        kind: TransactionKind,
        symbol: String,
        quantity: Decimal,
        price: Decimal,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            kind,
            symbol: Some(symbol),
            quantity,
            price,
            amount,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Ticker for buys and sells, `None` for cash movements.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Signed cash effect: positive flows into the balance, negative out of it.
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(
                f,
                "{} {} {} {} @ {} ({})",
                self.timestamp.to_rfc3339(),
                self.kind,
                self.quantity,
                symbol,
                self.price,
                self.amount
            ),
            None => write!(
                f,
                "{} {} ({})",
                self.timestamp.to_rfc3339(),
                self.kind,
                self.amount
            ),
        }
    }
}

/// Valuation of a single position at the current oracle price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub market_value: Decimal, // Rounded to cents on its own
}

/// Point-in-time report of an account, suitable for printing.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub owner: String,
    pub cash_balance: Decimal,
    pub initial_deposit: Decimal,
    pub holdings: Vec<Holding>,
    pub portfolio_value: Decimal,
    pub total_value: Decimal,
    pub profit_loss: Decimal,
    pub transaction_count: usize,
}
