use crate::domain::errors::LedgerError;
use crate::domain::ports::PriceOracle;
use crate::domain::trading::money::{
    normalize_symbol, round_money, validate_amount, validate_quantity,
};
use crate::domain::trading::types::{AccountSummary, Holding, Transaction, TransactionKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Single-owner trading account: cash, share positions and the audit log.
///
/// Every mutation validates first and only then touches state, so a
/// rejected request leaves the account exactly as it was. Mutations take
/// `&mut self`; callers sharing an account across threads wrap it in their
/// own lock.
pub struct Account {
    owner: String,
    cash_balance: Decimal,
    initial_deposit: Decimal,
    positions: BTreeMap<String, Decimal>,
    transactions: Vec<Transaction>,
    oracle: Arc<dyn PriceOracle>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("owner", &self.owner)
            .field("cash_balance", &self.cash_balance)
            .field("initial_deposit", &self.initial_deposit)
            .field("positions", &self.positions)
            .field("transactions", &self.transactions.len())
            .finish_non_exhaustive()
    }
}

impl Account {
    /// Open an account. A positive initial deposit is logged as the first transaction.
    pub fn new(
        owner: impl Into<String>,
        initial_deposit: Decimal,
        oracle: Arc<dyn PriceOracle>,
    ) -> Result<Self, LedgerError> {
        let owner = owner.into();
        if initial_deposit < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(
                initial_deposit,
                "initial deposit cannot be negative",
            ));
        }
        let initial_deposit = round_money(initial_deposit);

        let mut account = Self {
            owner,
            cash_balance: initial_deposit,
            initial_deposit,
            positions: BTreeMap::new(),
            transactions: Vec::new(),
            oracle,
        };

        if initial_deposit > Decimal::ZERO {
            let tx = Transaction::cash(
                TransactionKind::Deposit,
                initial_deposit,
                account.next_timestamp(),
            );
            account.transactions.push(tx);
        }

        info!(
            "Account {}: opened with initial deposit ${}",
            account.owner, account.initial_deposit
        );
        Ok(account)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn cash_balance(&self) -> Decimal {
        self.cash_balance
    }

    /// Profit/loss baseline, fixed at creation.
    pub fn initial_deposit(&self) -> Decimal {
        self.initial_deposit
    }

    /// Open positions keyed by symbol. Every quantity is strictly positive.
    pub fn positions(&self) -> &BTreeMap<String, Decimal> {
        &self.positions
    }

    pub fn shares_of(&self, symbol: &str) -> Decimal {
        self.positions
            .get(&normalize_symbol(symbol))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The full history, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Buys and sells of one symbol, oldest first.
    pub fn transactions_for(&self, symbol: &str) -> impl Iterator<Item = &Transaction> {
        let symbol = normalize_symbol(symbol);
        self.transactions
            .iter()
            .filter(move |tx| tx.kind().is_trade() && tx.symbol() == Some(symbol.as_str()))
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<Transaction, LedgerError> {
        self.apply_deposit(amount)
            .inspect_err(|e| warn!("Account {}: deposit rejected: {}", self.owner, e))
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<Transaction, LedgerError> {
        self.apply_withdraw(amount)
            .inspect_err(|e| warn!("Account {}: withdraw rejected: {}", self.owner, e))
    }

    pub fn buy(&mut self, symbol: &str, quantity: Decimal) -> Result<Transaction, LedgerError> {
        self.apply_buy(symbol, quantity)
            .inspect_err(|e| warn!("Account {}: buy rejected: {}", self.owner, e))
    }

    pub fn sell(&mut self, symbol: &str, quantity: Decimal) -> Result<Transaction, LedgerError> {
        self.apply_sell(symbol, quantity)
            .inspect_err(|e| warn!("Account {}: sell rejected: {}", self.owner, e))
    }

    fn apply_deposit(&mut self, amount: Decimal) -> Result<Transaction, LedgerError> {
        let amount = validate_amount(amount)?;
        let balance = self
            .cash_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::invalid_amount(amount, "balance would overflow"))?;

        self.cash_balance = balance;
        let tx = Transaction::cash(TransactionKind::Deposit, amount, self.next_timestamp());
        Ok(self.record(tx))
    }

    fn apply_withdraw(&mut self, amount: Decimal) -> Result<Transaction, LedgerError> {
        let amount = validate_amount(amount)?;
        if amount > self.cash_balance {
            return Err(LedgerError::InsufficientFunds {
                need: amount,
                available: self.cash_balance,
            });
        }

        self.cash_balance -= amount;
        let tx = Transaction::cash(TransactionKind::Withdraw, -amount, self.next_timestamp());
        Ok(self.record(tx))
    }

    fn apply_buy(&mut self, symbol: &str, quantity: Decimal) -> Result<Transaction, LedgerError> {
        let quantity = validate_quantity(quantity)?;
        let symbol = normalize_symbol(symbol);
        let price = self.lookup_price(&symbol)?;
        let cost = trade_value(price, quantity)?;

        if cost > self.cash_balance {
            return Err(LedgerError::InsufficientFunds {
                need: cost,
                available: self.cash_balance,
            });
        }
        let position = self
            .shares_of(&symbol)
            .checked_add(quantity)
            .ok_or_else(|| LedgerError::invalid_amount(quantity, "position would overflow"))?;

        self.cash_balance -= cost;
        self.positions.insert(symbol.clone(), position);

        let tx = Transaction::trade(
            TransactionKind::Buy,
            symbol,
            quantity,
            price,
            -cost,
            self.next_timestamp(),
        );
        Ok(self.record(tx))
    }

    fn apply_sell(&mut self, symbol: &str, quantity: Decimal) -> Result<Transaction, LedgerError> {
        let quantity = validate_quantity(quantity)?;
        let symbol = normalize_symbol(symbol);
        let owned = self.positions.get(&symbol).copied().unwrap_or(Decimal::ZERO);
        if quantity > owned {
            return Err(LedgerError::InsufficientShares {
                symbol,
                requested: quantity,
                owned,
            });
        }
        let price = self.lookup_price(&symbol)?;
        let proceeds = trade_value(price, quantity)?;
        let balance = self
            .cash_balance
            .checked_add(proceeds)
            .ok_or_else(|| LedgerError::invalid_amount(proceeds, "balance would overflow"))?;

        self.cash_balance = balance;
        let remaining = owned - quantity;
        if remaining.is_zero() {
            self.positions.remove(&symbol);
        } else {
            self.positions.insert(symbol.clone(), remaining);
        }

        let tx = Transaction::trade(
            TransactionKind::Sell,
            symbol,
            quantity,
            price,
            proceeds,
            self.next_timestamp(),
        );
        Ok(self.record(tx))
    }

    /// Current valuation of every position, each market value rounded on its own.
    pub fn holdings(&self) -> Result<Vec<Holding>, LedgerError> {
        let priced = self.priced_positions()?;
        holdings_from(&priced)
    }

    /// Market value of all positions, summed unrounded and rounded once.
    pub fn portfolio_value(&self) -> Result<Decimal, LedgerError> {
        let priced = self.priced_positions()?;
        Ok(round_money(unrounded_value(&priced)?))
    }

    pub fn total_value(&self) -> Result<Decimal, LedgerError> {
        let priced = self.priced_positions()?;
        self.total_from(&priced)
    }

    /// Gain or loss against the initial deposit. Later deposits and withdrawals
    /// are not re-baselined.
    pub fn profit_loss(&self) -> Result<Decimal, LedgerError> {
        let total = self.total_value()?;
        Ok(round_money(total - self.initial_deposit))
    }

    /// Prices each symbol once and derives every figure from that single snapshot.
    pub fn summary(&self) -> Result<AccountSummary, LedgerError> {
        let priced = self.priced_positions()?;
        let holdings = holdings_from(&priced)?;
        let portfolio_value = round_money(unrounded_value(&priced)?);
        let total_value = self.total_from(&priced)?;

        Ok(AccountSummary {
            owner: self.owner.clone(),
            cash_balance: self.cash_balance,
            initial_deposit: self.initial_deposit,
            holdings,
            portfolio_value,
            total_value,
            profit_loss: round_money(total_value - self.initial_deposit),
            transaction_count: self.transactions.len(),
        })
    }

    /// Sum of every signed amount in the log.
    pub fn ledger_balance(&self) -> Decimal {
        self.transactions.iter().map(Transaction::amount).sum()
    }

    /// Checks that replaying the log from zero reproduces the cash balance.
    pub fn verify_ledger(&self) -> Result<(), LedgerError> {
        let ledger = self.ledger_balance();
        if ledger != self.cash_balance {
            return Err(LedgerError::LedgerMismatch {
                ledger,
                balance: self.cash_balance,
            });
        }
        Ok(())
    }

    fn lookup_price(&self, symbol: &str) -> Result<Decimal, LedgerError> {
        match self.oracle.price(symbol) {
            Some(price) if price > Decimal::ZERO => {
                debug!("Account {}: {} priced at ${}", self.owner, symbol, price);
                Ok(price)
            }
            Some(price) => {
                warn!(
                    "Account {}: oracle returned non-positive price {} for {}",
                    self.owner, price, symbol
                );
                Err(LedgerError::unknown_symbol(symbol))
            }
            None => Err(LedgerError::unknown_symbol(symbol)),
        }
    }

    fn priced_positions(&self) -> Result<Vec<(&str, Decimal, Decimal)>, LedgerError> {
        self.positions
            .iter()
            .map(|(symbol, quantity)| -> Result<_, LedgerError> {
                let price = self.lookup_price(symbol)?;
                Ok((symbol.as_str(), *quantity, price))
            })
            .collect()
    }

    fn total_from(&self, priced: &[(&str, Decimal, Decimal)]) -> Result<Decimal, LedgerError> {
        let positions = unrounded_value(priced)?;
        let total = self
            .cash_balance
            .checked_add(positions)
            .ok_or_else(|| LedgerError::invalid_amount(positions, "account value overflows"))?;
        Ok(round_money(total))
    }

    /// Later than or equal to the last logged timestamp, even if the wall clock steps back.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.transactions.last() {
            Some(last) if last.timestamp() > now => last.timestamp(),
            _ => now,
        }
    }

    fn record(&mut self, tx: Transaction) -> Transaction {
        info!(
            "Account {}: {} applied, cash balance ${}",
            self.owner, tx, self.cash_balance
        );
        self.transactions.push(tx.clone());
        tx
    }
}

fn trade_value(price: Decimal, quantity: Decimal) -> Result<Decimal, LedgerError> {
    price
        .checked_mul(quantity)
        .map(round_money)
        .ok_or_else(|| LedgerError::invalid_amount(quantity, "trade value overflows"))
}

fn holdings_from(priced: &[(&str, Decimal, Decimal)]) -> Result<Vec<Holding>, LedgerError> {
    priced
        .iter()
        .map(|(symbol, quantity, price)| -> Result<Holding, LedgerError> {
            Ok(Holding {
                symbol: symbol.to_string(),
                quantity: *quantity,
                price: *price,
                market_value: trade_value(*price, *quantity)?,
            })
        })
        .collect()
}

fn unrounded_value(priced: &[(&str, Decimal, Decimal)]) -> Result<Decimal, LedgerError> {
    priced
        .iter()
        .try_fold(Decimal::ZERO, |acc, (_, quantity, price)| {
            price
                .checked_mul(*quantity)
                .and_then(|value| acc.checked_add(value))
        })
        .ok_or_else(|| LedgerError::invalid_amount(Decimal::ZERO, "portfolio value overflows"))
}
