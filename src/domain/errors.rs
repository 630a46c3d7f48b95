use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections raised by ledger operations.
///
/// Every variant describes a request the account refused before touching
/// its state; none of them leave a partially applied mutation behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Invalid amount {value}: {reason}")]
    InvalidAmount { value: Decimal, reason: String },

    #[error("Insufficient funds: need ${need}, available ${available}")]
    InsufficientFunds { need: Decimal, available: Decimal },

    #[error("Insufficient shares of {symbol}: requested {requested}, owned {owned}")]
    InsufficientShares {
        symbol: String,
        requested: Decimal,
        owned: Decimal,
    },

    #[error("Unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("Ledger mismatch: log sums to ${ledger}, balance is ${balance}")]
    LedgerMismatch { ledger: Decimal, balance: Decimal },
}

impl LedgerError {
    pub(crate) fn invalid_amount(value: Decimal, reason: impl Into<String>) -> Self {
        LedgerError::InvalidAmount {
            value,
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_symbol(symbol: &str) -> Self {
        LedgerError::UnknownSymbol {
            symbol: symbol.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_funds_formatting() {
        let error = LedgerError::InsufficientFunds {
            need: dec!(2000.00),
            available: dec!(1000.00),
        };

        let msg = error.to_string();
        assert!(msg.contains("2000.00"));
        assert!(msg.contains("1000.00"));
    }

    #[test]
    fn test_insufficient_shares_formatting() {
        let error = LedgerError::InsufficientShares {
            symbol: "AAPL".to_string(),
            requested: dec!(3),
            owned: dec!(1.5),
        };

        let msg = error.to_string();
        assert!(msg.contains("AAPL"));
        assert!(msg.contains("requested 3"));
        assert!(msg.contains("owned 1.5"));
    }

    #[test]
    fn test_unknown_symbol_formatting() {
        assert_eq!(
            LedgerError::unknown_symbol("ZZZZ").to_string(),
            "Unknown symbol: ZZZZ"
        );
    }
}
