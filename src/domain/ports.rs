use rust_decimal::Decimal;

/// Current-price lookup the account depends on.
///
/// Implementations return `None` when they cannot price a symbol. Symbols
/// arrive uppercased, but lookups should still be case-insensitive. The
/// account calls this on every trade and every valuation query; nothing is
/// cached on its side.
pub trait PriceOracle: Send + Sync {
    fn price(&self, symbol: &str) -> Option<Decimal>;
}

impl<F> PriceOracle for F
where
    F: Fn(&str) -> Option<Decimal> + Send + Sync,
{
    fn price(&self, symbol: &str) -> Option<Decimal> {
        self(symbol)
    }
}
