use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tradeledger::domain::errors::LedgerError;
use tradeledger::domain::trading::account::Account;
use tradeledger::domain::trading::types::TransactionKind;
use tradeledger::infrastructure::price_table::StaticPriceOracle;

fn setup(initial_deposit: Decimal) -> (Arc<StaticPriceOracle>, Account) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let oracle = Arc::new(StaticPriceOracle::from_prices([
        ("AAPL", dec!(150.00)),
        ("TSLA", dec!(200.00)),
        ("GOOGL", dec!(2750.50)),
    ]));
    let account = Account::new("trader", initial_deposit, oracle.clone()).unwrap();
    (oracle, account)
}

#[test]
fn test_buy_sell_round_trip_example() {
    let (_oracle, mut account) = setup(dec!(1000.00));

    account.buy("AAPL", dec!(2)).unwrap();
    assert_eq!(account.cash_balance(), dec!(700.00));
    assert_eq!(account.positions().get("AAPL"), Some(&dec!(2)));
    assert_eq!(account.positions().len(), 1);

    account.sell("AAPL", dec!(1)).unwrap();
    assert_eq!(account.cash_balance(), dec!(850.00));
    assert_eq!(account.positions().get("AAPL"), Some(&dec!(1)));

    assert_eq!(account.total_value().unwrap(), dec!(1000.00));
    assert_eq!(account.profit_loss().unwrap(), dec!(0.00));
}

#[test]
fn test_price_moves_drive_profit_and_loss() {
    let (oracle, mut account) = setup(dec!(10000));

    account.buy("TSLA", dec!(10)).unwrap();
    assert_eq!(account.cash_balance(), dec!(8000.00));

    oracle.set_price("TSLA", dec!(180.00));
    assert_eq!(account.portfolio_value().unwrap(), dec!(1800.00));
    assert_eq!(account.profit_loss().unwrap(), dec!(-200.00));

    oracle.set_price("TSLA", dec!(230.00));
    assert_eq!(account.profit_loss().unwrap(), dec!(300.00));

    // Selling at the new price realizes the gain in cash
    account.sell("TSLA", dec!(10)).unwrap();
    assert_eq!(account.cash_balance(), dec!(10300.00));
    assert!(account.positions().is_empty());
    assert_eq!(account.profit_loss().unwrap(), dec!(300.00));
}

#[test]
fn test_each_query_uses_a_fresh_price() {
    let (oracle, mut account) = setup(dec!(5000));
    account.buy("AAPL", dec!(3)).unwrap();

    assert_eq!(account.holdings().unwrap()[0].market_value, dec!(450.00));
    oracle.set_price("AAPL", dec!(151.115));
    let holdings = account.holdings().unwrap();
    assert_eq!(holdings[0].price, dec!(151.115));
    // 453.345 rounds half-up to 453.35
    assert_eq!(holdings[0].market_value, dec!(453.35));
}

#[test]
fn test_unpriceable_holding_fails_valuation() {
    let (oracle, mut account) = setup(dec!(5000));
    account.buy("AAPL", dec!(1)).unwrap();
    account.buy("TSLA", dec!(1)).unwrap();

    oracle.remove_price("TSLA");

    let expected = LedgerError::UnknownSymbol {
        symbol: "TSLA".to_string(),
    };
    assert_eq!(account.holdings().unwrap_err(), expected);
    assert_eq!(account.portfolio_value().unwrap_err(), expected);
    assert_eq!(account.total_value().unwrap_err(), expected);
    assert_eq!(account.profit_loss().unwrap_err(), expected);

    // Still owned, but cannot be sold without a price
    assert_eq!(account.sell("TSLA", dec!(1)).unwrap_err(), expected);
    assert_eq!(account.shares_of("TSLA"), dec!(1));
}

#[test]
fn test_failed_operations_leave_no_trace() {
    let (_oracle, mut account) = setup(dec!(1000));
    let before_cash = account.cash_balance();
    let before_len = account.transactions().len();

    assert!(matches!(
        account.withdraw(dec!(2000)),
        Err(LedgerError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        account.buy("ZZZZ", dec!(1)),
        Err(LedgerError::UnknownSymbol { .. })
    ));
    assert!(matches!(
        account.buy("GOOGL", dec!(1)),
        Err(LedgerError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        account.sell("AAPL", dec!(1)),
        Err(LedgerError::InsufficientShares { .. })
    ));
    assert!(matches!(
        account.deposit(dec!(-1)),
        Err(LedgerError::InvalidAmount { .. })
    ));

    assert_eq!(account.cash_balance(), before_cash);
    assert_eq!(account.transactions().len(), before_len);
    assert!(account.positions().is_empty());
}

#[test]
fn test_profit_loss_baseline_ignores_later_cash_flows() {
    let (_oracle, mut account) = setup(dec!(1000));

    account.deposit(dec!(500)).unwrap();
    assert_eq!(account.profit_loss().unwrap(), dec!(500.00));

    account.withdraw(dec!(800)).unwrap();
    assert_eq!(account.profit_loss().unwrap(), dec!(-300.00));
    assert_eq!(account.initial_deposit(), dec!(1000.00));
}

#[test]
fn test_fractional_shares_accumulate() {
    let (_oracle, mut account) = setup(dec!(1000));

    account.buy("AAPL", dec!(0.25)).unwrap();
    account.buy("aapl", dec!(0.5)).unwrap();
    assert_eq!(account.shares_of("AAPL"), dec!(0.75));

    account.sell("AAPL", dec!(0.75)).unwrap();
    assert_eq!(account.shares_of("AAPL"), Decimal::ZERO);
    assert!(account.positions().is_empty());
    assert_eq!(account.cash_balance(), dec!(1000.00));
}

#[test]
fn test_transaction_log_is_complete_history() {
    let (_oracle, mut account) = setup(dec!(1000));

    account.deposit(dec!(100)).unwrap();
    account.buy("AAPL", dec!(2)).unwrap();
    account.sell("AAPL", dec!(2)).unwrap();
    account.withdraw(dec!(50)).unwrap();

    let kinds: Vec<TransactionKind> = account.transactions().iter().map(|tx| tx.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Deposit,
            TransactionKind::Deposit,
            TransactionKind::Buy,
            TransactionKind::Sell,
            TransactionKind::Withdraw,
        ]
    );

    // An owned copy is detached from the account
    let mut copy = account.transactions().to_vec();
    copy.clear();
    assert_eq!(account.transactions().len(), 5);

    assert_eq!(account.ledger_balance(), account.cash_balance());
    account.verify_ledger().unwrap();
}

#[test]
fn test_summary_serializes_to_json() {
    let (_oracle, mut account) = setup(dec!(1000));
    account.buy("AAPL", dec!(2)).unwrap();

    let summary = account.summary().unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["owner"], "trader");
    assert_eq!(json["cash_balance"], "700.00");
    assert_eq!(json["holdings"][0]["symbol"], "AAPL");
    assert_eq!(json["transaction_count"], 2);
}
