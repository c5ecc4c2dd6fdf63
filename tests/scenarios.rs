//! End-to-end behavior of the book through its public API.
//!
//! Each test drives an [`OrderBook`] (or an [`Exchange`]) the way a client
//! would and checks fills, resting volume and level layout afterwards.

use exchange_core::api::{handle_line, DepthResponse};
use exchange_core::types::price::to_fixed;
use exchange_core::{EngineError, Exchange, Order, OrderBook, Side};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Fixed-point from a decimal literal
fn fx(value: &str) -> u64 {
    to_fixed(value).expect("valid decimal")
}

fn limit(book: &mut OrderBook, side: Side, price: &str, size: &str) -> u64 {
    book.place_limit_order(fx(price), Order::limit(0, side, fx(size)))
        .expect("limit order accepted")
        .order_id
}

/// Ids resting at one level, in queue order
fn queue(book: &OrderBook, side: Side, price: &str) -> Vec<u64> {
    book.orders_at(side, fx(price)).iter().map(|order| order.id).collect()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn market_buy_partially_consumes_ask() {
    let mut book = OrderBook::new();
    let ask = limit(&mut book, Side::Sell, "10000", "20");
    assert_eq!(book.total_ask_volume(), fx("20"));
    assert_eq!(book.level(Side::Sell, fx("10000")).map(|l| l.total_volume), Some(fx("20")));

    let result = book.place_market_order(Order::market(0, Side::Buy, fx("10"))).unwrap();

    assert_eq!(result.fills.len(), 1);
    assert_eq!(result.fills[0].maker_order_id, ask);
    assert_eq!(result.fills[0].price, fx("10000"));
    assert_eq!(result.filled(), fx("10"));
    assert_eq!(book.total_ask_volume(), fx("10"));
    assert_eq!(book.get_order(ask).map(|o| o.remaining), Some(fx("10")));
    book.check_invariants().unwrap();
}

#[test]
fn oversized_market_buy_is_rejected_untouched() {
    let mut book = OrderBook::new();
    limit(&mut book, Side::Sell, "10000", "20");
    let root = book.state_root().unwrap();

    let err = book.place_market_order(Order::market(0, Side::Buy, fx("30"))).unwrap_err();

    assert_eq!(
        err,
        EngineError::InsufficientLiquidity { requested: fx("30"), available: fx("20") }
    );
    assert_eq!(book.total_ask_volume(), fx("20"));
    assert_eq!(book.total_bid_volume(), 0);
    assert_eq!(book.state_root().unwrap(), root);
}

#[test]
fn cancel_from_middle_of_queue() {
    let mut book = OrderBook::new();
    let a = limit(&mut book, Side::Buy, "10000", "5");
    let b = limit(&mut book, Side::Buy, "10000", "8");
    let c = limit(&mut book, Side::Buy, "10000", "10");

    let cancelled = book.cancel_order(b).unwrap();

    assert_eq!(cancelled.remaining, fx("8"));
    assert_eq!(book.level(Side::Buy, fx("10000")).map(|l| l.total_volume), Some(fx("15")));
    assert_eq!(queue(&book, Side::Buy, "10000"), vec![a, c]);
    book.check_invariants().unwrap();
}

#[test]
fn market_buy_walks_levels_and_evicts_drained_one() {
    let mut book = OrderBook::new();
    let cheap = limit(&mut book, Side::Sell, "9000", "10");
    let dear = limit(&mut book, Side::Sell, "9500", "10");

    let result = book.place_market_order(Order::market(0, Side::Buy, fx("15"))).unwrap();

    let executed: Vec<(u64, u64, u64)> = result
        .fills
        .iter()
        .map(|f| (f.maker_order_id, f.price, f.size))
        .collect();
    assert_eq!(
        executed,
        vec![(cheap, fx("9000"), fx("10")), (dear, fx("9500"), fx("5"))]
    );
    assert!(book.level(Side::Sell, fx("9000")).is_none());
    assert_eq!(book.level(Side::Sell, fx("9500")).map(|l| l.total_volume), Some(fx("5")));
    assert_eq!(book.ask_levels(), 1);
    book.check_invariants().unwrap();
}

// ============================================================================
// PRIORITY AND ATOMICITY
// ============================================================================

#[test]
fn same_price_fills_in_arrival_order() {
    let mut book = OrderBook::new();
    let first = limit(&mut book, Side::Sell, "100", "3");
    let second = limit(&mut book, Side::Sell, "100", "3");
    let third = limit(&mut book, Side::Sell, "100", "3");

    let result = book.place_limit_order(fx("100"), Order::limit(0, Side::Buy, fx("7"))).unwrap();

    let makers: Vec<u64> = result.fills.iter().map(|f| f.maker_order_id).collect();
    assert_eq!(makers, vec![first, second, third]);
    assert_eq!(result.fills[2].size, fx("1"));
    assert_eq!(queue(&book, Side::Sell, "100"), vec![third]);
}

#[test]
fn better_price_fills_before_earlier_order() {
    let mut book = OrderBook::new();
    let early_low = limit(&mut book, Side::Buy, "99", "5");
    let late_high = limit(&mut book, Side::Buy, "101", "5");

    let result = book.place_market_order(Order::market(0, Side::Sell, fx("6"))).unwrap();

    let executed: Vec<(u64, u64)> = result
        .fills
        .iter()
        .map(|f| (f.maker_order_id, f.price))
        .collect();
    assert_eq!(executed, vec![(late_high, fx("101")), (early_low, fx("99"))]);
    assert_eq!(book.best_bid(), Some(fx("99")));
    assert_eq!(book.total_bid_volume(), fx("4"));
}

#[test]
fn cancel_twice_fails_second_time() {
    let mut book = OrderBook::new();
    let id = limit(&mut book, Side::Sell, "100", "1");

    assert!(book.cancel_order(id).is_ok());
    assert_eq!(book.cancel_order(id), Err(EngineError::OrderNotFound(id)));
    assert!(book.is_empty());
}

#[test]
fn cancel_after_full_fill_is_not_found() {
    let mut book = OrderBook::new();
    let id = limit(&mut book, Side::Sell, "100", "1");
    book.place_market_order(Order::market(0, Side::Buy, fx("1"))).unwrap();

    assert_eq!(book.cancel_order(id), Err(EngineError::OrderNotFound(id)));
}

#[test]
fn depth_snapshot_does_not_follow_later_changes() {
    let mut book = OrderBook::new();
    limit(&mut book, Side::Sell, "100", "4");
    let snapshot = book.depth();

    book.place_market_order(Order::market(0, Side::Buy, fx("4"))).unwrap();

    assert_eq!(snapshot.total_ask_volume(), fx("4"));
    assert_eq!(snapshot.asks[0].orders[0].remaining, fx("4"));
    assert!(book.depth().is_empty());
}

// ============================================================================
// EXCHANGE AND JSON BOUNDARY
// ============================================================================

#[test]
fn json_session_matches_book_semantics() {
    let exchange = Exchange::new(["ETH"], 64);

    let lines = [
        r#"{"Op":"PlaceOrder","Type":"LIMIT","Bid":false,"Size":10,"Price":9000,"Market":"ETH"}"#,
        r#"{"Op":"PlaceOrder","Type":"LIMIT","Bid":false,"Size":10,"Price":9500,"Market":"ETH"}"#,
        r#"{"Op":"PlaceOrder","Type":"MARKET","Bid":true,"Size":15,"Market":"ETH"}"#,
    ];
    let responses: Vec<_> = lines.iter().map(|line| handle_line(&exchange, line)).collect();
    assert!(responses.iter().all(|r| r.status == 200));
    assert_eq!(responses[2].body["Matches"].as_array().map(Vec::len), Some(2));

    let book = handle_line(&exchange, r#"{"Op":"GetBook","Market":"ETH"}"#);
    let depth: DepthResponse = serde_json::from_value(book.body).unwrap();
    assert_eq!(depth.total_ask_volume, 5.0);
    assert_eq!(depth.asks.len(), 1);
    assert_eq!(depth.asks[0].price, 9500.0);
    assert!(depth.bids.is_empty());

    let rejected = handle_line(
        &exchange,
        r#"{"Op":"PlaceOrder","Type":"MARKET","Bid":true,"Size":6,"Market":"ETH"}"#,
    );
    assert_eq!(rejected.status, 422);
    assert_eq!(exchange.depth("ETH").unwrap().total_ask_volume(), fx("5"));
}

#[test]
fn largest_sizes_never_overflow_resting_volume() {
    let exchange = Exchange::new(["ETH"], 64);
    let bid = |price: u32| {
        format!(
            r#"{{"Op":"PlaceOrder","Type":"LIMIT","Bid":true,"Size":1e11,"Price":{price},"Market":"ETH"}}"#
        )
    };

    assert_eq!(handle_line(&exchange, &bid(100)).status, 200);
    assert_eq!(handle_line(&exchange, &bid(100)).status, 400);
    assert_eq!(handle_line(&exchange, &bid(99)).status, 400);

    let book = handle_line(&exchange, r#"{"Op":"GetBook","Market":"ETH"}"#);
    let depth: DepthResponse = serde_json::from_value(book.body).unwrap();
    assert_eq!(depth.total_bid_volume, 1e11);
    assert_eq!(depth.bids.len(), 1);
    exchange
        .with_book("ETH", |book| book.check_invariants())
        .unwrap()
        .unwrap();

    let sell = handle_line(
        &exchange,
        r#"{"Op":"PlaceOrder","Type":"MARKET","Bid":false,"Size":1e11,"Market":"ETH"}"#,
    );
    assert_eq!(sell.status, 200);
    assert!(exchange.depth("ETH").unwrap().is_empty());
}
