//! Request/response shapes at the client boundary.
//!
//! Clients send decimal numbers and a `Bid` flag; the engine works in
//! fixed-point sizes and [`Side`]. This module is the only place the two
//! meet. It knows nothing about the transport: [`handle`] takes a parsed
//! [`Request`] and returns a [`Response`] carrying a status code and a JSON
//! body, and the binary decides how bytes move.
//!
//! ```
//! use exchange_core::api::handle_line;
//! use exchange_core::exchange::Exchange;
//!
//! let exchange = Exchange::new(["ETH"], 1_000);
//! let placed = handle_line(
//!     &exchange,
//!     r#"{"Op":"PlaceOrder","Type":"LIMIT","Bid":false,"Size":20,"Price":10000,"Market":"ETH"}"#,
//! );
//! assert_eq!(placed.status, 200);
//!
//! let book = handle_line(&exchange, r#"{"Op":"GetBook","Market":"ETH"}"#);
//! assert_eq!(book.body["TotalAskVolume"], 20.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::engine::MatchResult;
use crate::error::{EngineError, Result};
use crate::exchange::Exchange;
use crate::orderbook::{Depth, DepthLevel};
use crate::types::price::{f64_to_fixed, fixed_to_f64};
use crate::types::{Fill, Order, Side};

// ============================================================================
// Requests
// ============================================================================

/// Order type on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

/// `{Type, Bid, Size, Price, Market}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaceOrderRequest {
    #[serde(rename = "Type")]
    pub order_type: OrderType,
    pub bid: bool,
    pub size: f64,
    /// Ignored for market orders
    #[serde(default)]
    pub price: f64,
    pub market: String,
}

/// `{Market, ID}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    #[serde(rename = "Market")]
    pub market: String,
    #[serde(rename = "ID")]
    pub id: u64,
}

/// `{Market}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBookRequest {
    #[serde(rename = "Market")]
    pub market: String,
}

/// Any request, tagged by `Op`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Op")]
pub enum Request {
    PlaceOrder(PlaceOrderRequest),
    CancelOrder(CancelOrderRequest),
    GetBook(GetBookRequest),
}

// ============================================================================
// Responses
// ============================================================================

/// One execution as seen by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    #[serde(rename = "MakerID")]
    pub maker_id: u64,
    #[serde(rename = "TakerID")]
    pub taker_id: u64,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "SizeFilled")]
    pub size_filled: f64,
    /// True when the taker was the buyer
    #[serde(rename = "Bid")]
    pub bid: bool,
}

impl From<&Fill> for MatchView {
    fn from(fill: &Fill) -> Self {
        Self {
            maker_id: fill.maker_order_id,
            taker_id: fill.taker_order_id,
            price: fixed_to_f64(fill.price),
            size_filled: fixed_to_f64(fill.size),
            bid: fill.taker_side.is_bid(),
        }
    }
}

/// Result of a placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderResponse {
    #[serde(rename = "OrderID")]
    pub order_id: u64,
    #[serde(rename = "Matches")]
    pub matches: Vec<MatchView>,
    #[serde(rename = "Remaining")]
    pub remaining: f64,
    #[serde(rename = "Resting")]
    pub resting: bool,
}

impl From<&MatchResult> for PlaceOrderResponse {
    fn from(result: &MatchResult) -> Self {
        Self {
            order_id: result.order_id,
            matches: result.fills.iter().map(MatchView::from).collect(),
            remaining: fixed_to_f64(result.remaining),
            resting: result.rested,
        }
    }
}

/// One resting order: `{ID, Price, Size, Bid, TimeStamp}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Size")]
    pub size: f64,
    #[serde(rename = "Bid")]
    pub bid: bool,
    #[serde(rename = "TimeStamp")]
    pub timestamp: u64,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            price: fixed_to_f64(order.price),
            size: fixed_to_f64(order.remaining),
            bid: order.side().is_bid(),
            timestamp: order.timestamp,
        }
    }
}

/// `{TotalAskVolume, TotalBidVolume, Asks, Bids}`
///
/// Orders are flattened best level first, oldest first within a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepthResponse {
    pub total_ask_volume: f64,
    pub total_bid_volume: f64,
    pub asks: Vec<OrderView>,
    pub bids: Vec<OrderView>,
}

fn flatten(levels: &[DepthLevel]) -> Vec<OrderView> {
    levels
        .iter()
        .flat_map(|level| level.orders.iter().map(OrderView::from))
        .collect()
}

impl From<&Depth> for DepthResponse {
    fn from(depth: &Depth) -> Self {
        Self {
            total_ask_volume: fixed_to_f64(depth.total_ask_volume()),
            total_bid_volume: fixed_to_f64(depth.total_bid_volume()),
            asks: flatten(&depth.asks),
            bids: flatten(&depth.bids),
        }
    }
}

/// Status code plus JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(rename = "Status")]
    pub status: u16,
    #[serde(rename = "Body")]
    pub body: Value,
}

impl Response {
    pub fn ok(body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(err) => Self::message(500, &err.to_string()),
        }
    }

    /// `{"msg": ...}` body
    pub fn message(status: u16, msg: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "msg": msg }),
        }
    }

    pub fn from_error(err: &EngineError) -> Self {
        Self::message(err.status_code(), &err.to_string())
    }
}

// ============================================================================
// Handling
// ============================================================================

/// Boundary number to fixed-point; negative, non-finite or out of range is invalid
fn to_fixed(value: f64, reason: &'static str) -> Result<u64> {
    f64_to_fixed(value).ok_or(EngineError::InvalidOrder { reason })
}

fn place_order(exchange: &Exchange, request: &PlaceOrderRequest) -> Result<MatchResult> {
    let side = Side::from_bid(request.bid);
    let size = to_fixed(request.size, "size must be a non-negative number within range")?;

    match request.order_type {
        OrderType::Limit => {
            let price = to_fixed(
                request.price,
                "price must be a non-negative number within range",
            )?;
            exchange.place_limit_order(&request.market, side, price, size)
        }
        OrderType::Market => exchange.place_market_order(&request.market, side, size),
    }
}

/// Execute one request against the exchange
pub fn handle(exchange: &Exchange, request: Request) -> Response {
    let outcome = match &request {
        Request::PlaceOrder(place) => {
            place_order(exchange, place)
                .map(|result| Response::ok(PlaceOrderResponse::from(&result)))
        }
        Request::CancelOrder(cancel) => exchange
            .cancel_order(&cancel.market, cancel.id)
            .map(|_| Response::message(200, "order canceled")),
        Request::GetBook(get) => exchange
            .depth(&get.market)
            .map(|depth| Response::ok(DepthResponse::from(&depth))),
    };

    outcome.unwrap_or_else(|err| {
        warn!(error = %err, ?request, "request rejected");
        Response::from_error(&err)
    })
}

/// Parse one JSON line and execute it; malformed input gets a 400
pub fn handle_line(exchange: &Exchange, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle(exchange, request),
        Err(err) => {
            warn!(error = %err, "malformed request");
            Response::message(400, &format!("malformed request: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exchange() -> Exchange {
        Exchange::new(["ETH"], 64)
    }

    #[test]
    fn test_parse_place_order() {
        let request: Request = serde_json::from_value(json!({
            "Op": "PlaceOrder", "Type": "MARKET", "Bid": true, "Size": 10.5, "Market": "ETH"
        }))
        .unwrap();

        assert_eq!(
            request,
            Request::PlaceOrder(PlaceOrderRequest {
                order_type: OrderType::Market,
                bid: true,
                size: 10.5,
                price: 0.0,
                market: "ETH".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_cancel() {
        let request: Request =
            serde_json::from_str(r#"{"Op":"CancelOrder","Market":"ETH","ID":3}"#).unwrap();
        assert_eq!(
            request,
            Request::CancelOrder(CancelOrderRequest { market: "ETH".to_string(), id: 3 })
        );
    }

    #[test]
    fn test_limit_then_market_roundtrip() {
        let exchange = exchange();
        let sell = handle_line(
            &exchange,
            r#"{"Op":"PlaceOrder","Type":"LIMIT","Bid":false,"Size":20,"Price":10000,"Market":"ETH"}"#,
        );
        assert_eq!(sell.status, 200);
        assert_eq!(sell.body["Resting"], true);
        let maker_id = sell.body["OrderID"].as_u64().unwrap();

        let buy = handle_line(
            &exchange,
            r#"{"Op":"PlaceOrder","Type":"MARKET","Bid":true,"Size":10,"Market":"ETH"}"#,
        );
        assert_eq!(buy.status, 200);
        let matches = buy.body["Matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["MakerID"].as_u64(), Some(maker_id));
        assert_eq!(matches[0]["Price"], 10000.0);
        assert_eq!(matches[0]["SizeFilled"], 10.0);
        assert_eq!(matches[0]["Bid"], true);
        assert_eq!(buy.body["Resting"], false);
    }

    #[test]
    fn test_get_book_shape() {
        let exchange = exchange();
        exchange.place_limit_order("ETH", Side::Sell, 1_000_000_000_000, 2_000_000_000).unwrap();
        exchange.place_limit_order("ETH", Side::Sell, 900_000_000_000, 1_000_000_000).unwrap();
        exchange.place_limit_order("ETH", Side::Buy, 800_000_000_000, 500_000_000).unwrap();

        let response = handle(&exchange, Request::GetBook(GetBookRequest { market: "ETH".into() }));
        let depth: DepthResponse = serde_json::from_value(response.body).unwrap();

        assert_eq!(depth.total_ask_volume, 30.0);
        assert_eq!(depth.total_bid_volume, 5.0);
        let ask_prices: Vec<f64> = depth.asks.iter().map(|o| o.price).collect();
        assert_eq!(ask_prices, vec![9_000.0, 10_000.0]);
        assert!(!depth.asks[0].bid);
        assert!(depth.bids[0].bid);
        assert_eq!(depth.bids[0].size, 5.0);
    }

    #[test]
    fn test_error_statuses() {
        let exchange = exchange();

        let unknown = handle_line(&exchange, r#"{"Op":"GetBook","Market":"BTC"}"#);
        assert_eq!(unknown.status, 404);
        assert_eq!(unknown.body["msg"], "market not found: BTC");

        let illiquid = handle_line(
            &exchange,
            r#"{"Op":"PlaceOrder","Type":"MARKET","Bid":true,"Size":30,"Market":"ETH"}"#,
        );
        assert_eq!(illiquid.status, 422);

        let negative = handle_line(
            &exchange,
            r#"{"Op":"PlaceOrder","Type":"LIMIT","Bid":true,"Size":-1,"Price":10,"Market":"ETH"}"#,
        );
        assert_eq!(negative.status, 400);

        let zero_price = handle_line(
            &exchange,
            r#"{"Op":"PlaceOrder","Type":"LIMIT","Bid":true,"Size":1,"Price":0,"Market":"ETH"}"#,
        );
        assert_eq!(zero_price.status, 400);

        let missing = handle_line(&exchange, r#"{"Op":"CancelOrder","Market":"ETH","ID":77}"#);
        assert_eq!(missing.status, 404);

        let oversized = handle_line(
            &exchange,
            r#"{"Op":"PlaceOrder","Type":"LIMIT","Bid":true,"Size":2e11,"Price":10,"Market":"ETH"}"#,
        );
        assert_eq!(oversized.status, 400);
        assert_eq!(
            oversized.body["msg"],
            "invalid order: size must be a non-negative number within range"
        );

        let garbage = handle_line(&exchange, "not json");
        assert_eq!(garbage.status, 400);
    }

    #[test]
    fn test_cancel_message() {
        let exchange = exchange();
        let placed = exchange.place_limit_order("ETH", Side::Buy, 100, 100).unwrap();

        let response = handle(
            &exchange,
            Request::CancelOrder(CancelOrderRequest { market: "ETH".into(), id: placed.order_id }),
        );

        assert_eq!(response, Response::message(200, "order canceled"));
        assert_eq!(exchange.depth("ETH").unwrap(), Depth::default());
    }
}
