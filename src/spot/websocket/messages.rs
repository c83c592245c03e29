// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Binance Spot WebSocket message types.
//!
//! Spot streams use standard JSON encoding. The book ticker and partial depth
//! payloads carry no event-type discriminator; they are identified by their
//! topic alone.

use serde::Deserialize;
use ustr::Ustr;

use crate::{
    common::enums::{
        BinanceExecutionType, BinanceKlineInterval, BinanceOrderStatus, BinanceSide,
        BinanceSpotOrderType, BinanceTimeInForce,
    },
    websocket::subscription::StreamPayload,
};

// ------------------------------------------------------------------------------------------------
// Market data stream messages
// ------------------------------------------------------------------------------------------------

/// Trade stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotTradeMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Trade ID.
    #[serde(rename = "t")]
    pub trade_id: u64,
    /// Price.
    #[serde(rename = "p")]
    pub price: String,
    /// Quantity.
    #[serde(rename = "q")]
    pub quantity: String,
    /// Trade time in milliseconds.
    #[serde(rename = "T")]
    pub trade_time: i64,
    /// Is buyer the market maker.
    #[serde(rename = "m")]
    pub is_buyer_maker: bool,
}

impl StreamPayload for BinanceSpotTradeMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Aggregate trade stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotAggTradeMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Aggregate trade ID.
    #[serde(rename = "a")]
    pub agg_trade_id: u64,
    /// Price.
    #[serde(rename = "p")]
    pub price: String,
    /// Quantity.
    #[serde(rename = "q")]
    pub quantity: String,
    /// First trade ID.
    #[serde(rename = "f")]
    pub first_trade_id: u64,
    /// Last trade ID.
    #[serde(rename = "l")]
    pub last_trade_id: u64,
    /// Trade time in milliseconds.
    #[serde(rename = "T")]
    pub trade_time: i64,
    /// Is buyer the market maker.
    #[serde(rename = "m")]
    pub is_buyer_maker: bool,
}

impl StreamPayload for BinanceSpotAggTradeMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Kline/candlestick stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotKlineMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Kline data.
    #[serde(rename = "k")]
    pub kline: BinanceSpotKlineData,
}

impl StreamPayload for BinanceSpotKlineMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Kline data within kline message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotKlineData {
    /// Kline start time.
    #[serde(rename = "t")]
    pub start_time: i64,
    /// Kline close time.
    #[serde(rename = "T")]
    pub close_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Kline interval.
    #[serde(rename = "i")]
    pub interval: BinanceKlineInterval,
    /// First trade ID.
    #[serde(rename = "f")]
    pub first_trade_id: i64,
    /// Last trade ID.
    #[serde(rename = "L")]
    pub last_trade_id: i64,
    /// Open price.
    #[serde(rename = "o")]
    pub open: String,
    /// Close price.
    #[serde(rename = "c")]
    pub close: String,
    /// High price.
    #[serde(rename = "h")]
    pub high: String,
    /// Low price.
    #[serde(rename = "l")]
    pub low: String,
    /// Base asset volume.
    #[serde(rename = "v")]
    pub volume: String,
    /// Number of trades.
    #[serde(rename = "n")]
    pub num_trades: i64,
    /// Is this kline closed.
    #[serde(rename = "x")]
    pub is_closed: bool,
    /// Quote asset volume.
    #[serde(rename = "q")]
    pub quote_volume: String,
    /// Taker buy base asset volume.
    #[serde(rename = "V")]
    pub taker_buy_volume: String,
    /// Taker buy quote asset volume.
    #[serde(rename = "Q")]
    pub taker_buy_quote_volume: String,
}

/// Mini ticker stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotMiniTickerMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Close price.
    #[serde(rename = "c")]
    pub close: String,
    /// Open price.
    #[serde(rename = "o")]
    pub open: String,
    /// High price.
    #[serde(rename = "h")]
    pub high: String,
    /// Low price.
    #[serde(rename = "l")]
    pub low: String,
    /// Total traded base asset volume.
    #[serde(rename = "v")]
    pub volume: String,
    /// Total traded quote asset volume.
    #[serde(rename = "q")]
    pub quote_volume: String,
}

impl StreamPayload for BinanceSpotMiniTickerMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// 24hr ticker stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotTickerMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Price change.
    #[serde(rename = "p")]
    pub price_change: String,
    /// Price change percent.
    #[serde(rename = "P")]
    pub price_change_percent: String,
    /// Weighted average price.
    #[serde(rename = "w")]
    pub weighted_avg_price: String,
    /// Last price.
    #[serde(rename = "c")]
    pub last_price: String,
    /// Last quantity.
    #[serde(rename = "Q")]
    pub last_qty: String,
    /// Best bid price.
    #[serde(rename = "b")]
    pub best_bid_price: String,
    /// Best bid quantity.
    #[serde(rename = "B")]
    pub best_bid_qty: String,
    /// Best ask price.
    #[serde(rename = "a")]
    pub best_ask_price: String,
    /// Best ask quantity.
    #[serde(rename = "A")]
    pub best_ask_qty: String,
    /// Open price.
    #[serde(rename = "o")]
    pub open: String,
    /// High price.
    #[serde(rename = "h")]
    pub high: String,
    /// Low price.
    #[serde(rename = "l")]
    pub low: String,
    /// Total traded base asset volume.
    #[serde(rename = "v")]
    pub volume: String,
    /// Total traded quote asset volume.
    #[serde(rename = "q")]
    pub quote_volume: String,
    /// Statistics open time.
    #[serde(rename = "O")]
    pub open_time: i64,
    /// Statistics close time.
    #[serde(rename = "C")]
    pub close_time: i64,
    /// Number of trades.
    #[serde(rename = "n")]
    pub num_trades: i64,
}

impl StreamPayload for BinanceSpotTickerMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Book ticker stream message.
///
/// Carries no event-type discriminator or event timestamp on Spot.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotBookTickerMsg {
    /// Order book update ID.
    #[serde(rename = "u")]
    pub update_id: u64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Best bid price.
    #[serde(rename = "b")]
    pub best_bid_price: String,
    /// Best bid quantity.
    #[serde(rename = "B")]
    pub best_bid_qty: String,
    /// Best ask price.
    #[serde(rename = "a")]
    pub best_ask_price: String,
    /// Best ask quantity.
    #[serde(rename = "A")]
    pub best_ask_qty: String,
}

impl StreamPayload for BinanceSpotBookTickerMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }
}

/// Order book depth update stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotDepthUpdateMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// First update ID.
    #[serde(rename = "U")]
    pub first_update_id: u64,
    /// Final update ID.
    #[serde(rename = "u")]
    pub final_update_id: u64,
    /// Bids [price, quantity].
    #[serde(rename = "b")]
    pub bids: Vec<[String; 2]>,
    /// Asks [price, quantity].
    #[serde(rename = "a")]
    pub asks: Vec<[String; 2]>,
}

impl StreamPayload for BinanceSpotDepthUpdateMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }

    fn book_sequence(&self) -> Option<u64> {
        Some(self.final_update_id)
    }
}

/// Partial book depth stream message.
///
/// Carries neither event-type discriminator nor symbol; the topic string is
/// the only identity.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotPartialDepthMsg {
    /// Last update ID.
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: u64,
    /// Bids [price, quantity].
    pub bids: Vec<[String; 2]>,
    /// Asks [price, quantity].
    pub asks: Vec<[String; 2]>,
}

impl StreamPayload for BinanceSpotPartialDepthMsg {
    fn book_sequence(&self) -> Option<u64> {
        Some(self.last_update_id)
    }
}

// ------------------------------------------------------------------------------------------------
// User data stream messages
// ------------------------------------------------------------------------------------------------

/// `executionReport` user data event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotExecutionReportMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Client order ID.
    #[serde(rename = "c")]
    pub client_order_id: String,
    /// Order side.
    #[serde(rename = "S")]
    pub side: BinanceSide,
    /// Order type.
    #[serde(rename = "o")]
    pub order_type: BinanceSpotOrderType,
    /// Time in force.
    #[serde(rename = "f")]
    pub time_in_force: BinanceTimeInForce,
    /// Order quantity.
    #[serde(rename = "q")]
    pub quantity: String,
    /// Order price.
    #[serde(rename = "p")]
    pub price: String,
    /// Stop price.
    #[serde(rename = "P")]
    pub stop_price: String,
    /// Original client order ID (on cancels).
    #[serde(rename = "C", default)]
    pub orig_client_order_id: Option<String>,
    /// Execution type.
    #[serde(rename = "x")]
    pub execution_type: BinanceExecutionType,
    /// Order status.
    #[serde(rename = "X")]
    pub status: BinanceOrderStatus,
    /// Order reject reason.
    #[serde(rename = "r")]
    pub reject_reason: String,
    /// Order ID.
    #[serde(rename = "i")]
    pub order_id: u64,
    /// Last executed quantity.
    #[serde(rename = "l")]
    pub last_executed_qty: String,
    /// Cumulative filled quantity.
    #[serde(rename = "z")]
    pub cumulative_qty: String,
    /// Last executed price.
    #[serde(rename = "L")]
    pub last_executed_price: String,
    /// Commission amount.
    #[serde(rename = "n")]
    pub commission: String,
    /// Commission asset.
    #[serde(rename = "N", default)]
    pub commission_asset: Option<String>,
    /// Transaction time in milliseconds.
    #[serde(rename = "T")]
    pub transaction_time: i64,
    /// Trade ID.
    #[serde(rename = "t")]
    pub trade_id: i64,
    /// Is the order on the book.
    #[serde(rename = "w")]
    pub is_working: bool,
    /// Is the trade on the maker side.
    #[serde(rename = "m")]
    pub is_maker: bool,
    /// Order creation time in milliseconds.
    #[serde(rename = "O")]
    pub order_creation_time: i64,
    /// Cumulative quote asset transacted quantity.
    #[serde(rename = "Z")]
    pub cumulative_quote_qty: String,
    /// Last quote asset transacted quantity.
    #[serde(rename = "Y")]
    pub last_quote_qty: String,
    /// Quote order quantity.
    #[serde(rename = "Q")]
    pub quote_order_qty: String,
}

impl StreamPayload for BinanceSpotExecutionReportMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// `outboundAccountPosition` user data event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotAccountPositionMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Time of last account update in milliseconds.
    #[serde(rename = "u")]
    pub last_update_time: i64,
    /// Balances changed by the account update.
    #[serde(rename = "B", default)]
    pub balances: Vec<BinanceSpotBalance>,
}

impl StreamPayload for BinanceSpotAccountPositionMsg {
    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Balance entry within an `outboundAccountPosition` event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSpotBalance {
    /// Asset.
    #[serde(rename = "a")]
    pub asset: Ustr,
    /// Free amount.
    #[serde(rename = "f")]
    pub free: String,
    /// Locked amount.
    #[serde(rename = "l")]
    pub locked: String,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_deserialize_trade() {
        let raw = r#"{
            "e": "trade", "E": 1672515782136, "s": "BNBBTC", "t": 12345,
            "p": "0.001", "q": "100", "T": 1672515782136, "m": true, "M": true
        }"#;
        let msg: BinanceSpotTradeMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.trade_id, 12_345);
        assert_eq!(msg.symbol(), Some(Ustr::from("BNBBTC")));
    }

    #[rstest]
    fn test_deserialize_book_ticker_without_event_type() {
        let raw = r#"{
            "u": 400900217, "s": "BNBUSDT", "b": "25.35190000",
            "B": "31.21000000", "a": "25.36520000", "A": "40.66000000"
        }"#;
        let msg: BinanceSpotBookTickerMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.update_id, 400_900_217);
        assert!(msg.event_time().is_none());
    }

    #[rstest]
    fn test_deserialize_partial_depth_exposes_sequence() {
        let raw = r#"{
            "lastUpdateId": 160,
            "bids": [["0.0024", "10"]],
            "asks": [["0.0026", "100"]]
        }"#;
        let msg: BinanceSpotPartialDepthMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.book_sequence(), Some(160));
        assert!(msg.symbol().is_none());
    }

    #[rstest]
    fn test_deserialize_execution_report() {
        let raw = r#"{
            "e": "executionReport", "E": 1499405658658, "s": "ETHBTC",
            "c": "mUvoqJxFIILMdfAW5iGSOW", "S": "BUY", "o": "LIMIT", "f": "GTC",
            "q": "1.00000000", "p": "0.10264410", "P": "0.00000000",
            "F": "0.00000000", "g": -1, "C": "", "x": "NEW", "X": "NEW",
            "r": "NONE", "i": 4293153, "l": "0.00000000", "z": "0.00000000",
            "L": "0.00000000", "n": "0", "N": null, "T": 1499405658657,
            "t": -1, "I": 8641984, "w": true, "m": false, "M": false,
            "O": 1499405658657, "Z": "0.00000000", "Y": "0.00000000",
            "Q": "0.00000000"
        }"#;
        let msg: BinanceSpotExecutionReportMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.side, BinanceSide::Buy);
        assert_eq!(msg.execution_type, BinanceExecutionType::New);
        assert_eq!(msg.status, BinanceOrderStatus::New);
        assert!(msg.commission_asset.is_none());
    }

    #[rstest]
    fn test_deserialize_account_position() {
        let raw = r#"{
            "e": "outboundAccountPosition", "E": 1564034571105, "u": 1564034571073,
            "B": [{"a": "ETH", "f": "10000.000000", "l": "0.000000"}]
        }"#;
        let msg: BinanceSpotAccountPositionMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.balances[0].asset, Ustr::from("ETH"));
        assert_eq!(msg.balances[0].free, "10000.000000");
    }
}
