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

//! Binance Futures WebSocket message types.
//!
//! Futures streams use standard JSON encoding. Most payloads carry an
//! embedded event-type discriminator (`e`) and an event timestamp (`E`).

use serde::Deserialize;
use ustr::Ustr;

use crate::{
    common::enums::{
        BinanceExecutionType, BinanceFuturesOrderType, BinanceKlineInterval, BinanceOrderStatus,
        BinancePositionSide, BinanceSide, BinanceTimeInForce, BinanceWorkingType,
    },
    websocket::subscription::StreamPayload,
};

// ------------------------------------------------------------------------------------------------
// Market data stream messages
// ------------------------------------------------------------------------------------------------

/// Aggregate trade stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesAggTradeMsg {
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

impl StreamPayload for BinanceFuturesAggTradeMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Mark price stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesMarkPriceMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Mark price.
    #[serde(rename = "p")]
    pub mark_price: String,
    /// Index price.
    #[serde(rename = "i")]
    pub index_price: String,
    /// Estimated settle price.
    #[serde(rename = "P")]
    pub estimated_settle_price: String,
    /// Funding rate.
    #[serde(rename = "r")]
    pub funding_rate: String,
    /// Next funding time in milliseconds.
    #[serde(rename = "T")]
    pub next_funding_time: i64,
}

impl StreamPayload for BinanceFuturesMarkPriceMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Kline/candlestick stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesKlineMsg {
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
    pub kline: BinanceFuturesKlineData,
}

impl StreamPayload for BinanceFuturesKlineMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Kline data within kline message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesKlineData {
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
pub struct BinanceFuturesMiniTickerMsg {
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

impl StreamPayload for BinanceFuturesMiniTickerMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// 24hr ticker stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesTickerMsg {
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
    /// First trade ID.
    #[serde(rename = "F")]
    pub first_trade_id: i64,
    /// Last trade ID.
    #[serde(rename = "L")]
    pub last_trade_id: i64,
    /// Number of trades.
    #[serde(rename = "n")]
    pub num_trades: i64,
}

impl StreamPayload for BinanceFuturesTickerMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Book ticker stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesBookTickerMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Update ID.
    #[serde(rename = "u")]
    pub update_id: u64,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Transaction time in milliseconds.
    #[serde(rename = "T")]
    pub transaction_time: i64,
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

impl StreamPayload for BinanceFuturesBookTickerMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Order book depth update stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesDepthUpdateMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Transaction time in milliseconds.
    #[serde(rename = "T")]
    pub transaction_time: i64,
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// First update ID.
    #[serde(rename = "U")]
    pub first_update_id: u64,
    /// Final update ID.
    #[serde(rename = "u")]
    pub final_update_id: u64,
    /// Previous final update ID.
    #[serde(rename = "pu")]
    pub prev_final_update_id: u64,
    /// Bids [price, quantity].
    #[serde(rename = "b")]
    pub bids: Vec<[String; 2]>,
    /// Asks [price, quantity].
    #[serde(rename = "a")]
    pub asks: Vec<[String; 2]>,
}

impl StreamPayload for BinanceFuturesDepthUpdateMsg {
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

/// Liquidation order stream message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesLiquidationMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Order data.
    #[serde(rename = "o")]
    pub order: BinanceFuturesLiquidationOrder,
}

impl StreamPayload for BinanceFuturesLiquidationMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.order.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Liquidation order details.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesLiquidationOrder {
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Order side.
    #[serde(rename = "S")]
    pub side: BinanceSide,
    /// Order type.
    #[serde(rename = "o")]
    pub order_type: BinanceFuturesOrderType,
    /// Time in force.
    #[serde(rename = "f")]
    pub time_in_force: BinanceTimeInForce,
    /// Original quantity.
    #[serde(rename = "q")]
    pub original_qty: String,
    /// Price.
    #[serde(rename = "p")]
    pub price: String,
    /// Average price.
    #[serde(rename = "ap")]
    pub average_price: String,
    /// Order status.
    #[serde(rename = "X")]
    pub status: BinanceOrderStatus,
    /// Last filled quantity.
    #[serde(rename = "l")]
    pub last_filled_qty: String,
    /// Accumulated filled quantity.
    #[serde(rename = "z")]
    pub accumulated_qty: String,
    /// Trade time in milliseconds.
    #[serde(rename = "T")]
    pub trade_time: i64,
}

// ------------------------------------------------------------------------------------------------
// User data stream messages
// ------------------------------------------------------------------------------------------------

/// `ORDER_TRADE_UPDATE` user data event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesOrderUpdateMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Transaction time in milliseconds.
    #[serde(rename = "T")]
    pub transaction_time: i64,
    /// Order details.
    #[serde(rename = "o")]
    pub order: BinanceFuturesOrderUpdateData,
}

impl StreamPayload for BinanceFuturesOrderUpdateMsg {
    fn symbol(&self) -> Option<Ustr> {
        Some(self.order.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Order details within an `ORDER_TRADE_UPDATE` event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesOrderUpdateData {
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
    pub order_type: BinanceFuturesOrderType,
    /// Time in force.
    #[serde(rename = "f")]
    pub time_in_force: BinanceTimeInForce,
    /// Original quantity.
    #[serde(rename = "q")]
    pub original_qty: String,
    /// Original price.
    #[serde(rename = "p")]
    pub original_price: String,
    /// Average price.
    #[serde(rename = "ap")]
    pub average_price: String,
    /// Stop price.
    #[serde(rename = "sp", default)]
    pub stop_price: Option<String>,
    /// Execution type.
    #[serde(rename = "x")]
    pub execution_type: BinanceExecutionType,
    /// Order status.
    #[serde(rename = "X")]
    pub status: BinanceOrderStatus,
    /// Order ID.
    #[serde(rename = "i")]
    pub order_id: u64,
    /// Last filled quantity.
    #[serde(rename = "l")]
    pub last_filled_qty: String,
    /// Accumulated filled quantity.
    #[serde(rename = "z")]
    pub accumulated_qty: String,
    /// Last filled price.
    #[serde(rename = "L")]
    pub last_filled_price: String,
    /// Commission asset.
    #[serde(rename = "N", default)]
    pub commission_asset: Option<String>,
    /// Commission amount.
    #[serde(rename = "n", default)]
    pub commission: Option<String>,
    /// Order trade time in milliseconds.
    #[serde(rename = "T")]
    pub trade_time: i64,
    /// Trade ID.
    #[serde(rename = "t")]
    pub trade_id: u64,
    /// Is the trade on the maker side.
    #[serde(rename = "m")]
    pub is_maker: bool,
    /// Is this a reduce-only order.
    #[serde(rename = "R")]
    pub is_reduce_only: bool,
    /// Working type for the stop price.
    #[serde(rename = "wt")]
    pub working_type: BinanceWorkingType,
    /// Original order type.
    #[serde(rename = "ot")]
    pub original_order_type: BinanceFuturesOrderType,
    /// Position side.
    #[serde(rename = "ps")]
    pub position_side: BinancePositionSide,
    /// Close-all flag (close position orders only).
    #[serde(rename = "cp", default)]
    pub close_position: Option<bool>,
    /// Realized profit of the trade.
    #[serde(rename = "rp", default)]
    pub realized_profit: Option<String>,
}

/// `ACCOUNT_UPDATE` user data event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesAccountUpdateMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Transaction time in milliseconds.
    #[serde(rename = "T")]
    pub transaction_time: i64,
    /// Account update details.
    #[serde(rename = "a")]
    pub update: BinanceFuturesAccountUpdateData,
}

impl StreamPayload for BinanceFuturesAccountUpdateMsg {
    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Account update details within an `ACCOUNT_UPDATE` event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesAccountUpdateData {
    /// Event reason type (DEPOSIT, ORDER, FUNDING_FEE, ...).
    #[serde(rename = "m")]
    pub reason: String,
    /// Updated balances.
    #[serde(rename = "B", default)]
    pub balances: Vec<BinanceFuturesBalanceUpdate>,
    /// Updated positions.
    #[serde(rename = "P", default)]
    pub positions: Vec<BinanceFuturesPositionUpdate>,
}

/// Balance entry within an `ACCOUNT_UPDATE` event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesBalanceUpdate {
    /// Asset.
    #[serde(rename = "a")]
    pub asset: Ustr,
    /// Wallet balance.
    #[serde(rename = "wb")]
    pub wallet_balance: String,
    /// Cross wallet balance.
    #[serde(rename = "cw")]
    pub cross_wallet_balance: String,
    /// Balance change except PnL and commission.
    #[serde(rename = "bc", default)]
    pub balance_change: Option<String>,
}

/// Position entry within an `ACCOUNT_UPDATE` event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesPositionUpdate {
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Position amount.
    #[serde(rename = "pa")]
    pub position_amount: String,
    /// Entry price.
    #[serde(rename = "ep")]
    pub entry_price: String,
    /// Accumulated realized PnL.
    #[serde(rename = "cr")]
    pub accumulated_realized: String,
    /// Unrealized PnL.
    #[serde(rename = "up")]
    pub unrealized_pnl: String,
    /// Margin type (isolated or cross).
    #[serde(rename = "mt")]
    pub margin_type: String,
    /// Isolated wallet (isolated positions only).
    #[serde(rename = "iw", default)]
    pub isolated_wallet: Option<String>,
    /// Position side.
    #[serde(rename = "ps")]
    pub position_side: BinancePositionSide,
}

/// `ACCOUNT_CONFIG_UPDATE` user data event (leverage or multi-assets mode).
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesAccountConfigUpdateMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Transaction time in milliseconds.
    #[serde(rename = "T")]
    pub transaction_time: i64,
    /// Leverage configuration change, when present.
    #[serde(rename = "ac", default)]
    pub leverage_config: Option<BinanceFuturesLeverageConfig>,
    /// Multi-assets mode change, when present.
    #[serde(rename = "ai", default)]
    pub multi_assets_config: Option<BinanceFuturesMultiAssetsConfig>,
}

impl StreamPayload for BinanceFuturesAccountConfigUpdateMsg {
    fn symbol(&self) -> Option<Ustr> {
        self.leverage_config.as_ref().map(|c| c.symbol)
    }

    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Leverage configuration within an `ACCOUNT_CONFIG_UPDATE` event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesLeverageConfig {
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Leverage.
    #[serde(rename = "l")]
    pub leverage: u32,
}

/// Multi-assets mode within an `ACCOUNT_CONFIG_UPDATE` event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesMultiAssetsConfig {
    /// Multi-assets mode enabled.
    #[serde(rename = "j")]
    pub multi_assets_mode: bool,
}

/// `MARGIN_CALL` user data event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesMarginCallMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Cross wallet balance (cross margin calls only).
    #[serde(rename = "cw", default)]
    pub cross_wallet_balance: Option<String>,
    /// Positions under margin call.
    #[serde(rename = "p", default)]
    pub positions: Vec<BinanceFuturesMarginCallPosition>,
}

impl StreamPayload for BinanceFuturesMarginCallMsg {
    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

/// Position entry within a `MARGIN_CALL` event.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceFuturesMarginCallPosition {
    /// Symbol.
    #[serde(rename = "s")]
    pub symbol: Ustr,
    /// Position side.
    #[serde(rename = "ps")]
    pub position_side: BinancePositionSide,
    /// Position amount.
    #[serde(rename = "pa")]
    pub position_amount: String,
    /// Margin type.
    #[serde(rename = "mt")]
    pub margin_type: String,
    /// Isolated wallet (isolated positions only).
    #[serde(rename = "iw", default)]
    pub isolated_wallet: Option<String>,
    /// Mark price.
    #[serde(rename = "mp")]
    pub mark_price: String,
    /// Unrealized PnL.
    #[serde(rename = "up")]
    pub unrealized_pnl: String,
    /// Maintenance margin required.
    #[serde(rename = "mm")]
    pub maintenance_margin: String,
}

/// `listenKeyExpired` user data event.
///
/// The subscription stays registered; the caller is expected to obtain a new
/// key and resubscribe.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceListenKeyExpiredMsg {
    /// Event type.
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time in milliseconds.
    #[serde(rename = "E")]
    pub event_time: i64,
    /// The expired listen key.
    #[serde(rename = "listenKey")]
    pub listen_key: Ustr,
}

impl StreamPayload for BinanceListenKeyExpiredMsg {
    fn event_time(&self) -> Option<i64> {
        Some(self.event_time)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_deserialize_agg_trade() {
        let raw = r#"{
            "e": "aggTrade", "E": 123456789, "s": "BTCUSDT", "a": 5933014,
            "p": "0.001", "q": "100", "f": 100, "l": 105, "T": 123456785, "m": true
        }"#;
        let msg: BinanceFuturesAggTradeMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.symbol, Ustr::from("BTCUSDT"));
        assert_eq!(msg.agg_trade_id, 5_933_014);
        assert!(msg.is_buyer_maker);
        assert_eq!(msg.event_time(), Some(123_456_789));
    }

    #[rstest]
    fn test_deserialize_depth_update_exposes_sequence() {
        let raw = r#"{
            "e": "depthUpdate", "E": 123456789, "T": 123456788, "s": "BTCUSDT",
            "U": 157, "u": 160, "pu": 149,
            "b": [["0.0024", "10"]], "a": [["0.0026", "100"]]
        }"#;
        let msg: BinanceFuturesDepthUpdateMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.book_sequence(), Some(160));
        assert_eq!(msg.bids[0][0], "0.0024");
    }

    #[rstest]
    fn test_deserialize_order_update() {
        let raw = r#"{
            "e": "ORDER_TRADE_UPDATE", "E": 1568879465651, "T": 1568879465650,
            "o": {
                "s": "BTCUSDT", "c": "TEST", "S": "SELL", "o": "TRAILING_STOP_MARKET",
                "f": "GTC", "q": "0.001", "p": "0", "ap": "0", "sp": "7103.04",
                "x": "NEW", "X": "NEW", "i": 8886774, "l": "0", "z": "0", "L": "0",
                "N": "USDT", "n": "0", "T": 1568879465650, "t": 0, "m": false,
                "R": false, "wt": "CONTRACT_PRICE", "ot": "TRAILING_STOP_MARKET",
                "ps": "LONG", "cp": false, "rp": "0"
            }
        }"#;
        let msg: BinanceFuturesOrderUpdateMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.order.side, BinanceSide::Sell);
        assert_eq!(msg.order.execution_type, BinanceExecutionType::New);
        assert_eq!(msg.symbol(), Some(Ustr::from("BTCUSDT")));
    }

    #[rstest]
    fn test_deserialize_account_update() {
        let raw = r#"{
            "e": "ACCOUNT_UPDATE", "E": 1564745798939, "T": 1564745798938,
            "a": {
                "m": "ORDER",
                "B": [{"a": "USDT", "wb": "122624.12345678", "cw": "100.12345678", "bc": "50.12345678"}],
                "P": [{"s": "BTCUSDT", "pa": "0", "ep": "0.00000", "cr": "200", "up": "0", "mt": "isolated", "iw": "0.00000000", "ps": "BOTH"}]
            }
        }"#;
        let msg: BinanceFuturesAccountUpdateMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.update.reason, "ORDER");
        assert_eq!(msg.update.balances[0].asset, Ustr::from("USDT"));
        assert_eq!(msg.update.positions[0].position_side, BinancePositionSide::Both);
    }

    #[rstest]
    fn test_deserialize_account_config_update_leverage() {
        let raw = r#"{
            "e": "ACCOUNT_CONFIG_UPDATE", "E": 1611646737479, "T": 1611646737476,
            "ac": {"s": "BTCUSDT", "l": 25}
        }"#;
        let msg: BinanceFuturesAccountConfigUpdateMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.leverage_config.as_ref().unwrap().leverage, 25);
        assert!(msg.multi_assets_config.is_none());
        assert_eq!(msg.symbol(), Some(Ustr::from("BTCUSDT")));
    }

    #[rstest]
    fn test_deserialize_margin_call() {
        let raw = r#"{
            "e": "MARGIN_CALL", "E": 1587727187525, "cw": "3.16812045",
            "p": [{
                "s": "ETHUSDT", "ps": "LONG", "pa": "1.327", "mt": "CROSSED",
                "iw": "0", "mp": "187.17127", "up": "-1.166074", "mm": "1.614445"
            }]
        }"#;
        let msg: BinanceFuturesMarginCallMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.positions[0].symbol, Ustr::from("ETHUSDT"));
    }

    #[rstest]
    fn test_deserialize_listen_key_expired() {
        let raw = r#"{"e": "listenKeyExpired", "E": 1576653824250, "listenKey": "OfYGbUzi3PraNagEkdKuFwUHn48brFsItTdsuiIXrucEvD0rhRXZ7I6URWfE8YE8"}"#;
        let msg: BinanceListenKeyExpiredMsg = serde_json::from_str(raw).unwrap();
        assert!(msg.listen_key.as_str().starts_with("OfYGbUzi3"));
    }
}
