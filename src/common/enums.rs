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

//! Binance enumeration types shared across the Spot and Futures socket APIs.

use serde::{Deserialize, Serialize};

/// Binance product type identifier.
///
/// Each product type corresponds to a different Binance WebSocket domain.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceProductType {
    /// Spot trading (stream.binance.com).
    #[default]
    Spot,
    /// USD-M Futures - linear perpetuals and delivery futures (fstream.binance.com).
    UsdM,
    /// COIN-M Futures - inverse perpetuals and delivery futures (dstream.binance.com).
    CoinM,
}

impl BinanceProductType {
    /// Returns the string representation used in API requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "SPOT",
            Self::UsdM => "USD_M",
            Self::CoinM => "COIN_M",
        }
    }

    /// Returns true if this is a futures product (USD-M or COIN-M).
    #[must_use]
    pub const fn is_futures(self) -> bool {
        matches!(self, Self::UsdM | Self::CoinM)
    }
}

impl std::fmt::Display for BinanceProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Binance environment type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinanceEnvironment {
    /// Production/mainnet environment.
    #[default]
    Mainnet,
    /// Testnet environment.
    Testnet,
}

impl BinanceEnvironment {
    /// Returns true if this is the testnet environment.
    #[must_use]
    pub const fn is_testnet(self) -> bool {
        matches!(self, Self::Testnet)
    }
}

/// WebSocket control-frame method.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceWsMethod {
    /// Subscribe to one or more streams.
    Subscribe,
    /// Unsubscribe from one or more streams.
    Unsubscribe,
    /// List active subscriptions on the connection.
    ListSubscriptions,
}

/// Order side for Binance orders and trades.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BinanceSide {
    /// Buy side.
    Buy,
    /// Sell side.
    Sell,
}

/// Position side for Futures accounts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BinancePositionSide {
    /// One-way mode position.
    Both,
    /// Hedge mode long position.
    Long,
    /// Hedge mode short position.
    Short,
}

/// Order status lifecycle values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceOrderStatus {
    /// Order accepted and working.
    New,
    /// Partially filled.
    PartiallyFilled,
    /// Fully filled.
    Filled,
    /// Canceled by the user.
    Canceled,
    /// Rejected by the matching engine.
    Rejected,
    /// Expired per time-in-force or venue rules.
    Expired,
    /// Expired because of self-trade prevention.
    ExpiredInMatch,
    /// Unknown or undocumented value.
    #[serde(other)]
    Unknown,
}

/// Order types available on Futures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceFuturesOrderType {
    /// Limit order.
    Limit,
    /// Market order.
    Market,
    /// Stop-limit order.
    Stop,
    /// Stop-market order.
    StopMarket,
    /// Take-profit limit order.
    TakeProfit,
    /// Take-profit market order.
    TakeProfitMarket,
    /// Trailing stop market order.
    TrailingStopMarket,
    /// Forced liquidation order.
    Liquidation,
    /// Unknown or undocumented value.
    #[serde(other)]
    Unknown,
}

/// Order types available on Spot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceSpotOrderType {
    /// Limit order.
    Limit,
    /// Market order.
    Market,
    /// Stop-loss market order.
    StopLoss,
    /// Stop-loss limit order.
    StopLossLimit,
    /// Take-profit market order.
    TakeProfit,
    /// Take-profit limit order.
    TakeProfitLimit,
    /// Post-only limit order.
    LimitMaker,
    /// Unknown or undocumented value.
    #[serde(other)]
    Unknown,
}

/// Time in force values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BinanceTimeInForce {
    /// Good till canceled.
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
    /// Good till crossing (post-only, Futures).
    Gtx,
    /// Good till date (Futures).
    Gtd,
    /// Unknown or undocumented value.
    #[serde(other)]
    Unknown,
}

/// Execution type on order update events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceExecutionType {
    /// Order accepted.
    New,
    /// Order canceled.
    Canceled,
    /// Order replaced (Spot cancel-replace).
    Replaced,
    /// Order rejected.
    Rejected,
    /// Order traded (fill or partial fill).
    Trade,
    /// Order expired.
    Expired,
    /// Stop price recalculated (Futures).
    Calculated,
    /// Order amended in place (Futures).
    Amendment,
    /// Expired because of self-trade prevention.
    TradePrevention,
    /// Unknown or undocumented value.
    #[serde(other)]
    Unknown,
}

/// Working type for trigger price evaluation (Futures).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceWorkingType {
    /// Use the contract price.
    ContractPrice,
    /// Use the mark price.
    MarkPrice,
    /// Unknown or undocumented value.
    #[serde(other)]
    Unknown,
}

/// Kline interval enumeration.
///
/// # References
/// - <https://developers.binance.com/docs/binance-spot-api-docs/web-socket-streams>
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinanceKlineInterval {
    /// 1 second (only for spot).
    #[serde(rename = "1s")]
    Second1,
    /// 1 minute.
    #[default]
    #[serde(rename = "1m")]
    Minute1,
    /// 3 minutes.
    #[serde(rename = "3m")]
    Minute3,
    /// 5 minutes.
    #[serde(rename = "5m")]
    Minute5,
    /// 15 minutes.
    #[serde(rename = "15m")]
    Minute15,
    /// 30 minutes.
    #[serde(rename = "30m")]
    Minute30,
    /// 1 hour.
    #[serde(rename = "1h")]
    Hour1,
    /// 2 hours.
    #[serde(rename = "2h")]
    Hour2,
    /// 4 hours.
    #[serde(rename = "4h")]
    Hour4,
    /// 6 hours.
    #[serde(rename = "6h")]
    Hour6,
    /// 8 hours.
    #[serde(rename = "8h")]
    Hour8,
    /// 12 hours.
    #[serde(rename = "12h")]
    Hour12,
    /// 1 day.
    #[serde(rename = "1d")]
    Day1,
    /// 3 days.
    #[serde(rename = "3d")]
    Day3,
    /// 1 week.
    #[serde(rename = "1w")]
    Week1,
    /// 1 month.
    #[serde(rename = "1M")]
    Month1,
}

impl BinanceKlineInterval {
    /// Returns the string representation used in stream names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Second1 => "1s",
            Self::Minute1 => "1m",
            Self::Minute3 => "3m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1h",
            Self::Hour2 => "2h",
            Self::Hour4 => "4h",
            Self::Hour6 => "6h",
            Self::Hour8 => "8h",
            Self::Hour12 => "12h",
            Self::Day1 => "1d",
            Self::Day3 => "3d",
            Self::Week1 => "1w",
            Self::Month1 => "1M",
        }
    }
}

impl std::fmt::Display for BinanceKlineInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order book update speed suffix for depth streams.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinanceDepthUpdateSpeed {
    /// 100ms updates.
    Ms100,
    /// 250ms updates (Futures default).
    Ms250,
    /// 500ms updates (Futures).
    Ms500,
    /// 1000ms updates (Spot default).
    Ms1000,
}

impl BinanceDepthUpdateSpeed {
    /// Returns the stream-name suffix, e.g. `@100ms`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Ms100 => "@100ms",
            Self::Ms250 => "@250ms",
            Self::Ms500 => "@500ms",
            Self::Ms1000 => "@1000ms",
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_ws_method_serialization() {
        assert_eq!(
            serde_json::to_string(&BinanceWsMethod::Subscribe).unwrap(),
            "\"SUBSCRIBE\""
        );
        assert_eq!(
            serde_json::to_string(&BinanceWsMethod::Unsubscribe).unwrap(),
            "\"UNSUBSCRIBE\""
        );
    }

    #[rstest]
    fn test_kline_interval_round_trip() {
        let interval: BinanceKlineInterval = serde_json::from_str("\"1h\"").unwrap();
        assert_eq!(interval, BinanceKlineInterval::Hour1);
        assert_eq!(interval.as_str(), "1h");
    }

    #[rstest]
    fn test_unknown_execution_type_tolerated() {
        let exec: BinanceExecutionType = serde_json::from_str("\"SOME_FUTURE_VALUE\"").unwrap();
        assert_eq!(exec, BinanceExecutionType::Unknown);
    }
}
