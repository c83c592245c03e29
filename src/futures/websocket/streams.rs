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

//! Stream subscription names for Binance Futures WebSocket.
//!
//! ## Stream Names
//!
//! - `<symbol>@aggTrade` - Aggregate trade stream
//! - `<symbol>@markPrice` - Mark price stream
//! - `<symbol>@kline_<interval>` - Kline stream
//! - `<symbol>@miniTicker` / `<symbol>@ticker` - Ticker streams
//! - `<symbol>@bookTicker` - Best bid/ask stream
//! - `<symbol>@forceOrder` - Liquidation order stream
//! - `<symbol>@depth[@<rate>ms]` - Diff depth stream
//! - `<symbol>@depth<levels>[@<rate>ms]` - Partial book depth stream

use crate::common::enums::{BinanceDepthUpdateSpeed, BinanceKlineInterval};

/// Stream type for subscription management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinanceFuturesStreamType {
    /// Aggregate trade stream (`<symbol>@aggTrade`).
    AggTrade,
    /// Mark price stream (`<symbol>@markPrice`).
    MarkPrice,
    /// Kline stream (`<symbol>@kline_<interval>`).
    Kline {
        /// Kline interval.
        interval: BinanceKlineInterval,
    },
    /// Mini ticker stream (`<symbol>@miniTicker`).
    MiniTicker,
    /// Full ticker stream (`<symbol>@ticker`).
    Ticker,
    /// Best bid/ask stream (`<symbol>@bookTicker`).
    BookTicker,
    /// Liquidation order stream (`<symbol>@forceOrder`).
    ForceOrder,
    /// Diff depth stream (`<symbol>@depth`).
    DepthDiff {
        /// Update speed suffix, venue default when absent.
        speed: Option<BinanceDepthUpdateSpeed>,
    },
    /// Partial book depth stream (`<symbol>@depth<levels>`).
    DepthPartial {
        /// Number of levels (5, 10 or 20).
        levels: u8,
        /// Update speed suffix, venue default when absent.
        speed: Option<BinanceDepthUpdateSpeed>,
    },
}

impl BinanceFuturesStreamType {
    /// Build the stream name for a symbol.
    #[must_use]
    pub fn stream_name(&self, symbol: &str) -> String {
        let symbol_lower = symbol.to_lowercase();
        match self {
            Self::AggTrade => format!("{symbol_lower}@aggTrade"),
            Self::MarkPrice => format!("{symbol_lower}@markPrice"),
            Self::Kline { interval } => format!("{symbol_lower}@kline_{interval}"),
            Self::MiniTicker => format!("{symbol_lower}@miniTicker"),
            Self::Ticker => format!("{symbol_lower}@ticker"),
            Self::BookTicker => format!("{symbol_lower}@bookTicker"),
            Self::ForceOrder => format!("{symbol_lower}@forceOrder"),
            Self::DepthDiff { speed } => {
                let suffix = speed.map(BinanceDepthUpdateSpeed::suffix).unwrap_or("");
                format!("{symbol_lower}@depth{suffix}")
            }
            Self::DepthPartial { levels, speed } => {
                let suffix = speed.map(BinanceDepthUpdateSpeed::suffix).unwrap_or("");
                format!("{symbol_lower}@depth{levels}{suffix}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_stream_names() {
        assert_eq!(
            BinanceFuturesStreamType::AggTrade.stream_name("BTCUSDT"),
            "btcusdt@aggTrade"
        );
        assert_eq!(
            BinanceFuturesStreamType::Kline {
                interval: BinanceKlineInterval::Hour1
            }
            .stream_name("ETHUSDT"),
            "ethusdt@kline_1h"
        );
        assert_eq!(
            BinanceFuturesStreamType::DepthDiff { speed: None }.stream_name("BTCUSDT"),
            "btcusdt@depth"
        );
        assert_eq!(
            BinanceFuturesStreamType::DepthDiff {
                speed: Some(BinanceDepthUpdateSpeed::Ms100)
            }
            .stream_name("BTCUSDT"),
            "btcusdt@depth@100ms"
        );
        assert_eq!(
            BinanceFuturesStreamType::DepthPartial {
                levels: 20,
                speed: Some(BinanceDepthUpdateSpeed::Ms500)
            }
            .stream_name("BTCUSDT"),
            "btcusdt@depth20@500ms"
        );
    }

    #[rstest]
    fn test_symbols_are_lower_cased() {
        assert_eq!(
            BinanceFuturesStreamType::BookTicker.stream_name("SolUsdt"),
            "solusdt@bookTicker"
        );
    }
}
