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

//! Stream subscription names for Binance Spot WebSocket.
//!
//! ## Stream Names
//!
//! - `<symbol>@trade` - Trade stream
//! - `<symbol>@aggTrade` - Aggregate trade stream
//! - `<symbol>@kline_<interval>` - Kline stream
//! - `<symbol>@miniTicker` / `<symbol>@ticker` - Ticker streams
//! - `<symbol>@bookTicker` - Best bid/ask stream
//! - `<symbol>@depth[@100ms]` - Diff depth stream
//! - `<symbol>@depth<levels>[@100ms]` - Partial book depth stream

use crate::common::enums::{BinanceDepthUpdateSpeed, BinanceKlineInterval};

/// Stream type for subscription management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinanceSpotStreamType {
    /// Trade stream (`<symbol>@trade`).
    Trade,
    /// Aggregate trade stream (`<symbol>@aggTrade`).
    AggTrade,
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

impl BinanceSpotStreamType {
    /// Build the stream name for a symbol.
    #[must_use]
    pub fn stream_name(&self, symbol: &str) -> String {
        let symbol_lower = symbol.to_lowercase();
        match self {
            Self::Trade => format!("{symbol_lower}@trade"),
            Self::AggTrade => format!("{symbol_lower}@aggTrade"),
            Self::Kline { interval } => format!("{symbol_lower}@kline_{interval}"),
            Self::MiniTicker => format!("{symbol_lower}@miniTicker"),
            Self::Ticker => format!("{symbol_lower}@ticker"),
            Self::BookTicker => format!("{symbol_lower}@bookTicker"),
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
            BinanceSpotStreamType::Trade.stream_name("BTCUSDT"),
            "btcusdt@trade"
        );
        assert_eq!(
            BinanceSpotStreamType::Kline {
                interval: BinanceKlineInterval::Minute1
            }
            .stream_name("ETHUSDT"),
            "ethusdt@kline_1m"
        );
        assert_eq!(
            BinanceSpotStreamType::DepthPartial {
                levels: 20,
                speed: Some(BinanceDepthUpdateSpeed::Ms100)
            }
            .stream_name("BTCUSDT"),
            "btcusdt@depth20@100ms"
        );
    }
}
