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

//! Binance Futures adapter components.
//!
//! WebSocket market-data and user-data streams for:
//!
//! - **USD-M Futures** (`fstream.binance.com`) - USDT-margined contracts
//! - **COIN-M Futures** (`dstream.binance.com`) - coin-margined contracts
//!
//! ## WebSocket Streams
//!
//! - `<symbol>@aggTrade` - aggregate trade data
//! - `<symbol>@markPrice` - mark price and funding rate
//! - `<symbol>@kline_<interval>` - kline/candlestick updates
//! - `<symbol>@depth[@<rate>ms]` - order book updates (diff)
//! - `<listenKey>` - user data events (requires listen key from the REST API)

pub mod websocket;

pub use websocket::client::BinanceFuturesWebSocketClient;
