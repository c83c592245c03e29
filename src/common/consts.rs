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

//! Binance venue constants and WebSocket endpoints.

/// The Binance venue identifier string.
pub const BINANCE: &str = "BINANCE";

// ------------------------------------------------------------------------------------------------
// WebSocket URLs - Mainnet
// ------------------------------------------------------------------------------------------------

/// Binance Spot WebSocket base URL (mainnet).
pub const BINANCE_SPOT_WS_URL: &str = "wss://stream.binance.com:9443/ws";

/// Binance USD-M Futures WebSocket base URL (mainnet).
pub const BINANCE_FUTURES_USD_WS_URL: &str = "wss://fstream.binance.com/ws";

/// Binance COIN-M Futures WebSocket base URL (mainnet).
pub const BINANCE_FUTURES_COIN_WS_URL: &str = "wss://dstream.binance.com/ws";

// ------------------------------------------------------------------------------------------------
// WebSocket URLs - Testnet
// ------------------------------------------------------------------------------------------------

/// Binance Spot WebSocket base URL (testnet).
pub const BINANCE_SPOT_TESTNET_WS_URL: &str = "wss://testnet.binance.vision/ws";

/// Binance USD-M Futures WebSocket base URL (testnet).
pub const BINANCE_FUTURES_USD_TESTNET_WS_URL: &str = "wss://stream.binancefuture.com/ws";

/// Binance COIN-M Futures WebSocket base URL (testnet).
pub const BINANCE_FUTURES_COIN_TESTNET_WS_URL: &str = "wss://dstream.binancefuture.com/ws";

// ------------------------------------------------------------------------------------------------
// Stream limits
// ------------------------------------------------------------------------------------------------

/// Maximum number of streams per Spot connection.
pub const MAX_STREAMS_PER_SPOT_CONNECTION: usize = 1024;

/// Maximum number of streams per Futures connection.
pub const MAX_STREAMS_PER_FUTURES_CONNECTION: usize = 200;

// ------------------------------------------------------------------------------------------------
// User data stream event identifiers
// ------------------------------------------------------------------------------------------------

/// Futures account update event name.
pub const EVENT_ACCOUNT_UPDATE: &str = "ACCOUNT_UPDATE";

/// Futures order/trade update event name.
pub const EVENT_ORDER_TRADE_UPDATE: &str = "ORDER_TRADE_UPDATE";

/// Futures account configuration (leverage/multi-assets) event name.
pub const EVENT_ACCOUNT_CONFIG_UPDATE: &str = "ACCOUNT_CONFIG_UPDATE";

/// Futures margin call event name.
pub const EVENT_MARGIN_CALL: &str = "MARGIN_CALL";

/// Spot balance snapshot event name.
pub const EVENT_OUTBOUND_ACCOUNT_POSITION: &str = "outboundAccountPosition";

/// Spot order execution event name.
pub const EVENT_EXECUTION_REPORT: &str = "executionReport";

/// Event name signalling that a listen key was invalidated server-side.
///
/// The subscription stays registered; the caller is expected to obtain a new
/// key and resubscribe. No auto-renewal happens here.
pub const EVENT_LISTEN_KEY_EXPIRED: &str = "listenKeyExpired";

/// Futures user-data event names multiplexed under a single listen key.
///
/// A listen key alone is not a valid dispatch key: one key fans out to several
/// business event types that must reach different handlers, so dispatch keys
/// are formed by concatenating the listen key with one of these names.
pub const FUTURES_USER_STREAM_EVENTS: &[&str] = &[
    EVENT_ACCOUNT_UPDATE,
    EVENT_ORDER_TRADE_UPDATE,
    EVENT_ACCOUNT_CONFIG_UPDATE,
    EVENT_MARGIN_CALL,
    EVENT_LISTEN_KEY_EXPIRED,
];

/// Spot user-data event names multiplexed under a single listen key.
pub const SPOT_USER_STREAM_EVENTS: &[&str] =
    &[EVENT_OUTBOUND_ACCOUNT_POSITION, EVENT_EXECUTION_REPORT];
