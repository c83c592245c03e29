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

//! Binance WebSocket error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Error types for the Binance WebSocket client.
#[derive(Debug, Clone, Error)]
pub enum BinanceWsError {
    /// Client is not connected.
    #[error("Not connected")]
    NotConnected,
    /// Frame bytes do not match any expected envelope or payload shape.
    #[error("Decode error: {0}")]
    Decode(String),
    /// Failed to send a message over the WebSocket.
    #[error("Send error: {0}")]
    Send(String),
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),
    /// Transport-level error during WebSocket communication.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Generic client error.
    #[error("Client error: {0}")]
    ClientError(String),
    /// Operation timed out.
    #[error("Timeout: {0}")]
    Timeout(String),
    /// Error returned by the Binance server.
    #[error("Binance error {code}: {msg}")]
    BinanceError {
        /// The error code from Binance.
        code: i64,
        /// The error message from Binance.
        msg: String,
    },
}

impl From<tungstenite::Error> for BinanceWsError {
    fn from(error: tungstenite::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for BinanceWsError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

/// Result type alias for Binance WebSocket operations.
pub type BinanceWsResult<T> = Result<T, BinanceWsError>;
