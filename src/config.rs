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

//! Client configuration structures.

use crate::common::{
    enums::{BinanceEnvironment, BinanceProductType},
    urls::get_ws_base_url,
};

/// Configuration for a Binance WebSocket client.
#[derive(Clone, Debug)]
pub struct BinanceWsClientConfig {
    /// Product type served by the connection.
    pub product_type: BinanceProductType,
    /// Environment (mainnet or testnet).
    pub environment: BinanceEnvironment,
    /// Optional base URL override for WebSocket.
    pub base_url_ws: Option<String>,
    /// When enabled, every delivered event carries the original raw frame text
    /// for diagnostics.
    pub echo_raw: bool,
}

impl Default for BinanceWsClientConfig {
    fn default() -> Self {
        Self {
            product_type: BinanceProductType::Spot,
            environment: BinanceEnvironment::Mainnet,
            base_url_ws: None,
            echo_raw: false,
        }
    }
}

impl BinanceWsClientConfig {
    /// Creates a configuration for Spot streams.
    #[must_use]
    pub fn spot() -> Self {
        Self::default()
    }

    /// Creates a configuration for USD-M Futures streams.
    #[must_use]
    pub fn usd_futures() -> Self {
        Self {
            product_type: BinanceProductType::UsdM,
            ..Self::default()
        }
    }

    /// Creates a configuration for COIN-M Futures streams.
    #[must_use]
    pub fn coin_futures() -> Self {
        Self {
            product_type: BinanceProductType::CoinM,
            ..Self::default()
        }
    }

    /// Overrides the WebSocket base URL (used for testnet overrides and mock
    /// servers in tests).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_ws = Some(url.into());
        self
    }

    /// Enables raw-frame echo on delivered events.
    #[must_use]
    pub fn with_raw_echo(mut self) -> Self {
        self.echo_raw = true;
        self
    }

    /// Resolves the effective WebSocket URL for this configuration.
    #[must_use]
    pub fn ws_url(&self) -> String {
        self.base_url_ws
            .clone()
            .unwrap_or_else(|| get_ws_base_url(self.product_type, self.environment).to_string())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_default_config_resolves_spot_mainnet() {
        let config = BinanceWsClientConfig::default();
        assert_eq!(config.ws_url(), "wss://stream.binance.com:9443/ws");
    }

    #[rstest]
    fn test_base_url_override_wins() {
        let config = BinanceWsClientConfig::usd_futures().with_base_url("ws://127.0.0.1:9001/ws");
        assert_eq!(config.ws_url(), "ws://127.0.0.1:9001/ws");
    }
}
