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

//! Binance Futures WebSocket client orchestrator.
//!
//! Owns the registry of live subscriptions and drives the feed handler task
//! over a command channel. Subscriptions registered before `connect` are
//! requested as soon as the socket is up.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use futures_util::StreamExt;
use tokio_tungstenite::connect_async;

use super::{
    messages::{
        BinanceFuturesAggTradeMsg, BinanceFuturesBookTickerMsg, BinanceFuturesDepthUpdateMsg,
        BinanceFuturesKlineMsg, BinanceFuturesLiquidationMsg, BinanceFuturesMarkPriceMsg,
        BinanceFuturesMiniTickerMsg, BinanceFuturesOrderUpdateMsg, BinanceFuturesTickerMsg,
        BinanceListenKeyExpiredMsg,
    },
    streams::BinanceFuturesStreamType,
};
use crate::{
    common::{
        consts::{
            EVENT_ACCOUNT_CONFIG_UPDATE, EVENT_ACCOUNT_UPDATE, EVENT_LISTEN_KEY_EXPIRED,
            EVENT_MARGIN_CALL, EVENT_ORDER_TRADE_UPDATE,
        },
        enums::{BinanceDepthUpdateSpeed, BinanceKlineInterval},
    },
    config::BinanceWsClientConfig,
    futures::websocket::messages::{
        BinanceFuturesAccountConfigUpdateMsg, BinanceFuturesAccountUpdateMsg,
        BinanceFuturesMarginCallMsg,
    },
    websocket::{
        control::RequestIdAllocator,
        dispatch::{ClockOffset, PendingRequests, StreamDispatcher},
        error::{BinanceWsError, BinanceWsResult},
        handler::{BinanceWsFeedHandler, HandlerCommand},
        identifier::MessageIdentifier,
        subscription::{
            StreamEvent, StreamPayload, Subscription, SubscriptionHandle, TopicRegistry,
            UserDataBuilder, UserDataHandler,
        },
    },
};

/// Optional handlers for the futures user-data subscription.
///
/// Only events with a handler installed are registered under the listen key;
/// the rest are silently ignored.
#[derive(Default)]
pub struct BinanceFuturesUserDataHandlers {
    /// `ORDER_TRADE_UPDATE` events.
    pub on_order_update: Option<UserDataHandler<BinanceFuturesOrderUpdateMsg>>,
    /// `ACCOUNT_UPDATE` events.
    pub on_account_update: Option<UserDataHandler<BinanceFuturesAccountUpdateMsg>>,
    /// `ACCOUNT_CONFIG_UPDATE` events.
    pub on_account_config_update: Option<UserDataHandler<BinanceFuturesAccountConfigUpdateMsg>>,
    /// `MARGIN_CALL` events.
    pub on_margin_call: Option<UserDataHandler<BinanceFuturesMarginCallMsg>>,
    /// `listenKeyExpired` events.
    pub on_listen_key_expired: Option<UserDataHandler<BinanceListenKeyExpiredMsg>>,
}

impl fmt::Debug for BinanceFuturesUserDataHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceFuturesUserDataHandlers")
            .field("on_order_update", &self.on_order_update.is_some())
            .field("on_account_update", &self.on_account_update.is_some())
            .field(
                "on_account_config_update",
                &self.on_account_config_update.is_some(),
            )
            .field("on_margin_call", &self.on_margin_call.is_some())
            .field(
                "on_listen_key_expired",
                &self.on_listen_key_expired.is_some(),
            )
            .finish()
    }
}

/// Binance Futures WebSocket client for JSON market-data and user-data streams.
#[allow(missing_debug_implementations)]
pub struct BinanceFuturesWebSocketClient {
    url: String,
    signal: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
    cmd_tx: tokio::sync::mpsc::UnboundedSender<HandlerCommand>,
    raw_tx: tokio::sync::mpsc::UnboundedSender<tokio_tungstenite::tungstenite::Message>,
    registry: Arc<TopicRegistry>,
    clock_offset: Arc<ClockOffset>,
    handler: Option<BinanceWsFeedHandler>,
    handler_task: Option<tokio::task::JoinHandle<()>>,
    read_task: Option<tokio::task::JoinHandle<()>>,
}

impl BinanceFuturesWebSocketClient {
    /// Creates a new client from the given configuration.
    #[must_use]
    pub fn new(config: BinanceWsClientConfig) -> Self {
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
        let (raw_tx, raw_rx) = tokio::sync::mpsc::unbounded_channel();

        let signal = Arc::new(AtomicBool::new(false));
        let registry = Arc::new(TopicRegistry::new());
        let pending = Arc::new(PendingRequests::new());
        let request_ids = Arc::new(RequestIdAllocator::new());
        let clock_offset = Arc::new(ClockOffset::new());

        let dispatcher = StreamDispatcher::new(
            MessageIdentifier::futures(),
            Arc::clone(&registry),
            Arc::clone(&pending),
            Arc::clone(&clock_offset),
        )
        .with_raw_echo(config.echo_raw);

        let handler = BinanceWsFeedHandler::new(
            Arc::clone(&signal),
            cmd_rx,
            raw_rx,
            dispatcher,
            Arc::clone(&registry),
            pending,
            request_ids,
        );

        Self {
            url: config.ws_url(),
            signal,
            active: Arc::new(AtomicBool::new(false)),
            cmd_tx,
            raw_tx,
            registry,
            clock_offset,
            handler: Some(handler),
            handler_task: None,
            read_task: None,
        }
    }

    /// Connects the socket and requests every registered subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(&mut self) -> BinanceWsResult<()> {
        let (ws_stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| BinanceWsError::Transport(e.to_string()))?;
        let (sink, mut stream) = ws_stream.split();

        if let Some(handler) = self.handler.take() {
            self.handler_task = Some(tokio::spawn(handler.run()));
        }

        let raw_tx = self.raw_tx.clone();
        let active = Arc::clone(&self.active);
        active.store(true, Ordering::Release);
        self.read_task = Some(tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(msg) => {
                        if raw_tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Socket read error");
                        break;
                    }
                }
            }
            active.store(false, Ordering::Release);
            tracing::debug!("Socket read loop ended");
        }));

        self.send_command(HandlerCommand::SetSink(sink))?;
        self.send_command(HandlerCommand::Resubscribe)?;
        Ok(())
    }

    /// Closes the connection and stops the handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task is already gone.
    pub async fn close(&mut self) -> BinanceWsResult<()> {
        self.signal.store(true, Ordering::Release);
        let result = self.send_command(HandlerCommand::Disconnect);
        if let Some(task) = self.read_task.take() {
            task.abort();
        }
        // The handler exits on Disconnect; its task is detached here
        self.handler_task.take();
        self.active.store(false, Ordering::Release);
        result
    }

    /// Whether the socket is connected and reading.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Whether the socket is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.is_active()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.registry.subscription_count()
    }

    /// All topics to request on (re)connect.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.registry.topics()
    }

    /// Updates the venue clock offset used for event-time correction.
    pub fn set_clock_offset_ms(&self, offset_ms: i64) {
        self.clock_offset.set_ms(offset_ms);
    }

    // --------------------------------------------------------------------------------------------
    // Market data subscriptions
    // --------------------------------------------------------------------------------------------

    /// Subscribes to the aggregate trade stream for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_agg_trades<F>(
        &self,
        symbol: &str,
        handler: F,
    ) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceFuturesAggTradeMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceFuturesStreamType::AggTrade.stream_name(symbol),
            handler,
        )
    }

    /// Subscribes to the mark price stream for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_mark_price<F>(
        &self,
        symbol: &str,
        handler: F,
    ) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceFuturesMarkPriceMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceFuturesStreamType::MarkPrice.stream_name(symbol),
            handler,
        )
    }

    /// Subscribes to the kline stream for a symbol and interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_klines<F>(
        &self,
        symbol: &str,
        interval: BinanceKlineInterval,
        handler: F,
    ) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceFuturesKlineMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceFuturesStreamType::Kline { interval }.stream_name(symbol),
            handler,
        )
    }

    /// Subscribes to the mini ticker stream for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_mini_ticker<F>(
        &self,
        symbol: &str,
        handler: F,
    ) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceFuturesMiniTickerMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceFuturesStreamType::MiniTicker.stream_name(symbol),
            handler,
        )
    }

    /// Subscribes to the 24hr ticker stream for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_ticker<F>(
        &self,
        symbol: &str,
        handler: F,
    ) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceFuturesTickerMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceFuturesStreamType::Ticker.stream_name(symbol),
            handler,
        )
    }

    /// Subscribes to the best bid/ask stream for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_book_ticker<F>(
        &self,
        symbol: &str,
        handler: F,
    ) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceFuturesBookTickerMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceFuturesStreamType::BookTicker.stream_name(symbol),
            handler,
        )
    }

    /// Subscribes to the liquidation order stream for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_liquidations<F>(
        &self,
        symbol: &str,
        handler: F,
    ) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceFuturesLiquidationMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceFuturesStreamType::ForceOrder.stream_name(symbol),
            handler,
        )
    }

    /// Subscribes to the diff depth stream for a symbol.
    ///
    /// Delivered events carry the `lastUpdateId` sequence for gap detection.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_depth<F>(
        &self,
        symbol: &str,
        speed: Option<BinanceDepthUpdateSpeed>,
        handler: F,
    ) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceFuturesDepthUpdateMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceFuturesStreamType::DepthDiff { speed }.stream_name(symbol),
            handler,
        )
    }

    /// Subscribes to the partial book depth stream for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_partial_depth<F>(
        &self,
        symbol: &str,
        levels: u8,
        speed: Option<BinanceDepthUpdateSpeed>,
        handler: F,
    ) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceFuturesDepthUpdateMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceFuturesStreamType::DepthPartial { levels, speed }.stream_name(symbol),
            handler,
        )
    }

    // --------------------------------------------------------------------------------------------
    // User data subscription
    // --------------------------------------------------------------------------------------------

    /// Subscribes to the user data stream for a listen key.
    ///
    /// The listen key is obtained via the REST API and stands in for several
    /// event types; each installed handler receives events stamped with the
    /// owning listen key, so multiple simultaneous user streams stay apart.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_user_data(
        &self,
        listen_key: &str,
        handlers: BinanceFuturesUserDataHandlers,
    ) -> BinanceWsResult<SubscriptionHandle> {
        let mut builder = UserDataBuilder::new(listen_key);
        if let Some(handler) = handlers.on_order_update {
            builder = builder.on_event::<BinanceFuturesOrderUpdateMsg, _>(
                EVENT_ORDER_TRADE_UPDATE,
                handler,
            );
        }
        if let Some(handler) = handlers.on_account_update {
            builder =
                builder.on_event::<BinanceFuturesAccountUpdateMsg, _>(EVENT_ACCOUNT_UPDATE, handler);
        }
        if let Some(handler) = handlers.on_account_config_update {
            builder = builder.on_event::<BinanceFuturesAccountConfigUpdateMsg, _>(
                EVENT_ACCOUNT_CONFIG_UPDATE,
                handler,
            );
        }
        if let Some(handler) = handlers.on_margin_call {
            builder =
                builder.on_event::<BinanceFuturesMarginCallMsg, _>(EVENT_MARGIN_CALL, handler);
        }
        if let Some(handler) = handlers.on_listen_key_expired {
            builder = builder
                .on_event::<BinanceListenKeyExpiredMsg, _>(EVENT_LISTEN_KEY_EXPIRED, handler);
        }
        self.register(builder.build())
    }

    /// Unsubscribes a live subscription.
    ///
    /// In-flight frames already queued may still be delivered once after the
    /// unsubscribe request; callers must tolerate that.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> BinanceWsResult<()> {
        self.send_command(HandlerCommand::Unsubscribe {
            subscription_id: handle.id,
        })
    }

    fn subscribe_stream<T, F>(&self, topic: String, handler: F) -> BinanceWsResult<SubscriptionHandle>
    where
        T: StreamPayload + 'static,
        F: Fn(StreamEvent<T>) + Send + Sync + 'static,
    {
        self.register(Subscription::market_data::<T, F>(&topic, handler))
    }

    fn register(&self, subscription: Subscription) -> BinanceWsResult<SubscriptionHandle> {
        let subscription = self.registry.insert(subscription);
        let handle = SubscriptionHandle {
            id: subscription.id(),
        };
        self.send_command(HandlerCommand::Subscribe {
            subscription_id: handle.id,
        })?;
        Ok(handle)
    }

    fn send_command(&self, cmd: HandlerCommand) -> BinanceWsResult<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| BinanceWsError::ClientError("Handler task stopped".to_string()))
    }
}

impl Default for BinanceFuturesWebSocketClient {
    fn default() -> Self {
        Self::new(BinanceWsClientConfig::usd_futures())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_default_client_is_inactive_before_connect() {
        let client = BinanceFuturesWebSocketClient::default();
        assert!(!client.is_active());
        assert!(client.is_closed());
        assert_eq!(client.subscription_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriptions_register_before_connect() {
        let client = BinanceFuturesWebSocketClient::default();
        client.subscribe_agg_trades("BTCUSDT", |_| {}).unwrap();
        client
            .subscribe_klines("ETHUSDT", BinanceKlineInterval::Hour1, |_| {})
            .unwrap();
        assert_eq!(client.subscription_count(), 2);
        assert_eq!(client.topics(), vec!["btcusdt@aggTrade", "ethusdt@kline_1h"]);
    }

    #[tokio::test]
    async fn test_user_data_subscription_topics_are_the_listen_key() {
        let client = BinanceFuturesWebSocketClient::default();
        client
            .subscribe_user_data(
                "abc123",
                BinanceFuturesUserDataHandlers {
                    on_order_update: Some(Box::new(|_| {})),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(client.topics(), vec!["abc123"]);
    }
}
