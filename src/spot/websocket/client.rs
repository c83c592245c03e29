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

//! Binance Spot WebSocket client orchestrator.
//!
//! ## Connection Details
//!
//! - Endpoint: `stream.binance.com:9443`
//! - Max streams: 1024 per connection
//! - User data streams: requires a listen key obtained via the REST API

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
        BinanceSpotAccountPositionMsg, BinanceSpotAggTradeMsg, BinanceSpotBookTickerMsg,
        BinanceSpotDepthUpdateMsg, BinanceSpotExecutionReportMsg, BinanceSpotKlineMsg,
        BinanceSpotMiniTickerMsg, BinanceSpotPartialDepthMsg, BinanceSpotTickerMsg,
        BinanceSpotTradeMsg,
    },
    streams::BinanceSpotStreamType,
};
use crate::{
    common::{
        consts::{EVENT_EXECUTION_REPORT, EVENT_OUTBOUND_ACCOUNT_POSITION},
        enums::{BinanceDepthUpdateSpeed, BinanceKlineInterval},
    },
    config::BinanceWsClientConfig,
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

/// Optional handlers for the spot user-data subscription.
#[derive(Default)]
pub struct BinanceSpotUserDataHandlers {
    /// `executionReport` events.
    pub on_execution_report: Option<UserDataHandler<BinanceSpotExecutionReportMsg>>,
    /// `outboundAccountPosition` events.
    pub on_account_position: Option<UserDataHandler<BinanceSpotAccountPositionMsg>>,
}

impl fmt::Debug for BinanceSpotUserDataHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceSpotUserDataHandlers")
            .field("on_execution_report", &self.on_execution_report.is_some())
            .field("on_account_position", &self.on_account_position.is_some())
            .finish()
    }
}

/// Binance Spot WebSocket client for JSON market-data and user-data streams.
#[allow(missing_debug_implementations)]
pub struct BinanceSpotWebSocketClient {
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

impl BinanceSpotWebSocketClient {
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
            MessageIdentifier::spot(),
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

    /// Subscribes to the trade stream for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_trades<F>(&self, symbol: &str, handler: F) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceSpotTradeMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(BinanceSpotStreamType::Trade.stream_name(symbol), handler)
    }

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
        F: Fn(StreamEvent<BinanceSpotAggTradeMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(BinanceSpotStreamType::AggTrade.stream_name(symbol), handler)
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
        F: Fn(StreamEvent<BinanceSpotKlineMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceSpotStreamType::Kline { interval }.stream_name(symbol),
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
        F: Fn(StreamEvent<BinanceSpotMiniTickerMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceSpotStreamType::MiniTicker.stream_name(symbol),
            handler,
        )
    }

    /// Subscribes to the 24hr ticker stream for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_ticker<F>(&self, symbol: &str, handler: F) -> BinanceWsResult<SubscriptionHandle>
    where
        F: Fn(StreamEvent<BinanceSpotTickerMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(BinanceSpotStreamType::Ticker.stream_name(symbol), handler)
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
        F: Fn(StreamEvent<BinanceSpotBookTickerMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceSpotStreamType::BookTicker.stream_name(symbol),
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
        F: Fn(StreamEvent<BinanceSpotDepthUpdateMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceSpotStreamType::DepthDiff { speed }.stream_name(symbol),
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
        F: Fn(StreamEvent<BinanceSpotPartialDepthMsg>) + Send + Sync + 'static,
    {
        self.subscribe_stream(
            BinanceSpotStreamType::DepthPartial { levels, speed }.stream_name(symbol),
            handler,
        )
    }

    // --------------------------------------------------------------------------------------------
    // User data subscription
    // --------------------------------------------------------------------------------------------

    /// Subscribes to the user data stream for a listen key.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_user_data(
        &self,
        listen_key: &str,
        handlers: BinanceSpotUserDataHandlers,
    ) -> BinanceWsResult<SubscriptionHandle> {
        let mut builder = UserDataBuilder::new(listen_key);
        if let Some(handler) = handlers.on_execution_report {
            builder = builder
                .on_event::<BinanceSpotExecutionReportMsg, _>(EVENT_EXECUTION_REPORT, handler);
        }
        if let Some(handler) = handlers.on_account_position {
            builder = builder.on_event::<BinanceSpotAccountPositionMsg, _>(
                EVENT_OUTBOUND_ACCOUNT_POSITION,
                handler,
            );
        }
        self.register(builder.build())
    }

    /// Unsubscribes a live subscription.
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

impl Default for BinanceSpotWebSocketClient {
    fn default() -> Self {
        Self::new(BinanceWsClientConfig::spot())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_default_client_is_inactive_before_connect() {
        let client = BinanceSpotWebSocketClient::default();
        assert!(!client.is_active());
        assert!(client.is_closed());
    }

    #[tokio::test]
    async fn test_spot_user_data_registers_listed_events_only() {
        let client = BinanceSpotWebSocketClient::default();
        client
            .subscribe_user_data(
                "spotkey",
                BinanceSpotUserDataHandlers {
                    on_execution_report: Some(Box::new(|_| {})),
                    on_account_position: None,
                },
            )
            .unwrap();
        assert_eq!(client.topics(), vec!["spotkey"]);
    }
}
