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

//! WebSocket feed handler task.
//!
//! The handler runs in a dedicated Tokio task as the I/O boundary between the
//! client orchestrator and the network layer. It exclusively owns the socket
//! write half and processes commands from the client via an unbounded
//! channel; every inbound frame goes through the dispatcher with its receive
//! timestamp. Frames from one socket are delivered strictly in arrival order
//! and processed synchronously relative to each other.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use futures_util::{SinkExt, stream::SplitSink};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use super::{
    control::RequestIdAllocator,
    dispatch::{DispatchOutcome, PendingAction, PendingRequest, PendingRequests, StreamDispatcher},
    subscription::{SubscriptionStatus, TopicRegistry},
};

/// Write half of the WebSocket connection.
pub type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Commands sent from the client orchestrator to the handler.
#[allow(missing_debug_implementations)]
pub enum HandlerCommand {
    /// Set the active socket write half after a (re)connect.
    SetSink(WsSink),
    /// Request subscription of an already-registered subscription.
    Subscribe {
        /// Local subscription identifier.
        subscription_id: u64,
    },
    /// Request unsubscription of a live subscription.
    Unsubscribe {
        /// Local subscription identifier.
        subscription_id: u64,
    },
    /// Re-request every live subscription (after an external reconnect).
    Resubscribe,
    /// Close the socket and stop the handler.
    Disconnect,
}

/// Binance WebSocket feed handler.
///
/// One handler per physical connection; many connections run concurrently
/// with no shared mutable state between them.
#[allow(missing_debug_implementations)]
pub struct BinanceWsFeedHandler {
    signal: Arc<AtomicBool>,
    cmd_rx: tokio::sync::mpsc::UnboundedReceiver<HandlerCommand>,
    raw_rx: tokio::sync::mpsc::UnboundedReceiver<Message>,
    sink: Option<WsSink>,
    dispatcher: StreamDispatcher,
    registry: Arc<TopicRegistry>,
    pending: Arc<PendingRequests>,
    request_ids: Arc<RequestIdAllocator>,
}

impl BinanceWsFeedHandler {
    /// Creates a new feed handler.
    #[must_use]
    pub fn new(
        signal: Arc<AtomicBool>,
        cmd_rx: tokio::sync::mpsc::UnboundedReceiver<HandlerCommand>,
        raw_rx: tokio::sync::mpsc::UnboundedReceiver<Message>,
        dispatcher: StreamDispatcher,
        registry: Arc<TopicRegistry>,
        pending: Arc<PendingRequests>,
        request_ids: Arc<RequestIdAllocator>,
    ) -> Self {
        Self {
            signal,
            cmd_rx,
            raw_rx,
            sink: None,
            dispatcher,
            registry,
            pending,
            request_ids,
        }
    }

    /// Main processing loop; returns when disconnected or signalled.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.cmd_rx.recv() => {
                    if self.process_command(cmd).await {
                        return;
                    }
                }
                Some(msg) = self.raw_rx.recv() => {
                    self.process_message(msg).await;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_millis(100)) => {
                    if self.signal.load(Ordering::Relaxed) {
                        tracing::debug!("Stop signal received");
                        return;
                    }
                }
                else => {
                    return;
                }
            }
        }
    }

    /// Returns `true` when the handler should stop.
    async fn process_command(&mut self, cmd: HandlerCommand) -> bool {
        match cmd {
            HandlerCommand::SetSink(sink) => {
                tracing::debug!("Handler received socket sink");
                self.sink = Some(sink);
            }
            HandlerCommand::Subscribe { subscription_id } => {
                if let Err(e) = self.send_subscribe(subscription_id).await {
                    tracing::error!(error = %e, "Failed to handle subscribe command");
                }
            }
            HandlerCommand::Unsubscribe { subscription_id } => {
                if let Err(e) = self.send_unsubscribe(subscription_id).await {
                    tracing::error!(error = %e, "Failed to handle unsubscribe command");
                }
            }
            HandlerCommand::Resubscribe => {
                if let Err(e) = self.resubscribe_all().await {
                    tracing::error!(error = %e, "Failed to restore subscriptions");
                }
            }
            HandlerCommand::Disconnect => {
                tracing::debug!("Handler disconnecting");
                if let Some(mut sink) = self.sink.take() {
                    let _ = sink.send(Message::Close(None)).await;
                }
                return true;
            }
        }
        false
    }

    async fn send_subscribe(&mut self, subscription_id: u64) -> anyhow::Result<()> {
        let Some(subscription) = self.registry.get(subscription_id) else {
            anyhow::bail!("Subscribe for unknown subscription {subscription_id}");
        };

        let request_id = self.request_ids.next_id();
        let request = subscription.subscribe_frame(request_id);
        subscription.mark_subscribe();

        tracing::debug!(streams = ?request.params, request_id, "Subscribing");
        self.send_request(&request).await?;

        // Acks are processed by this same task, strictly after this point
        self.pending.insert(
            request_id,
            PendingRequest {
                action: PendingAction::Subscribe { subscription_id },
                streams: request.params,
            },
        );
        Ok(())
    }

    async fn send_unsubscribe(&mut self, subscription_id: u64) -> anyhow::Result<()> {
        let Some(subscription) = self.registry.get(subscription_id) else {
            anyhow::bail!("Unsubscribe for unknown subscription {subscription_id}");
        };

        let request_id = self.request_ids.next_id();
        let request = subscription.unsubscribe_frame(request_id);
        subscription.mark_unsubscribe();

        tracing::debug!(streams = ?request.params, request_id, "Unsubscribing");
        self.send_request(&request).await?;

        self.pending.insert(
            request_id,
            PendingRequest {
                action: PendingAction::Unsubscribe { subscription_id },
                streams: request.params,
            },
        );
        Ok(())
    }

    async fn resubscribe_all(&mut self) -> anyhow::Result<()> {
        for subscription in self.registry.snapshot() {
            match subscription.status() {
                SubscriptionStatus::Pending | SubscriptionStatus::Active => {
                    self.send_subscribe(subscription.id()).await?;
                }
                SubscriptionStatus::Closing
                | SubscriptionStatus::Closed
                | SubscriptionStatus::Failed => {}
            }
        }
        Ok(())
    }

    async fn send_request(&mut self, request: &super::control::BinanceWsRequest) -> anyhow::Result<()> {
        let payload = serde_json::to_string(request)?;

        let Some(sink) = &mut self.sink else {
            anyhow::bail!("No active WebSocket client");
        };

        sink.send(Message::Text(payload))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send message: {e}"))?;
        Ok(())
    }

    async fn process_message(&mut self, msg: Message) {
        let receive_time_ms = chrono::Utc::now().timestamp_millis();
        match msg {
            Message::Text(text) => {
                let outcome = self.dispatcher.on_frame(text.as_bytes(), receive_time_ms);
                if let DispatchOutcome::ErrorFrame { code, msg } = outcome {
                    tracing::error!(code, msg = %msg, "Binance error frame");
                }
            }
            Message::Binary(data) => {
                let _ = self.dispatcher.on_frame(&data, receive_time_ms);
            }
            Message::Ping(data) => {
                if let Some(sink) = &mut self.sink
                    && let Err(e) = sink.send(Message::Pong(data)).await
                {
                    tracing::warn!(error = %e, "Failed to send pong");
                }
            }
            Message::Pong(_) => {}
            Message::Close(_) => {
                tracing::info!("Received close frame");
            }
            Message::Frame(_) => {}
        }
    }
}
