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

//! Per-connection frame dispatch.
//!
//! One inbound frame is processed at a time per physical connection; the
//! dispatcher is logically single-threaded relative to its connection while
//! the process may host many connections with independent dispatchers.
//! Handler invocation order per dispatch key matches wire arrival order.

use std::{
    fmt,
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, Ordering},
    },
};

use ahash::AHashMap;
use serde_json::Value;

use super::{
    envelope::{parse_frame, split_envelope},
    identifier::MessageIdentifier,
    subscription::{DispatchContext, TopicRegistry},
};

/// Tracks the offset between the local clock and the venue clock, in
/// milliseconds.
///
/// Maintained externally (clock-offset tracking belongs to the surrounding
/// framework); the dispatcher only reads it to express venue event timestamps
/// on the local clock.
#[derive(Debug, Default)]
pub struct ClockOffset {
    offset_ms: AtomicI64,
}

impl ClockOffset {
    /// Creates a zero offset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            offset_ms: AtomicI64::new(0),
        }
    }

    /// Updates the offset.
    pub fn set_ms(&self, offset_ms: i64) {
        self.offset_ms.store(offset_ms, Ordering::Relaxed);
    }

    /// Returns the current offset.
    #[must_use]
    pub fn offset_ms(&self) -> i64 {
        self.offset_ms.load(Ordering::Relaxed)
    }
}

/// What an outgoing control request was for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingAction {
    /// SUBSCRIBE request for a subscription.
    Subscribe {
        /// Local subscription identifier.
        subscription_id: u64,
    },
    /// UNSUBSCRIBE request for a subscription.
    Unsubscribe {
        /// Local subscription identifier.
        subscription_id: u64,
    },
}

/// An outgoing control request awaiting its acknowledgement frame.
#[derive(Clone, Debug)]
pub struct PendingRequest {
    /// What the request was for.
    pub action: PendingAction,
    /// Stream names the request covered.
    pub streams: Vec<String>,
}

/// Correlation table matching acknowledgement frames to control requests.
///
/// Request IDs occupy the lowest dispatch precedence, so they can never
/// shadow topic or user-event matches.
#[derive(Debug, Default)]
pub struct PendingRequests {
    inner: Mutex<AHashMap<u64, PendingRequest>>,
}

impl PendingRequests {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks an outgoing request.
    pub fn insert(&self, request_id: u64, request: PendingRequest) {
        self.lock().insert(request_id, request);
    }

    /// Completes a request when its acknowledgement arrives.
    pub fn complete(&self, request_id: u64) -> Option<PendingRequest> {
        self.lock().remove(&request_id)
    }

    /// Number of requests still awaiting acknowledgement.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no requests are awaiting acknowledgement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AHashMap<u64, PendingRequest>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Why a frame was dropped instead of routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Bytes did not parse as JSON or matched no expected shape.
    Malformed,
    /// No evaluator produced a dispatch key (heartbeats, unknown shapes).
    Unidentified,
    /// A key was produced but no live subscription claims it.
    Unroutable,
}

/// Result of dispatching one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Frame reached a registered handler.
    Routed,
    /// Frame was a control acknowledgement, correlated by request ID.
    RequestAck(u64),
    /// Frame was a server error without a request ID.
    ErrorFrame {
        /// Error code from the server.
        code: i64,
        /// Error message from the server.
        msg: String,
    },
    /// Frame was dropped; expected for heartbeats and unmapped event types.
    Dropped(DropReason),
}

/// Dispatches decoded frames to the owning subscription or the pending
/// request table.
pub struct StreamDispatcher {
    identifier: MessageIdentifier,
    registry: Arc<TopicRegistry>,
    pending: Arc<PendingRequests>,
    clock_offset: Arc<ClockOffset>,
    echo_raw: bool,
    default_topic: Option<String>,
}

impl fmt::Debug for StreamDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamDispatcher")
            .field("subscriptions", &self.registry.subscription_count())
            .field("pending_requests", &self.pending.len())
            .field("echo_raw", &self.echo_raw)
            .finish_non_exhaustive()
    }
}

impl StreamDispatcher {
    /// Creates a dispatcher for one physical connection.
    #[must_use]
    pub fn new(
        identifier: MessageIdentifier,
        registry: Arc<TopicRegistry>,
        pending: Arc<PendingRequests>,
        clock_offset: Arc<ClockOffset>,
    ) -> Self {
        Self {
            identifier,
            registry,
            pending,
            clock_offset,
            echo_raw: false,
            default_topic: None,
        }
    }

    /// Enables raw-frame echo on delivered events.
    #[must_use]
    pub fn with_raw_echo(mut self, echo_raw: bool) -> Self {
        self.echo_raw = echo_raw;
        self
    }

    /// Sets the topic context for a single-topic connection that omits the
    /// combined-stream wrapper.
    #[must_use]
    pub fn with_default_topic(mut self, topic: impl Into<String>) -> Self {
        self.default_topic = Some(topic.into());
        self
    }

    /// The listener-identifier hook exposed to the socket layer.
    ///
    /// Same routine the dispatch loop uses; `None` means the frame is not
    /// routable to any logical subscription.
    #[must_use]
    pub fn listener_identifier(&self, raw: &[u8]) -> Option<String> {
        let json = parse_frame(raw).ok()?;
        self.identifier
            .identify_with_context(&json, self.default_topic.as_deref())
    }

    /// Processes one inbound frame.
    pub fn on_frame(&self, raw: &[u8], receive_time_ms: i64) -> DispatchOutcome {
        let json = match parse_frame(raw) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed frame");
                return DispatchOutcome::Dropped(DropReason::Malformed);
            }
        };

        let Some(key) = self
            .identifier
            .identify_with_context(&json, self.default_topic.as_deref())
        else {
            if let (Some(code), Some(msg)) = (
                json.get("code").and_then(Value::as_i64),
                json.get("msg").and_then(Value::as_str),
            ) {
                tracing::warn!(code, msg, "Server error frame");
                return DispatchOutcome::ErrorFrame {
                    code,
                    msg: msg.to_string(),
                };
            }
            tracing::debug!("Dropping unidentified frame");
            return DispatchOutcome::Dropped(DropReason::Unidentified);
        };

        // Request-ID keys belong to the correlation table, never to a topic
        // subscription.
        if let Some(request_id) = json.get("id").and_then(Value::as_u64)
            && key == request_id.to_string()
        {
            return self.handle_ack(request_id, &json);
        }

        let (_, payload) = split_envelope(&json);
        let raw_text = if self.echo_raw {
            std::str::from_utf8(raw).ok()
        } else {
            None
        };
        let ctx = DispatchContext {
            receive_time_ms,
            clock_offset_ms: self.clock_offset.offset_ms(),
            raw: raw_text,
        };

        if self.registry.route(&key, &ctx, payload) {
            DispatchOutcome::Routed
        } else {
            tracing::debug!(key = %key, "Dropping unroutable frame");
            DispatchOutcome::Dropped(DropReason::Unroutable)
        }
    }

    fn handle_ack(&self, request_id: u64, json: &Value) -> DispatchOutcome {
        let Some(pending) = self.pending.complete(request_id) else {
            tracing::debug!(request_id, "Acknowledgement for unknown request");
            return DispatchOutcome::RequestAck(request_id);
        };

        // A null result is success; anything else (or an error code) is a
        // rejection.
        let success =
            json.get("code").is_none() && json.get("result").is_none_or(Value::is_null);

        match pending.action {
            PendingAction::Subscribe { subscription_id } => {
                if let Some(subscription) = self.registry.get(subscription_id) {
                    if success {
                        subscription.confirm_subscribe();
                        tracing::debug!(streams = ?pending.streams, "Subscription confirmed");
                    } else {
                        subscription.mark_failure();
                        tracing::warn!(streams = ?pending.streams, "Subscription failed");
                    }
                }
            }
            PendingAction::Unsubscribe { subscription_id } => {
                self.registry.remove(subscription_id);
                tracing::debug!(streams = ?pending.streams, "Unsubscribe confirmed");
            }
        }

        DispatchOutcome::RequestAck(request_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use rstest::rstest;
    use serde::Deserialize;
    use ustr::Ustr;

    use super::*;
    use crate::websocket::subscription::{StreamPayload, Subscription, SubscriptionStatus};

    #[derive(Clone, Debug, Deserialize)]
    struct TestKlineMsg {
        #[serde(rename = "e")]
        _event_type: String,
        #[serde(rename = "E")]
        event_time: i64,
        #[serde(rename = "s")]
        symbol: Ustr,
    }

    impl StreamPayload for TestKlineMsg {
        fn symbol(&self) -> Option<Ustr> {
            Some(self.symbol)
        }

        fn event_time(&self) -> Option<i64> {
            Some(self.event_time)
        }
    }

    #[derive(Clone, Debug, Deserialize)]
    struct TestOrderMsg {
        #[serde(rename = "e")]
        _event_type: String,
    }

    impl StreamPayload for TestOrderMsg {}

    struct Fixture {
        registry: Arc<TopicRegistry>,
        pending: Arc<PendingRequests>,
        dispatcher: StreamDispatcher,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(TopicRegistry::new());
        let pending = Arc::new(PendingRequests::new());
        let dispatcher = StreamDispatcher::new(
            MessageIdentifier::futures(),
            Arc::clone(&registry),
            Arc::clone(&pending),
            Arc::new(ClockOffset::new()),
        );
        Fixture {
            registry,
            pending,
            dispatcher,
        }
    }

    #[rstest]
    fn test_kline_frame_routes_to_exact_topic_handler() {
        let f = fixture();
        let symbols = Arc::new(Mutex::new(Vec::new()));
        let symbols_clone = Arc::clone(&symbols);
        f.registry
            .insert(Subscription::market_data::<TestKlineMsg, _>(
                "ethusdt@kline_1h",
                move |event| {
                    symbols_clone.lock().unwrap().push(event.symbol);
                },
            ))
            .confirm_subscribe();

        let raw = br#"{"stream":"ethusdt@kline_1h","data":{"e":"kline","E":1700000000000,"s":"ETHUSDT","k":{}}}"#;
        let outcome = f.dispatcher.on_frame(raw, 1_700_000_000_100);
        assert_eq!(outcome, DispatchOutcome::Routed);
        assert_eq!(symbols.lock().unwrap()[0], Some(Ustr::from("ETHUSDT")));
    }

    #[rstest]
    fn test_user_data_frame_routes_only_to_owning_listen_key() {
        let f = fixture();
        let own_hits = Arc::new(AtomicUsize::new(0));
        let other_hits = Arc::new(AtomicUsize::new(0));

        let own_clone = Arc::clone(&own_hits);
        f.registry
            .insert(
                crate::websocket::subscription::UserDataBuilder::new("abc123")
                    .on_event::<TestOrderMsg, _>("ORDER_TRADE_UPDATE", move |_| {
                        own_clone.fetch_add(1, Ordering::Relaxed);
                    })
                    .build(),
            )
            .confirm_subscribe();

        let other_clone = Arc::clone(&other_hits);
        f.registry
            .insert(
                crate::websocket::subscription::UserDataBuilder::new("zzz999")
                    .on_event::<TestOrderMsg, _>("ORDER_TRADE_UPDATE", move |_| {
                        other_clone.fetch_add(1, Ordering::Relaxed);
                    })
                    .build(),
            )
            .confirm_subscribe();

        let raw = br#"{"stream":"abc123","data":{"e":"ORDER_TRADE_UPDATE","E":1700000000001,"o":{}}}"#;
        assert_eq!(
            f.dispatcher.on_frame(raw, 1_700_000_000_200),
            DispatchOutcome::Routed
        );
        assert_eq!(own_hits.load(Ordering::Relaxed), 1);
        assert_eq!(other_hits.load(Ordering::Relaxed), 0);
    }

    #[rstest]
    fn test_user_data_without_matching_handler_drops() {
        let f = fixture();
        f.registry
            .insert(
                crate::websocket::subscription::UserDataBuilder::new("abc123")
                    .on_event::<TestOrderMsg, _>("ORDER_TRADE_UPDATE", |_| {})
                    .build(),
            )
            .confirm_subscribe();

        let raw = br#"{"stream":"abc123","data":{"e":"ACCOUNT_UPDATE","E":1700000000001,"a":{}}}"#;
        assert_eq!(
            f.dispatcher.on_frame(raw, 1_700_000_000_200),
            DispatchOutcome::Dropped(DropReason::Unroutable)
        );
    }

    #[rstest]
    fn test_request_ack_completes_pending_and_activates_subscription() {
        let f = fixture();
        let subscription = f.registry.insert(Subscription::market_data::<
            TestKlineMsg,
            _,
        >("btcusdt@trade", |_| {}));
        f.pending.insert(
            7,
            PendingRequest {
                action: PendingAction::Subscribe {
                    subscription_id: subscription.id(),
                },
                streams: vec!["btcusdt@trade".to_string()],
            },
        );

        let outcome = f.dispatcher.on_frame(br#"{"result":null,"id":7}"#, 0);
        assert_eq!(outcome, DispatchOutcome::RequestAck(7));
        assert_eq!(subscription.status(), SubscriptionStatus::Active);
        assert!(f.pending.is_empty());
    }

    #[rstest]
    fn test_request_ack_never_reaches_topic_subscriptions() {
        let f = fixture();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        f.registry
            .insert(Subscription::market_data::<TestKlineMsg, _>(
                "btcusdt@trade",
                move |_| {
                    hits_clone.fetch_add(1, Ordering::Relaxed);
                },
            ))
            .confirm_subscribe();

        let outcome = f.dispatcher.on_frame(br#"{"id":7}"#, 0);
        assert_eq!(outcome, DispatchOutcome::RequestAck(7));
        assert_eq!(hits.load(Ordering::Relaxed), 0);
    }

    #[rstest]
    fn test_error_ack_marks_subscription_failed() {
        let f = fixture();
        let subscription = f.registry.insert(Subscription::market_data::<
            TestKlineMsg,
            _,
        >("nonsense@trade", |_| {}));
        f.pending.insert(
            3,
            PendingRequest {
                action: PendingAction::Subscribe {
                    subscription_id: subscription.id(),
                },
                streams: vec!["nonsense@trade".to_string()],
            },
        );

        let raw = br#"{"code":-1121,"msg":"Invalid symbol.","id":3}"#;
        assert_eq!(f.dispatcher.on_frame(raw, 0), DispatchOutcome::RequestAck(3));
        assert_eq!(subscription.status(), SubscriptionStatus::Failed);
    }

    #[rstest]
    fn test_unsubscribe_ack_removes_subscription() {
        let f = fixture();
        let subscription = f.registry.insert(Subscription::market_data::<
            TestKlineMsg,
            _,
        >("btcusdt@trade", |_| {}));
        subscription.confirm_subscribe();
        subscription.mark_unsubscribe();
        f.pending.insert(
            9,
            PendingRequest {
                action: PendingAction::Unsubscribe {
                    subscription_id: subscription.id(),
                },
                streams: vec!["btcusdt@trade".to_string()],
            },
        );

        assert_eq!(
            f.dispatcher.on_frame(br#"{"result":null,"id":9}"#, 0),
            DispatchOutcome::RequestAck(9)
        );
        assert_eq!(subscription.status(), SubscriptionStatus::Closed);
        assert_eq!(f.registry.subscription_count(), 0);
    }

    #[rstest]
    fn test_malformed_frame_drops_without_reaching_handlers() {
        let f = fixture();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        f.registry
            .insert(Subscription::market_data::<TestKlineMsg, _>(
                "btcusdt@trade",
                move |_| {
                    hits_clone.fetch_add(1, Ordering::Relaxed);
                },
            ))
            .confirm_subscribe();

        assert_eq!(
            f.dispatcher.on_frame(b"{truncated", 0),
            DispatchOutcome::Dropped(DropReason::Malformed)
        );
        assert_eq!(hits.load(Ordering::Relaxed), 0);
    }

    #[rstest]
    fn test_unidentified_frame_drops_quietly() {
        let f = fixture();
        assert_eq!(
            f.dispatcher.on_frame(br#"{"pong":1}"#, 0),
            DispatchOutcome::Dropped(DropReason::Unidentified)
        );
    }

    #[rstest]
    fn test_error_frame_without_id_is_surfaced() {
        let f = fixture();
        let outcome = f
            .dispatcher
            .on_frame(br#"{"code":-1003,"msg":"Too many requests."}"#, 0);
        assert_eq!(
            outcome,
            DispatchOutcome::ErrorFrame {
                code: -1003,
                msg: "Too many requests.".to_string()
            }
        );
    }

    #[rstest]
    fn test_listener_identifier_matches_dispatch_routine() {
        let f = fixture();
        let raw = br#"{"stream":"abc123","data":{"e":"ORDER_TRADE_UPDATE","E":1,"o":{}}}"#;
        assert_eq!(
            f.dispatcher.listener_identifier(raw).as_deref(),
            Some("abc123ORDER_TRADE_UPDATE")
        );
        let raw = br#"{"stream":"ethusdt@kline_1h","data":{"e":"kline","E":1,"s":"ETHUSDT"}}"#;
        assert_eq!(
            f.dispatcher.listener_identifier(raw).as_deref(),
            Some("ethusdt@kline_1h")
        );
    }

    #[rstest]
    fn test_default_topic_context_routes_unwrapped_user_frames() {
        let registry = Arc::new(TopicRegistry::new());
        let pending = Arc::new(PendingRequests::new());
        let dispatcher = StreamDispatcher::new(
            MessageIdentifier::futures(),
            Arc::clone(&registry),
            Arc::clone(&pending),
            Arc::new(ClockOffset::new()),
        )
        .with_default_topic("abc123");

        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        registry
            .insert(
                crate::websocket::subscription::UserDataBuilder::new("abc123")
                    .on_event::<TestOrderMsg, _>("ORDER_TRADE_UPDATE", move |_| {
                        hits_clone.fetch_add(1, Ordering::Relaxed);
                    })
                    .build(),
            )
            .confirm_subscribe();

        let raw = br#"{"e":"ORDER_TRADE_UPDATE","E":1700000000001,"o":{}}"#;
        assert_eq!(dispatcher.on_frame(raw, 0), DispatchOutcome::Routed);
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[rstest]
    fn test_depth_sequence_enrichment() {
        #[derive(Clone, Debug, Deserialize)]
        struct TestDepthMsg {
            #[serde(rename = "u")]
            final_update_id: u64,
        }

        impl StreamPayload for TestDepthMsg {
            fn book_sequence(&self) -> Option<u64> {
                Some(self.final_update_id)
            }
        }

        let f = fixture();
        let sequences = Arc::new(Mutex::new(Vec::new()));
        let sequences_clone = Arc::clone(&sequences);
        f.registry
            .insert(Subscription::market_data::<TestDepthMsg, _>(
                "btcusdt@depth",
                move |event| {
                    sequences_clone.lock().unwrap().push(event.sequence);
                },
            ))
            .confirm_subscribe();

        let raw = br#"{"stream":"btcusdt@depth","data":{"e":"depthUpdate","u":42,"b":[],"a":[]}}"#;
        assert_eq!(f.dispatcher.on_frame(raw, 0), DispatchOutcome::Routed);
        assert_eq!(sequences.lock().unwrap()[0], Some(42));
    }
}
