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

//! Per-subscription state and the registry of live subscriptions.
//!
//! A subscription owns one or more topic strings, the control-frame builders
//! for them, and the typed handlers invoked once a frame is matched to it.
//! Public subscriptions map one raw topic string to one handler. The
//! user-data subscription multiplexes several business event types under a
//! single listen key; its dispatch keys are the listen key concatenated with
//! the event name, kept in the same flat map so routing stays a single
//! lookup.

use std::{
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc, RwLock,
        atomic::{AtomicU8, AtomicU64, Ordering},
    },
};

use ahash::AHashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use ustr::Ustr;

use super::control::BinanceWsRequest;

/// Context handed to routes for event enrichment.
#[derive(Clone, Copy, Debug)]
pub struct DispatchContext<'a> {
    /// Local receive timestamp in milliseconds.
    pub receive_time_ms: i64,
    /// Offset added to venue event timestamps to express them on the local
    /// clock.
    pub clock_offset_ms: i64,
    /// Original frame text when diagnostic echo is enabled.
    pub raw: Option<&'a str>,
}

/// A decoded, enriched event delivered to a caller handler.
#[derive(Clone, Debug)]
pub struct StreamEvent<T> {
    /// The typed payload.
    pub payload: T,
    /// Topic the owning subscription registered (listen key for user data).
    pub topic: Ustr,
    /// Symbol taken from the payload when present.
    pub symbol: Option<Ustr>,
    /// Listen key owning this event (user-data subscriptions only).
    pub listen_key: Option<Ustr>,
    /// Local receive timestamp in milliseconds.
    pub receive_time_ms: i64,
    /// Clock-offset corrected event timestamp in milliseconds, when the
    /// payload carries one.
    pub event_time_ms: Option<i64>,
    /// Monotonic order-book update sequence, on depth frames only.
    pub sequence: Option<u64>,
    /// Original raw frame text (diagnostic echo opt-in).
    pub raw: Option<String>,
}

/// Implemented by wire payload types to expose enrichment fields.
pub trait StreamPayload: DeserializeOwned {
    /// Symbol embedded in the payload, when present.
    fn symbol(&self) -> Option<Ustr> {
        None
    }

    /// Venue event timestamp in milliseconds, when present.
    fn event_time(&self) -> Option<i64> {
        None
    }

    /// Order-book update sequence (`lastUpdateId`), on depth payloads only.
    fn book_sequence(&self) -> Option<u64> {
        None
    }
}

/// Subscription lifecycle state.
///
/// `Pending -> Active` on subscribe ack, `-> Closing` on unsubscribe request,
/// `-> Closed` on unsubscribe ack or connection teardown. Frames route only
/// while `Active` or `Closing`: in-flight frames already queued when an
/// unsubscribe was requested may still be delivered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubscriptionStatus {
    /// Subscribe requested, no ack yet.
    Pending,
    /// Subscribe acknowledged; frames route.
    Active,
    /// Unsubscribe requested, no ack yet; frames still route.
    Closing,
    /// Unsubscribe acknowledged or connection closed.
    Closed,
    /// Subscribe rejected by the server.
    Failed,
}

impl SubscriptionStatus {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Active => 1,
            Self::Closing => 2,
            Self::Closed => 3,
            Self::Failed => 4,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Active,
            2 => Self::Closing,
            3 => Self::Closed,
            4 => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Opaque handle to a live subscription, used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    /// Local subscription identifier.
    pub id: u64,
}

/// Boxed handler for one user-data event type.
pub type UserDataHandler<T> = Box<dyn Fn(StreamEvent<T>) + Send + Sync>;

type RouteFn = Box<dyn Fn(&DispatchContext<'_>, &Value) + Send + Sync>;

fn make_route<T, F>(topic: Ustr, listen_key: Option<Ustr>, handler: F) -> RouteFn
where
    T: StreamPayload + 'static,
    F: Fn(StreamEvent<T>) + Send + Sync + 'static,
{
    Box::new(move |ctx, payload| {
        let decoded: T = match serde_json::from_value(payload.clone()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "Failed to decode stream payload");
                return;
            }
        };

        let event = StreamEvent {
            symbol: decoded.symbol(),
            event_time_ms: decoded.event_time().map(|t| t + ctx.clock_offset_ms),
            sequence: decoded.book_sequence(),
            topic,
            listen_key,
            receive_time_ms: ctx.receive_time_ms,
            raw: ctx.raw.map(ToOwned::to_owned),
            payload: decoded,
        };

        // Handler faults are the caller's problem; they must not break the
        // dispatch loop for subsequent frames.
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler(event))) {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(topic = %topic, panic = %msg, "Stream handler panicked");
        }
    })
}

/// A logical subscription on one physical connection.
pub struct Subscription {
    id: u64,
    topics: Vec<String>,
    listen_key: Option<Ustr>,
    routes: AHashMap<String, RouteFn>,
    status: AtomicU8,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topics", &self.topics)
            .field("listen_key", &self.listen_key)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Creates a public market-data subscription: one topic, one handler.
    pub fn market_data<T, F>(topic: &str, handler: F) -> Self
    where
        T: StreamPayload + 'static,
        F: Fn(StreamEvent<T>) + Send + Sync + 'static,
    {
        let interned = Ustr::from(topic);
        let mut routes = AHashMap::with_capacity(1);
        routes.insert(topic.to_string(), make_route::<T, F>(interned, None, handler));
        Self {
            id: 0,
            topics: vec![topic.to_string()],
            listen_key: None,
            routes,
            status: AtomicU8::new(SubscriptionStatus::Pending.as_u8()),
        }
    }

    /// Local identifier assigned by the registry.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The topic set to request on (re)connect.
    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Listen key for user-data subscriptions.
    #[must_use]
    pub fn listen_key(&self) -> Option<Ustr> {
        self.listen_key
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> SubscriptionStatus {
        SubscriptionStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Marks the subscription as awaiting a subscribe ack.
    pub fn mark_subscribe(&self) {
        self.status
            .store(SubscriptionStatus::Pending.as_u8(), Ordering::Release);
    }

    /// Subscribe acknowledged.
    pub fn confirm_subscribe(&self) {
        self.status
            .store(SubscriptionStatus::Active.as_u8(), Ordering::Release);
    }

    /// Unsubscribe requested; frames still route until the ack.
    pub fn mark_unsubscribe(&self) {
        self.status
            .store(SubscriptionStatus::Closing.as_u8(), Ordering::Release);
    }

    /// Unsubscribe acknowledged or connection closed.
    pub fn confirm_unsubscribe(&self) {
        self.status
            .store(SubscriptionStatus::Closed.as_u8(), Ordering::Release);
    }

    /// Subscribe rejected by the server.
    pub fn mark_failure(&self) {
        self.status
            .store(SubscriptionStatus::Failed.as_u8(), Ordering::Release);
    }

    /// Whether frames currently route to this subscription.
    #[must_use]
    pub fn is_routable(&self) -> bool {
        matches!(
            self.status(),
            SubscriptionStatus::Active | SubscriptionStatus::Closing
        )
    }

    /// Whether this subscription owns the dispatch key.
    #[must_use]
    pub fn owns(&self, key: &str) -> bool {
        self.routes.contains_key(key)
    }

    /// Builds the SUBSCRIBE control frame for this subscription's topics.
    #[must_use]
    pub fn subscribe_frame(&self, request_id: u64) -> BinanceWsRequest {
        BinanceWsRequest::subscribe(self.topics.clone(), request_id)
    }

    /// Builds the UNSUBSCRIBE control frame for this subscription's topics.
    #[must_use]
    pub fn unsubscribe_frame(&self, request_id: u64) -> BinanceWsRequest {
        BinanceWsRequest::unsubscribe(self.topics.clone(), request_id)
    }

    /// Routes a frame to this subscription if it owns the dispatch key.
    ///
    /// Returns `true` when the key was claimed; the registered handler runs
    /// with the decoded payload. An unregistered key (including user-data
    /// event types with no handler installed) returns `false` without raising.
    pub fn route(&self, key: &str, ctx: &DispatchContext<'_>, payload: &Value) -> bool {
        if !self.is_routable() {
            return false;
        }
        match self.routes.get(key) {
            Some(route) => {
                route(ctx, payload);
                true
            }
            None => false,
        }
    }
}

/// Builder for a user-data subscription multiplexing event types under one
/// listen key.
///
/// Only events with a handler installed are registered; frames for other
/// event types on the same listen key are silently ignored, never misrouted.
pub struct UserDataBuilder {
    listen_key: Ustr,
    routes: AHashMap<String, RouteFn>,
}

impl fmt::Debug for UserDataBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDataBuilder")
            .field("listen_key", &self.listen_key)
            .field("events", &self.routes.len())
            .finish_non_exhaustive()
    }
}

impl UserDataBuilder {
    /// Creates a builder for the given listen key.
    #[must_use]
    pub fn new(listen_key: &str) -> Self {
        Self {
            listen_key: Ustr::from(listen_key),
            routes: AHashMap::new(),
        }
    }

    /// Registers a typed handler for one event name under the listen key.
    #[must_use]
    pub fn on_event<T, F>(mut self, event: &str, handler: F) -> Self
    where
        T: StreamPayload + 'static,
        F: Fn(StreamEvent<T>) + Send + Sync + 'static,
    {
        let key = format!("{}{event}", self.listen_key);
        self.routes.insert(
            key,
            make_route::<T, F>(self.listen_key, Some(self.listen_key), handler),
        );
        self
    }

    /// Finalizes the subscription; its single topic is the listen key itself.
    #[must_use]
    pub fn build(self) -> Subscription {
        Subscription {
            id: 0,
            topics: vec![self.listen_key.to_string()],
            listen_key: Some(self.listen_key),
            routes: self.routes,
            status: AtomicU8::new(SubscriptionStatus::Pending.as_u8()),
        }
    }
}

/// Registry of live subscriptions for one physical connection.
///
/// Mutated only by subscribe/unsubscribe operations; the lock guards those
/// mutations (a reconnect-triggered resubscribe can race a new caller
/// subscribe). Dispatch only reads.
pub struct TopicRegistry {
    subscriptions: RwLock<Vec<Arc<Subscription>>>,
    next_id: AtomicU64,
}

impl fmt::Debug for TopicRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicRegistry")
            .field("subscriptions", &self.subscription_count())
            .finish_non_exhaustive()
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Arc<Subscription>>> {
        self.subscriptions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Arc<Subscription>>> {
        self.subscriptions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Inserts a subscription, assigning its local identifier.
    pub fn insert(&self, mut subscription: Subscription) -> Arc<Subscription> {
        subscription.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let subscription = Arc::new(subscription);
        self.write().push(Arc::clone(&subscription));
        subscription
    }

    /// Looks up a subscription by local identifier.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<Arc<Subscription>> {
        self.read().iter().find(|s| s.id == id).cloned()
    }

    /// Removes a subscription, marking it closed.
    pub fn remove(&self, id: u64) -> Option<Arc<Subscription>> {
        let mut subscriptions = self.write();
        let index = subscriptions.iter().position(|s| s.id == id)?;
        let subscription = subscriptions.remove(index);
        subscription.confirm_unsubscribe();
        Some(subscription)
    }

    /// Snapshot of live subscriptions in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Subscription>> {
        self.read().clone()
    }

    /// All topics to request on (re)connect.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.read()
            .iter()
            .flat_map(|s| s.topics().iter().cloned())
            .collect()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.read().len()
    }

    /// Routes a frame to the owning subscription.
    ///
    /// Subscriptions are scanned in registration order, stopping at the first
    /// claim. Dispatch keys are namespaced precisely so at most one
    /// subscription owns any key; a second owner is a registry bug, not a
    /// condition to resolve silently.
    pub fn route(&self, key: &str, ctx: &DispatchContext<'_>, payload: &Value) -> bool {
        let subscriptions = self.read();
        debug_assert!(
            subscriptions
                .iter()
                .filter(|s| s.is_routable() && s.owns(key))
                .count()
                <= 1,
            "ambiguous dispatch key: {key}"
        );
        subscriptions.iter().any(|s| s.route(key, ctx, payload))
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
    use serde_json::json;

    use super::*;

    #[derive(Clone, Debug, Deserialize)]
    struct TestTradeMsg {
        #[serde(rename = "e")]
        _event_type: String,
        #[serde(rename = "E")]
        event_time: i64,
        #[serde(rename = "s")]
        symbol: Ustr,
    }

    impl StreamPayload for TestTradeMsg {
        fn symbol(&self) -> Option<Ustr> {
            Some(self.symbol)
        }

        fn event_time(&self) -> Option<i64> {
            Some(self.event_time)
        }
    }

    fn ctx() -> DispatchContext<'static> {
        DispatchContext {
            receive_time_ms: 1_700_000_001_000,
            clock_offset_ms: 0,
            raw: None,
        }
    }

    #[rstest]
    fn test_market_data_route_claims_own_topic_only() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let subscription =
            Subscription::market_data::<TestTradeMsg, _>("btcusdt@trade", move |_| {
                count_clone.fetch_add(1, Ordering::Relaxed);
            });
        subscription.confirm_subscribe();

        let payload = json!({"e": "trade", "E": 1_700_000_000_000_i64, "s": "BTCUSDT"});
        assert!(subscription.route("btcusdt@trade", &ctx(), &payload));
        assert!(!subscription.route("ethusdt@trade", &ctx(), &payload));
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[rstest]
    fn test_frames_do_not_route_while_pending_or_closed() {
        let subscription = Subscription::market_data::<TestTradeMsg, _>("btcusdt@trade", |_| {});
        let payload = json!({"e": "trade", "E": 1, "s": "BTCUSDT"});

        assert_eq!(subscription.status(), SubscriptionStatus::Pending);
        assert!(!subscription.route("btcusdt@trade", &ctx(), &payload));

        subscription.confirm_subscribe();
        assert!(subscription.route("btcusdt@trade", &ctx(), &payload));

        subscription.confirm_unsubscribe();
        assert!(!subscription.route("btcusdt@trade", &ctx(), &payload));
    }

    #[rstest]
    fn test_closing_subscription_still_routes_in_flight_frames() {
        let subscription = Subscription::market_data::<TestTradeMsg, _>("btcusdt@trade", |_| {});
        subscription.confirm_subscribe();
        subscription.mark_unsubscribe();
        let payload = json!({"e": "trade", "E": 1, "s": "BTCUSDT"});
        assert!(subscription.route("btcusdt@trade", &ctx(), &payload));
    }

    #[rstest]
    fn test_event_enrichment_applies_clock_offset_and_symbol() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);
        let subscription =
            Subscription::market_data::<TestTradeMsg, _>("btcusdt@trade", move |event| {
                events_clone.lock().unwrap().push(event);
            });
        subscription.confirm_subscribe();

        let context = DispatchContext {
            receive_time_ms: 1_700_000_001_000,
            clock_offset_ms: 25,
            raw: Some(r#"{"e":"trade"}"#),
        };
        let payload = json!({"e": "trade", "E": 1_700_000_000_000_i64, "s": "BTCUSDT"});
        assert!(subscription.route("btcusdt@trade", &context, &payload));

        let events = events.lock().unwrap();
        let event = &events[0];
        assert_eq!(event.symbol, Some(Ustr::from("BTCUSDT")));
        assert_eq!(event.event_time_ms, Some(1_700_000_000_025));
        assert_eq!(event.receive_time_ms, 1_700_000_001_000);
        assert_eq!(event.raw.as_deref(), Some(r#"{"e":"trade"}"#));
    }

    #[rstest]
    fn test_handler_panic_is_isolated() {
        let subscription = Subscription::market_data::<TestTradeMsg, _>("btcusdt@trade", |_| {
            panic!("handler bug");
        });
        subscription.confirm_subscribe();
        let payload = json!({"e": "trade", "E": 1, "s": "BTCUSDT"});
        // The route claims the frame; the panic must not propagate.
        assert!(subscription.route("btcusdt@trade", &ctx(), &payload));
        assert!(subscription.route("btcusdt@trade", &ctx(), &payload));
    }

    #[rstest]
    fn test_user_data_unregistered_event_is_ignored_not_misrouted() {
        let orders = Arc::new(AtomicUsize::new(0));
        let orders_clone = Arc::clone(&orders);
        let subscription = UserDataBuilder::new("abc123")
            .on_event::<TestTradeMsg, _>("ORDER_TRADE_UPDATE", move |_| {
                orders_clone.fetch_add(1, Ordering::Relaxed);
            })
            .build();
        subscription.confirm_subscribe();

        let payload = json!({"e": "ACCOUNT_UPDATE", "E": 1, "s": "BTCUSDT"});
        assert!(!subscription.route("abc123ACCOUNT_UPDATE", &ctx(), &payload));
        assert_eq!(orders.load(Ordering::Relaxed), 0);

        let payload = json!({"e": "ORDER_TRADE_UPDATE", "E": 1, "s": "BTCUSDT"});
        assert!(subscription.route("abc123ORDER_TRADE_UPDATE", &ctx(), &payload));
        assert_eq!(orders.load(Ordering::Relaxed), 1);
    }

    #[rstest]
    fn test_user_data_events_are_stamped_with_listen_key() {
        let keys = Arc::new(Mutex::new(Vec::new()));
        let keys_clone = Arc::clone(&keys);
        let subscription = UserDataBuilder::new("abc123")
            .on_event::<TestTradeMsg, _>("ORDER_TRADE_UPDATE", move |event| {
                keys_clone.lock().unwrap().push(event.listen_key);
            })
            .build();
        subscription.confirm_subscribe();

        let payload = json!({"e": "ORDER_TRADE_UPDATE", "E": 1, "s": "BTCUSDT"});
        assert!(subscription.route("abc123ORDER_TRADE_UPDATE", &ctx(), &payload));
        assert_eq!(keys.lock().unwrap()[0], Some(Ustr::from("abc123")));
    }

    #[rstest]
    fn test_subscribe_and_unsubscribe_frames_share_topics() {
        let subscription = Subscription::market_data::<TestTradeMsg, _>("btcusdt@trade", |_| {});
        let subscribe = subscription.subscribe_frame(1);
        let unsubscribe = subscription.unsubscribe_frame(2);
        assert_eq!(subscribe.params, unsubscribe.params);
        assert!(subscribe.id < unsubscribe.id);
    }

    #[rstest]
    fn test_registry_routes_in_registration_order() {
        let registry = TopicRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        let subscription = registry.insert(Subscription::market_data::<TestTradeMsg, _>(
            "btcusdt@trade",
            move |_| {
                hits_clone.fetch_add(1, Ordering::Relaxed);
            },
        ));
        subscription.confirm_subscribe();
        registry
            .insert(Subscription::market_data::<TestTradeMsg, _>(
                "ethusdt@trade",
                |_| {},
            ))
            .confirm_subscribe();

        let payload = json!({"e": "trade", "E": 1, "s": "BTCUSDT"});
        assert!(registry.route("btcusdt@trade", &ctx(), &payload));
        assert!(!registry.route("solusdt@trade", &ctx(), &payload));
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[rstest]
    fn test_registry_remove_closes_subscription() {
        let registry = TopicRegistry::new();
        let subscription = registry.insert(Subscription::market_data::<TestTradeMsg, _>(
            "btcusdt@trade",
            |_| {},
        ));
        subscription.confirm_subscribe();
        let id = subscription.id();

        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.status(), SubscriptionStatus::Closed);
        assert_eq!(registry.subscription_count(), 0);
        assert!(registry.get(id).is_none());
    }

    #[rstest]
    fn test_registry_topics_aggregates_for_reconnect() {
        let registry = TopicRegistry::new();
        registry.insert(Subscription::market_data::<TestTradeMsg, _>(
            "btcusdt@trade",
            |_| {},
        ));
        registry.insert(UserDataBuilder::new("abc123").build());
        assert_eq!(registry.topics(), vec!["btcusdt@trade", "abc123"]);
    }

    #[rstest]
    fn test_routing_same_frame_twice_is_idempotent() {
        let payloads = Arc::new(Mutex::new(Vec::new()));
        let payloads_clone = Arc::clone(&payloads);
        let subscription =
            Subscription::market_data::<TestTradeMsg, _>("btcusdt@trade", move |event| {
                payloads_clone
                    .lock()
                    .unwrap()
                    .push(format!("{:?}", event.payload));
            });
        subscription.confirm_subscribe();

        let payload = json!({"e": "trade", "E": 1_700_000_000_000_i64, "s": "BTCUSDT"});
        assert!(subscription.route("btcusdt@trade", &ctx(), &payload));
        assert!(subscription.route("btcusdt@trade", &ctx(), &payload));

        let payloads = payloads.lock().unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0], payloads[1]);
    }
}
