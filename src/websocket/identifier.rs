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

//! Dispatch-key computation for inbound frames.
//!
//! An ordered set of evaluators inspects specific fields of a frame and
//! produces a dispatch key. Evaluators run in ascending priority order; the
//! first evaluator whose required fields are all present (and whose value
//! predicates pass) determines the key. Concretely, per socket API:
//!
//! 1. topic + nested user-data event name - disambiguates the several logical
//!    sub-streams sharing one listen key;
//! 2. plain topic - all public market-data frames;
//! 3. numeric request `id` - subscribe/unsubscribe acknowledgements, which
//!    carry no `stream` field.
//!
//! One routine serves both the dispatch loop and the socket layer's
//! listener-identifier hook; there is deliberately no second, parallel
//! implementation of this logic anywhere in the crate.

use serde_json::Value;

use super::envelope::{DATA_FIELD, STREAM_FIELD};
use crate::common::consts::{FUTURES_USER_STREAM_EVENTS, SPOT_USER_STREAM_EVENTS};

/// Field carrying the embedded event-type discriminator.
pub const EVENT_TYPE_FIELD: &str = "e";

/// Field carrying the request ID on acknowledgement frames.
pub const REQUEST_ID_FIELD: &str = "id";

/// Reference to a field read by an evaluator.
///
/// `depth` 1 reads a top-level field; `depth` 2 reads inside the nested
/// `data` object, falling back to the top level for unwrapped frames. The
/// optional `accept` set constrains which values satisfy the reference.
#[derive(Clone, Debug)]
pub struct FieldRef {
    /// Field name at the declared depth.
    pub path: &'static str,
    /// Nesting depth (1 = top level, 2 = inside the payload).
    pub depth: u8,
    /// Value-acceptance set; any value passes when absent.
    pub accept: Option<&'static [&'static str]>,
}

impl FieldRef {
    const fn top(path: &'static str) -> Self {
        Self {
            path,
            depth: 1,
            accept: None,
        }
    }

    const fn nested(path: &'static str, accept: &'static [&'static str]) -> Self {
        Self {
            path,
            depth: 2,
            accept: Some(accept),
        }
    }

    /// Resolves this reference against a frame, stringifying numeric values.
    ///
    /// `default_topic` stands in for a missing `stream` field on single-topic
    /// connection contexts that omit the combined-stream wrapper.
    fn resolve(&self, json: &Value, default_topic: Option<&str>) -> Option<String> {
        let value = if self.depth >= 2 {
            json.get(DATA_FIELD).unwrap_or(json).get(self.path)
        } else {
            json.get(self.path)
        };

        let resolved = match value {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let resolved = match resolved {
            None if self.depth == 1 && self.path == STREAM_FIELD => {
                default_topic.map(ToOwned::to_owned)
            }
            other => other,
        };

        match (&resolved, self.accept) {
            (Some(v), Some(accept)) if !accept.contains(&v.as_str()) => None,
            _ => resolved,
        }
    }
}

/// A single dispatch-key evaluator.
///
/// `identify` receives the resolved field values in `field_refs` order.
#[derive(Clone, Debug)]
pub struct Evaluator {
    /// Precedence; lower numbers run (and win) first.
    pub priority: u8,
    /// When set, the evaluator's key is final the moment its fields are
    /// present, regardless of any other evaluator.
    pub force_if_found: bool,
    /// Fields that must all resolve for the evaluator to fire.
    pub field_refs: Vec<FieldRef>,
    identify: fn(&[String]) -> String,
}

impl Evaluator {
    fn resolve_fields(&self, json: &Value, default_topic: Option<&str>) -> Option<Vec<String>> {
        self.field_refs
            .iter()
            .map(|field| field.resolve(json, default_topic))
            .collect()
    }
}

/// Computes dispatch keys for one socket API.
///
/// Stateless and shareable; the user-event name set is injected at
/// construction so multiple exchange variants can coexist without
/// cross-contamination.
#[derive(Clone, Debug)]
pub struct MessageIdentifier {
    evaluators: Vec<Evaluator>,
}

impl MessageIdentifier {
    /// Creates an identifier with the standard evaluator chain for the given
    /// user-data event name set.
    #[must_use]
    pub fn new(user_events: &'static [&'static str]) -> Self {
        let evaluators = vec![
            Evaluator {
                priority: 1,
                force_if_found: false,
                field_refs: vec![
                    FieldRef::top(STREAM_FIELD),
                    FieldRef::nested(EVENT_TYPE_FIELD, user_events),
                ],
                identify: |fields| format!("{}{}", fields[0], fields[1]),
            },
            Evaluator {
                priority: 2,
                force_if_found: false,
                field_refs: vec![FieldRef::top(STREAM_FIELD)],
                identify: |fields| fields[0].clone(),
            },
            Evaluator {
                priority: 3,
                force_if_found: true,
                field_refs: vec![FieldRef::top(REQUEST_ID_FIELD)],
                identify: |fields| fields[0].clone(),
            },
        ];
        debug_assert!(evaluators.windows(2).all(|w| w[0].priority <= w[1].priority));
        Self { evaluators }
    }

    /// Identifier for the Futures socket API.
    #[must_use]
    pub fn futures() -> Self {
        Self::new(FUTURES_USER_STREAM_EVENTS)
    }

    /// Identifier for the Spot socket API.
    #[must_use]
    pub fn spot() -> Self {
        Self::new(SPOT_USER_STREAM_EVENTS)
    }

    /// Computes the dispatch key for a frame, `None` if no evaluator matches.
    #[must_use]
    pub fn identify(&self, json: &Value) -> Option<String> {
        self.identify_with_context(json, None)
    }

    /// Computes the dispatch key for a frame on a connection with an optional
    /// single-topic context.
    ///
    /// Evaluators run in ascending priority order and the first satisfiable
    /// one wins; a `force_if_found` evaluator returns unconditionally once its
    /// fields are confirmed present. Exactly one key (or none) is produced
    /// per frame.
    #[must_use]
    pub fn identify_with_context(&self, json: &Value, default_topic: Option<&str>) -> Option<String> {
        for evaluator in &self.evaluators {
            if let Some(fields) = evaluator.resolve_fields(json, default_topic) {
                return Some((evaluator.identify)(&fields));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn test_plain_stream_frame_identifies_as_stream_value() {
        let identifier = MessageIdentifier::futures();
        let frame = json!({
            "stream": "ethusdt@kline_1h",
            "data": {"e": "kline", "E": 1_700_000_000_000_i64, "s": "ETHUSDT"}
        });
        assert_eq!(
            identifier.identify(&frame).as_deref(),
            Some("ethusdt@kline_1h")
        );
    }

    #[rstest]
    #[case("ACCOUNT_UPDATE")]
    #[case("ORDER_TRADE_UPDATE")]
    #[case("ACCOUNT_CONFIG_UPDATE")]
    #[case("MARGIN_CALL")]
    #[case("listenKeyExpired")]
    fn test_user_event_concatenates_listen_key_and_event(#[case] event: &str) {
        let identifier = MessageIdentifier::futures();
        let frame = json!({
            "stream": "abc123",
            "data": {"e": event, "E": 1_700_000_000_001_i64}
        });
        assert_eq!(
            identifier.identify(&frame),
            Some(format!("abc123{event}"))
        );
    }

    #[rstest]
    fn test_user_event_outranks_plain_stream() {
        // Both evaluators technically match; the nested-event one must win.
        let identifier = MessageIdentifier::futures();
        let frame = json!({
            "stream": "abc123",
            "data": {"e": "ORDER_TRADE_UPDATE", "E": 1_700_000_000_001_i64, "o": {}}
        });
        assert_eq!(
            identifier.identify(&frame).as_deref(),
            Some("abc123ORDER_TRADE_UPDATE")
        );
    }

    #[rstest]
    fn test_unknown_nested_event_falls_through_to_stream() {
        let identifier = MessageIdentifier::futures();
        let frame = json!({
            "stream": "btcusdt@aggTrade",
            "data": {"e": "aggTrade", "s": "BTCUSDT"}
        });
        assert_eq!(
            identifier.identify(&frame).as_deref(),
            Some("btcusdt@aggTrade")
        );
    }

    #[rstest]
    fn test_request_id_frame_identifies_as_stringified_id() {
        let identifier = MessageIdentifier::futures();
        let frame = json!({"id": 7});
        assert_eq!(identifier.identify(&frame).as_deref(), Some("7"));
    }

    #[rstest]
    fn test_request_id_never_fires_when_stream_present() {
        let identifier = MessageIdentifier::futures();
        let frame = json!({"stream": "btcusdt@trade", "data": {"e": "trade"}, "id": 9});
        assert_eq!(identifier.identify(&frame).as_deref(), Some("btcusdt@trade"));
    }

    #[rstest]
    fn test_unidentifiable_frame_returns_none() {
        let identifier = MessageIdentifier::futures();
        let frame = json!({"code": -1121, "msg": "Invalid symbol."});
        assert!(identifier.identify(&frame).is_none());
    }

    #[rstest]
    fn test_spot_and_futures_event_sets_do_not_cross_contaminate() {
        let spot = MessageIdentifier::spot();
        let futures = MessageIdentifier::futures();
        let frame = json!({
            "stream": "key1",
            "data": {"e": "executionReport", "E": 1_700_000_000_002_i64}
        });
        assert_eq!(spot.identify(&frame).as_deref(), Some("key1executionReport"));
        // Futures does not know the spot event name; the plain stream wins.
        assert_eq!(futures.identify(&frame).as_deref(), Some("key1"));
    }

    #[rstest]
    fn test_unwrapped_user_frame_resolves_topic_from_context() {
        let identifier = MessageIdentifier::futures();
        let frame = json!({"e": "ORDER_TRADE_UPDATE", "E": 1_700_000_000_003_i64, "o": {}});
        assert!(identifier.identify(&frame).is_none());
        assert_eq!(
            identifier.identify_with_context(&frame, Some("abc123")),
            Some("abc123ORDER_TRADE_UPDATE".to_string())
        );
    }

    #[rstest]
    fn test_identify_is_pure_and_repeatable() {
        let identifier = MessageIdentifier::spot();
        let frame = json!({
            "stream": "btcusdt@depth",
            "data": {"e": "depthUpdate", "s": "BTCUSDT", "u": 42}
        });
        assert_eq!(identifier.identify(&frame), identifier.identify(&frame));
    }
}
