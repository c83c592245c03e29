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

//! Combined-stream envelope unwrapping.
//!
//! Every multiplexed frame on a combined connection shares one wire shape: an
//! outer wrapper carrying a topic tag (`stream`) and a nested, topic-typed
//! payload (`data`). Some single-topic connection contexts omit the wrapper
//! and deliver the payload directly; decoding falls back to parsing the whole
//! frame as the payload type in that case.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use super::error::{BinanceWsError, BinanceWsResult};

/// Field carrying the topic tag on a combined-stream frame.
pub const STREAM_FIELD: &str = "stream";

/// Field carrying the nested payload on a combined-stream frame.
pub const DATA_FIELD: &str = "data";

/// Combined-stream envelope `{"stream": ..., "data": ...}`.
#[derive(Clone, Debug, Deserialize)]
pub struct StreamEnvelope<T> {
    /// Topic tag, e.g. `btcusdt@aggTrade` or a user-data listen key.
    pub stream: String,
    /// Topic-typed payload.
    pub data: T,
}

/// Parses raw frame bytes into a JSON value.
///
/// # Errors
///
/// Returns [`BinanceWsError::Decode`] if the bytes are not valid JSON. The
/// caller drops and logs such frames; no handler is invoked and no retry
/// happens.
pub fn parse_frame(raw: &[u8]) -> BinanceWsResult<Value> {
    serde_json::from_slice(raw).map_err(|e| BinanceWsError::Decode(e.to_string()))
}

/// Splits a parsed frame into its topic tag and payload view.
///
/// Frames without a wrapper are their own payload.
#[must_use]
pub fn split_envelope(json: &Value) -> (Option<&str>, &Value) {
    match (json.get(STREAM_FIELD).and_then(Value::as_str), json.get(DATA_FIELD)) {
        (Some(stream), Some(data)) => (Some(stream), data),
        _ => (None, json),
    }
}

/// Decodes a payload view into the caller-declared type.
///
/// # Errors
///
/// Returns [`BinanceWsError::Decode`] if the payload does not match `T`'s
/// shape.
pub fn decode_payload<T: DeserializeOwned>(payload: &Value) -> BinanceWsResult<T> {
    serde_json::from_value(payload.clone()).map_err(|e| BinanceWsError::Decode(e.to_string()))
}

/// Decodes raw frame bytes into a topic tag and typed payload.
///
/// If the frame carries no `stream` field but otherwise matches `T`'s shape,
/// the whole frame parses as `T` directly and the topic is `None`.
///
/// # Errors
///
/// Returns [`BinanceWsError::Decode`] on malformed JSON or a payload that
/// matches neither shape.
pub fn decode_envelope<T: DeserializeOwned>(raw: &[u8]) -> BinanceWsResult<(Option<String>, T)> {
    let json = parse_frame(raw)?;
    let (topic, payload) = split_envelope(&json);
    let topic = topic.map(ToOwned::to_owned);
    Ok((topic, decode_payload(payload)?))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestPayload {
        #[serde(rename = "e")]
        event_type: String,
        #[serde(rename = "s")]
        symbol: String,
    }

    #[rstest]
    fn test_decode_wrapped_frame() {
        let raw = br#"{"stream":"btcusdt@trade","data":{"e":"trade","s":"BTCUSDT"}}"#;
        let (topic, payload) = decode_envelope::<TestPayload>(raw).unwrap();
        assert_eq!(topic.as_deref(), Some("btcusdt@trade"));
        assert_eq!(payload.symbol, "BTCUSDT");
    }

    #[rstest]
    fn test_decode_unwrapped_frame_falls_back_to_payload() {
        let raw = br#"{"e":"trade","s":"BTCUSDT"}"#;
        let (topic, payload) = decode_envelope::<TestPayload>(raw).unwrap();
        assert!(topic.is_none());
        assert_eq!(payload.event_type, "trade");
    }

    #[rstest]
    fn test_decode_malformed_json_errors() {
        let err = decode_envelope::<TestPayload>(b"{not json").unwrap_err();
        assert!(matches!(err, BinanceWsError::Decode(_)));
    }

    #[rstest]
    fn test_decode_shape_mismatch_errors() {
        let raw = br#"{"stream":"btcusdt@trade","data":{"unexpected":1}}"#;
        let err = decode_envelope::<TestPayload>(raw).unwrap_err();
        assert!(matches!(err, BinanceWsError::Decode(_)));
    }

    #[rstest]
    fn test_split_envelope_requires_both_fields() {
        let json: Value = serde_json::from_str(r#"{"stream":"x"}"#).unwrap();
        let (topic, payload) = split_envelope(&json);
        assert!(topic.is_none());
        assert_eq!(payload, &json);
    }

    #[rstest]
    fn test_decode_is_stateless_and_repeatable() {
        let raw = br#"{"stream":"ethusdt@trade","data":{"e":"trade","s":"ETHUSDT"}}"#;
        let first = decode_envelope::<TestPayload>(raw).unwrap();
        let second = decode_envelope::<TestPayload>(raw).unwrap();
        assert_eq!(first.1, second.1);
    }
}
