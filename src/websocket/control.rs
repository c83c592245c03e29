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

//! Control-frame construction and request-ID allocation.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::enums::BinanceWsMethod;

/// Allocator for control-frame request IDs.
///
/// IDs are monotonically increasing and never reused within a connection's
/// lifetime; the pending-request table uses them to match acknowledgement
/// frames back to the originating request.
#[derive(Debug)]
pub struct RequestIdAllocator {
    next: AtomicU64,
}

impl RequestIdAllocator {
    /// Creates a new allocator starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Returns the next request ID.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for RequestIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// WebSocket subscription control request.
#[derive(Debug, Clone, Serialize)]
pub struct BinanceWsRequest {
    /// Request method.
    pub method: BinanceWsMethod,
    /// Stream names the request applies to.
    pub params: Vec<String>,
    /// Request ID.
    pub id: u64,
}

impl BinanceWsRequest {
    /// Builds a SUBSCRIBE request.
    #[must_use]
    pub fn subscribe(params: Vec<String>, id: u64) -> Self {
        Self {
            method: BinanceWsMethod::Subscribe,
            params,
            id,
        }
    }

    /// Builds an UNSUBSCRIBE request.
    #[must_use]
    pub fn unsubscribe(params: Vec<String>, id: u64) -> Self {
        Self {
            method: BinanceWsMethod::Unsubscribe,
            params,
            id,
        }
    }
}

/// WebSocket subscription acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceWsResponse {
    /// Response result (null on success).
    pub result: Option<Value>,
    /// Request ID echoed back.
    pub id: u64,
}

/// WebSocket error response.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceWsErrorResponse {
    /// Error code.
    pub code: i64,
    /// Error message.
    pub msg: String,
    /// Request ID if the error relates to a request.
    pub id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_request_ids_increase_and_never_repeat() {
        let ids = RequestIdAllocator::new();
        let first = ids.next_id();
        let second = ids.next_id();
        let third = ids.next_id();
        assert!(first < second && second < third);
    }

    #[rstest]
    fn test_subscribe_frame_shape() {
        let request = BinanceWsRequest::subscribe(vec!["btcusdt@trade".to_string()], 7);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"method": "SUBSCRIBE", "params": ["btcusdt@trade"], "id": 7})
        );
    }

    #[rstest]
    fn test_unsubscribe_frame_shape() {
        let request = BinanceWsRequest::unsubscribe(vec!["btcusdt@trade".to_string()], 8);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"method": "UNSUBSCRIBE", "params": ["btcusdt@trade"], "id": 8})
        );
    }

    #[rstest]
    fn test_ack_deserializes_null_result_as_success() {
        let ack: BinanceWsResponse = serde_json::from_str(r#"{"result":null,"id":3}"#).unwrap();
        assert!(ack.result.is_none());
        assert_eq!(ack.id, 3);
    }
}
