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

//! Binance WebSocket client binding with multiplexed stream identification and dispatch.
//!
//! A single Binance WebSocket connection carries many logically distinct
//! subscriptions: public market-data topics plus one or more user-data event
//! streams sharing a single opaque listen key. This crate implements the
//! protocol machinery that decides, for every inbound frame, which locally
//! registered handler the frame belongs to:
//!
//! - [`websocket::envelope`] - combined-stream `{"stream": ..., "data": ...}`
//!   unwrapping with a single-topic fallback for unwrapped frames.
//! - [`websocket::identifier`] - priority-ordered evaluators producing a
//!   dispatch key from the fields of a raw frame.
//! - [`websocket::subscription`] - per-subscription topic ownership, typed
//!   handler routing, and the listen-key user-data multiplexing.
//! - [`websocket::dispatch`] - the per-connection dispatch loop, including
//!   request-ID acknowledgement correlation and event enrichment.
//! - [`websocket::control`] - SUBSCRIBE/UNSUBSCRIBE control frames with
//!   monotonically increasing request IDs.
//!
//! Per socket API, [`spot`] and [`futures`] provide the stream-name builders,
//! typed payload messages, and client orchestrators.
//!
//! ## Out of scope
//!
//! REST endpoints, request signing, automatic reconnection, and rate-limit
//! accounting belong to the surrounding client framework. Listen keys are
//! obtained via the REST API and passed in as opaque strings.

pub mod common;
pub mod config;
pub mod error;
pub mod futures;
pub mod spot;
pub mod websocket;

pub use config::BinanceWsClientConfig;
pub use error::{BinanceError, BinanceResult};
