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

//! Multiplexed WebSocket message identification and dispatch.
//!
//! One physical connection carries many logical subscriptions. The modules
//! here decide which locally registered handler an inbound frame belongs to:
//!
//! ```text
//! raw bytes -> envelope -> identifier -> dispatch -> subscription -> handler
//! ```
//!
//! Control frames flow the opposite way when a subscription is established or
//! torn down, correlated back by request ID.

pub mod control;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod identifier;
pub mod subscription;

pub use control::{BinanceWsRequest, BinanceWsResponse, RequestIdAllocator};
pub use dispatch::{ClockOffset, DispatchOutcome, DropReason, StreamDispatcher};
pub use envelope::StreamEnvelope;
pub use identifier::MessageIdentifier;
pub use subscription::{
    DispatchContext, StreamEvent, StreamPayload, Subscription, SubscriptionHandle,
    SubscriptionStatus, TopicRegistry, UserDataBuilder, UserDataHandler,
};
