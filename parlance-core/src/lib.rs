/*
 * Copyright (c) 2025. Parlance Contributors
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

#![forbid(unsafe_code)]
//! Parlance Core Library
//!
//! The building blocks of the Parlance protocol engine: named states, actors,
//! typed messages, transition rules, and the rule-graph resolver that decides
//! which state an actor ends up in when a message of a given kind arrives from
//! a given (or any) sender.

/// Common value types shared throughout the engine.
pub(crate) mod common;

pub(crate) mod message;
pub(crate) mod protocol;
/// Trait definitions satisfied by application-supplied types.
pub(crate) mod traits;

/// Prelude module for convenient imports.
///
/// Re-exports the full public surface of the engine: value types, the
/// protocol resolver, and the traits applications implement to plug in
/// their own message vocabularies and payloads.
pub mod prelude {
    pub use crate::common::{Actor, State, VertexKey};
    pub use crate::message::{Endpoint, Message, Sender};
    pub use crate::protocol::{Protocol, ProtocolError, Rule, RuleBuilder};
    pub use crate::traits::{MessageKind, Payload, PayloadItem};
}
