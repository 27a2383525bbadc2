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
//! # Parlance
//!
//! A protocol state-machine engine. Actors exist in named states, messages of
//! application-declared kinds are exchanged between them, and a directed rule
//! graph decides — deterministically — what state an actor transitions to
//! when a given kind of message arrives from a given (or any) sender.
//!
//! The engine itself lives in `parlance-core`; this crate adds the pieces a
//! deployment needs around it: configuration loaded from XDG-compliant TOML,
//! and [`common::ProtocolRouter`], an async task that drives a protocol from
//! an inbox of deliveries.
//!
//! ```no_run
//! use std::fmt;
//! use parlance::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! enum Volley {
//!     Ping,
//! }
//!
//! impl fmt::Display for Volley {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "PING")
//!     }
//! }
//!
//! impl MessageKind for Volley {
//!     fn all() -> &'static [Self] {
//!         &[Volley::Ping]
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let protocol = Protocol::new();
//! let alice = Actor::new("alice");
//! protocol.add_rule(&alice, Volley::Ping, &State::new("Pinged")?, None)?;
//! assert_eq!(
//!     protocol.get_result_state(&alice, Volley::Ping, None)?.name(),
//!     "Pinged"
//! );
//! # Ok(())
//! # }
//! ```

/// Deployment-facing pieces: configuration and the async router.
pub mod common;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use parlance_core::prelude::*;

    pub use crate::common::{Delivery, ParlanceConfig, ProtocolRouter, RouterHandle, CONFIG};
}
