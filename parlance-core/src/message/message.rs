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
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::common::Actor;
use crate::message::{Endpoint, Sender};
use crate::protocol::ProtocolError;
use crate::traits::{MessageKind, PayloadItem};

/// A typed unit exchanged between two actors.
///
/// A message exists in two forms:
///
/// * **concrete** — a transport unit built with [`Message::new`], optionally
///   carrying an ordered payload of opaque values;
/// * **template** — a lookup key built with [`Message::template`], used by the
///   protocol to probe its rule graph. Templates never carry payload, and
///   their sender is normalized to a state-free endpoint so that equality
///   cannot depend on the sender's live, mutable state.
///
/// Equality and the total order consider (sender, receiver, kind) only —
/// endpoints by name — which is exactly the identity the rule graph keys its
/// edges by. Payload never participates.
#[derive(Debug, Clone)]
pub struct Message<K: MessageKind> {
    from: Sender,
    to: Endpoint,
    kind: K,
    payload: Vec<PayloadItem>,
    template: bool,
}

impl<K: MessageKind> Message<K> {
    /// Creates a concrete message.
    ///
    /// # Errors
    /// [`ProtocolError::ReceivingActorInvalid`] if the receiver's name is
    /// blank, [`ProtocolError::SendingActorInvalid`] if a sender is given and
    /// its name is blank.
    pub fn new(
        kind: K,
        from: Option<&Actor>,
        to: &Actor,
        payload: Vec<PayloadItem>,
    ) -> Result<Self, ProtocolError> {
        Self::build(kind, Sender::from_actor(from), to, payload, false)
    }

    /// Creates a template message: the graph-lookup form.
    ///
    /// Payload is not accepted and the sender endpoint is stripped of its
    /// state snapshot, so two templates naming the same sender are equal no
    /// matter what state that sender currently stands in.
    pub fn template(kind: K, to: &Actor, from: Option<&Actor>) -> Result<Self, ProtocolError> {
        Self::build(
            kind,
            Sender::from_actor(from).stateless(),
            to,
            Vec::new(),
            true,
        )
    }

    fn build(
        kind: K,
        from: Sender,
        to: &Actor,
        payload: Vec<PayloadItem>,
        template: bool,
    ) -> Result<Self, ProtocolError> {
        if to.name().trim().is_empty() {
            return Err(ProtocolError::ReceivingActorInvalid);
        }
        if matches!(from.name(), Some(name) if name.trim().is_empty()) {
            return Err(ProtocolError::SendingActorInvalid);
        }
        Ok(Message {
            from,
            to: Endpoint::of(to),
            kind,
            payload,
            template,
        })
    }

    /// The message's kind tag.
    pub fn kind(&self) -> K {
        self.kind
    }

    /// The sender, `Sender::Any` when unspecified.
    pub fn from(&self) -> &Sender {
        &self.from
    }

    /// The receiver endpoint.
    pub fn to(&self) -> &Endpoint {
        &self.to
    }

    /// True for the graph-lookup form.
    pub fn is_template(&self) -> bool {
        self.template
    }

    /// The ordered opaque payload; empty for templates.
    pub fn payload(&self) -> &[PayloadItem] {
        &self.payload
    }

    /// Replaces the payload of a concrete message.
    ///
    /// # Errors
    /// [`ProtocolError::MessageInvalid`] on a template — templates are pure
    /// lookup keys and never carry payload.
    pub fn set_payload(&mut self, payload: Vec<PayloadItem>) -> Result<(), ProtocolError> {
        if self.template {
            return Err(ProtocolError::MessageInvalid(
                "template messages carry no payload".into(),
            ));
        }
        self.payload = payload;
        Ok(())
    }
}

impl<K: MessageKind> PartialEq for Message<K> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.kind == other.kind
    }
}

impl<K: MessageKind> Eq for Message<K> {}

impl<K: MessageKind> Hash for Message<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.kind.hash(state);
    }
}

impl<K: MessageKind> PartialOrd for Message<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: MessageKind> Ord for Message<K> {
    /// Total order by sender, then receiver, then kind.
    fn cmp(&self, other: &Self) -> Ordering {
        self.from
            .cmp(&other.from)
            .then_with(|| self.to.cmp(&other.to))
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl<K: MessageKind> fmt::Display for Message<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.kind, self.to)
    }
}
