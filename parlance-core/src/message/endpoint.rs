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
use std::sync::Arc;

use derive_new::new;

use crate::common::{Actor, ActorName, State};

/// One end of a message: an actor's name plus an optional snapshot of the
/// state it stood in when the message was built.
///
/// Endpoints compare, order, and hash by name alone. The state snapshot is
/// deliberately excluded from identity — a message must keep matching its
/// graph edge no matter how the referenced actor's live state has moved on
/// since. Template messages drop the sender snapshot entirely (see
/// [`crate::message::Message::template`]).
#[derive(new, Debug, Clone)]
pub struct Endpoint {
    name: ActorName,
    state: Option<State>,
}

impl Endpoint {
    /// Captures an actor by name together with its current state.
    pub fn of(actor: &Actor) -> Self {
        Endpoint::new(actor.name_arc(), Some(actor.current_state()))
    }

    /// Captures an actor by name only, with no state snapshot.
    pub fn bare(actor: &Actor) -> Self {
        Endpoint::new(actor.name_arc(), None)
    }

    /// The referenced actor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state snapshot taken at construction, if one was kept.
    pub fn state(&self) -> Option<&State> {
        self.state.as_ref()
    }

    pub(crate) fn name_arc(&self) -> ActorName {
        self.name.clone()
    }

    /// The same endpoint with its state snapshot dropped.
    pub(crate) fn stateless(&self) -> Self {
        Endpoint::new(self.name.clone(), None)
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Endpoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Endpoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => write!(f, "{}@{}", self.name, state),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The origin of a message or rule: a specific endpoint, or any sender at all.
///
/// `Any` is the wildcard the protocol uses for rules that fire regardless of
/// who sent the message. It orders before every concrete endpoint.
#[derive(Debug, Clone, Default)]
pub enum Sender {
    /// Matches a message from anyone.
    #[default]
    Any,
    /// Matches a message from one specific actor.
    Endpoint(Endpoint),
}

impl Sender {
    /// Wraps an optional actor reference, `None` meaning any sender.
    pub fn from_actor(actor: Option<&Actor>) -> Self {
        match actor {
            Some(actor) => Sender::Endpoint(Endpoint::of(actor)),
            None => Sender::Any,
        }
    }

    /// The sender's name, if it names a specific actor.
    pub fn name(&self) -> Option<&str> {
        match self {
            Sender::Any => None,
            Sender::Endpoint(endpoint) => Some(endpoint.name()),
        }
    }

    pub(crate) fn name_arc(&self) -> Option<Arc<str>> {
        match self {
            Sender::Any => None,
            Sender::Endpoint(endpoint) => Some(endpoint.name_arc()),
        }
    }

    /// The same sender with any endpoint state snapshot dropped.
    pub(crate) fn stateless(&self) -> Self {
        match self {
            Sender::Any => Sender::Any,
            Sender::Endpoint(endpoint) => Sender::Endpoint(endpoint.stateless()),
        }
    }
}

impl PartialEq for Sender {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Sender::Any, Sender::Any) => true,
            (Sender::Endpoint(a), Sender::Endpoint(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Sender {}

impl Hash for Sender {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Sender::Any => 0u8.hash(state),
            Sender::Endpoint(endpoint) => {
                1u8.hash(state);
                endpoint.hash(state);
            }
        }
    }
}

impl PartialOrd for Sender {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sender {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Sender::Any, Sender::Any) => Ordering::Equal,
            (Sender::Any, Sender::Endpoint(_)) => Ordering::Less,
            (Sender::Endpoint(_), Sender::Any) => Ordering::Greater,
            (Sender::Endpoint(a), Sender::Endpoint(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Any => write!(f, "*"),
            Sender::Endpoint(endpoint) => write!(f, "{endpoint}"),
        }
    }
}
