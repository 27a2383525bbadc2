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
use std::time::Duration;

use crate::common::{Actor, State};
use crate::message::Sender;
use crate::protocol::ProtocolError;
use crate::traits::MessageKind;

/// A declarative transition: when `to`, standing in `state`, receives a
/// message of `kind` from `from` (possibly anyone), it moves to
/// `result_state`.
///
/// Identity — equality, hashing, and the total order — is the *lookup key*
/// (sender, receiver, precondition state, kind). The result state and the
/// timeout are the outcome of a rule, never part of what it matches on, and
/// are excluded from both equality and hashing.
///
/// A rule may carry a timeout: if the receiver is still in `result_state`
/// once the timeout elapses, the engine reverts it to `timeout_state`. See
/// [`crate::protocol::Protocol::advance`].
#[derive(Debug, Clone)]
pub struct Rule<K: MessageKind> {
    from: Sender,
    to: Actor,
    state: State,
    kind: K,
    result_state: Option<State>,
    timeout: Option<Duration>,
    timeout_state: Option<State>,
}

impl<K: MessageKind> Rule<K> {
    /// Starts building a rule. All of sender, receiver, precondition state,
    /// and kind are mandatory; [`RuleBuilder::build`] enforces this.
    pub fn builder() -> RuleBuilder<K> {
        RuleBuilder::default()
    }

    /// Crate-internal shortcut used by the resolver when it already holds a
    /// validated lookup key.
    pub(crate) fn direct(
        from: Sender,
        to: Actor,
        state: State,
        kind: K,
        result_state: Option<State>,
    ) -> Self {
        Rule {
            from,
            to,
            state,
            kind,
            result_state,
            timeout: None,
            timeout_state: None,
        }
    }

    /// Who the message must come from; `Sender::Any` matches anyone.
    pub fn sender(&self) -> &Sender {
        &self.from
    }

    /// The actor this rule transitions.
    pub fn receiver(&self) -> &Actor {
        &self.to
    }

    /// The state the receiver must stand in for the rule to fire.
    pub fn precondition(&self) -> &State {
        &self.state
    }

    /// The message kind that triggers the rule.
    pub fn kind(&self) -> K {
        self.kind
    }

    /// Where the rule moves the receiver; `None` when no transition has been
    /// declared yet.
    pub fn result_state(&self) -> Option<&State> {
        self.result_state.as_ref()
    }

    /// How long the receiver may dwell in the result state before reverting.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Where the receiver reverts to when the timeout expires.
    pub fn timeout_state(&self) -> Option<&State> {
        self.timeout_state.as_ref()
    }
}

impl<K: MessageKind> PartialEq for Rule<K> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.state == other.state
            && self.kind == other.kind
    }
}

impl<K: MessageKind> Eq for Rule<K> {}

impl<K: MessageKind> Hash for Rule<K> {
    // Same fields as equality; outcome fields stay out of the hash too.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.state.hash(state);
        self.kind.hash(state);
    }
}

impl<K: MessageKind> PartialOrd for Rule<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: MessageKind> Ord for Rule<K> {
    /// Total order by receiver, then precondition state, then kind, then
    /// timeout.
    fn cmp(&self, other: &Self) -> Ordering {
        self.to
            .cmp(&other.to)
            .then_with(|| self.state.cmp(&other.state))
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.timeout.cmp(&other.timeout))
    }
}

impl<K: MessageKind> fmt::Display for Rule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} x {} from {} -> {}",
            self.to.name(),
            self.state,
            self.kind,
            self.from,
            self.result_state
                .as_ref()
                .map_or("?", |state| state.name()),
        )
    }
}

/// Builder for [`Rule`], validating the mandatory fields at [`RuleBuilder::build`].
#[derive(Debug, Clone)]
pub struct RuleBuilder<K: MessageKind> {
    from: Option<Sender>,
    to: Option<Actor>,
    state: Option<State>,
    kind: Option<K>,
    result_state: Option<State>,
    timeout: Option<Duration>,
    timeout_state: Option<State>,
}

impl<K: MessageKind> Default for RuleBuilder<K> {
    fn default() -> Self {
        RuleBuilder {
            from: None,
            to: None,
            state: None,
            kind: None,
            result_state: None,
            timeout: None,
            timeout_state: None,
        }
    }
}

impl<K: MessageKind> RuleBuilder<K> {
    /// Requires the message to come from one specific actor.
    pub fn from(mut self, actor: &Actor) -> Self {
        self.from = Some(Sender::from_actor(Some(actor)));
        self
    }

    /// Lets the message come from anyone.
    pub fn any_sender(mut self) -> Self {
        self.from = Some(Sender::Any);
        self
    }

    /// The actor the rule transitions.
    pub fn to(mut self, actor: &Actor) -> Self {
        self.to = Some(actor.clone());
        self
    }

    /// The precondition state.
    pub fn when_in(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }

    /// The triggering message kind.
    pub fn on(mut self, kind: K) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The result state.
    pub fn then(mut self, state: State) -> Self {
        self.result_state = Some(state);
        self
    }

    /// Reverts the receiver to `revert_to` if it dwells in the result state
    /// longer than `after`.
    pub fn with_timeout(mut self, after: Duration, revert_to: State) -> Self {
        self.timeout = Some(after);
        self.timeout_state = Some(revert_to);
        self
    }

    /// Validates and constructs the rule.
    ///
    /// # Errors
    /// [`ProtocolError::ProtocolInvalid`] if any of sender, receiver,
    /// precondition state, or kind is missing, or if a timeout was given on a
    /// rule with no result state to dwell in.
    pub fn build(self) -> Result<Rule<K>, ProtocolError> {
        let (Some(from), Some(to), Some(state), Some(kind)) =
            (self.from, self.to, self.state, self.kind)
        else {
            return Err(ProtocolError::ProtocolInvalid(
                "All fields in a Rule are mandatory".into(),
            ));
        };
        if self.timeout.is_some() && self.result_state.is_none() {
            return Err(ProtocolError::ProtocolInvalid(
                "a timed rule needs a result state to dwell in".into(),
            ));
        }
        Ok(Rule {
            from,
            to,
            state,
            kind,
            result_state: self.result_state,
            timeout: self.timeout,
            timeout_state: self.timeout_state,
        })
    }
}
