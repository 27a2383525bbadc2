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
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, trace};

use crate::common::{Actor, ActorName, State, VertexKey};
use crate::message::{Message, Sender};
use crate::protocol::{ProtocolError, Rule};
use crate::traits::MessageKind;

/// Identity of one edge of the rule graph: which vertex it leaves, on which
/// message kind, from which sender (`None` = the any-sender wildcard).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EdgeKey<K: MessageKind> {
    receiver: VertexKey,
    kind: K,
    sender: Option<ActorName>,
}

#[derive(Debug, Clone)]
struct TimeoutSpec {
    dwell: Duration,
    revert_to: State,
}

/// The protocol state machine: a directed graph whose vertices are
/// (actor, state) pairs and whose edges are message lookup keys.
///
/// Built incrementally with [`Protocol::add_rule`], queried with
/// [`Protocol::get_result_state`], driven with [`Protocol::advance`]. The
/// graph is append-only; vertices and edges are never removed.
///
/// All maps are concurrent: rule registration is expected at setup time and
/// lookups at runtime, possibly from many tasks at once, and neither blocks
/// the other beyond per-shard locking.
#[derive(Debug)]
pub struct Protocol<K: MessageKind> {
    vertices: DashMap<VertexKey, ()>,
    edges: DashMap<EdgeKey<K>, VertexKey>,
    /// Reverse transitions, keyed by the vertex the timer watches.
    timeouts: DashMap<VertexKey, TimeoutSpec>,
}

impl<K: MessageKind> Default for Protocol<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: MessageKind> Protocol<K> {
    /// Creates an empty protocol.
    pub fn new() -> Self {
        Protocol {
            vertices: DashMap::new(),
            edges: DashMap::new(),
            timeouts: DashMap::new(),
        }
    }

    /// Registers a transition: when `receiver`, standing in its *current*
    /// state, gets a message of `kind` from `sender` (anyone if `None`), it
    /// moves to `result_state`.
    ///
    /// Both the before and after vertices are added idempotently. Registering
    /// the exact same edge twice is a no-op; registering it with a different
    /// target is rejected — resolution must stay deterministic.
    ///
    /// # Errors
    /// [`ProtocolError::ReceivingActorInvalid`] /
    /// [`ProtocolError::SendingActorInvalid`] on blank actor names,
    /// [`ProtocolError::ProtocolInvalid`] on a conflicting re-registration.
    #[instrument(skip_all, fields(receiver = receiver.name(), kind = %kind))]
    pub fn add_rule(
        &self,
        receiver: &Actor,
        kind: K,
        result_state: &State,
        sender: Option<&Actor>,
    ) -> Result<(), ProtocolError> {
        self.register(receiver, kind, result_state, sender, None)
    }

    /// Like [`Protocol::add_rule`], but additionally registers a timeout
    /// reversion: if the receiver dwells in `result_state` longer than
    /// `timeout`, it reverts to `timeout_state`. The reversion is timer-driven,
    /// not message-triggered — it adds the revert-to vertex and a timeout spec,
    /// never an edge. The timer is armed by [`Protocol::advance`] whenever it
    /// moves an actor into `result_state`, and cancelled by any further
    /// transition of that actor.
    ///
    /// # Errors
    /// As [`Protocol::add_rule`], plus [`ProtocolError::ResultStateInvalid`]
    /// when `timeout_state` equals `result_state` — a reversion onto itself
    /// could never make progress.
    #[instrument(skip_all, fields(receiver = receiver.name(), kind = %kind))]
    pub fn add_rule_with_timeout(
        &self,
        receiver: &Actor,
        kind: K,
        result_state: &State,
        sender: Option<&Actor>,
        timeout: Duration,
        timeout_state: &State,
    ) -> Result<(), ProtocolError> {
        self.register(receiver, kind, result_state, sender, Some((timeout, timeout_state)))
    }

    fn register(
        &self,
        receiver: &Actor,
        kind: K,
        result_state: &State,
        sender: Option<&Actor>,
        timeout: Option<(Duration, &State)>,
    ) -> Result<(), ProtocolError> {
        if receiver.name().trim().is_empty() {
            return Err(ProtocolError::ReceivingActorInvalid);
        }
        if matches!(sender, Some(actor) if actor.name().trim().is_empty()) {
            return Err(ProtocolError::SendingActorInvalid);
        }
        if matches!(timeout, Some((_, revert_to)) if revert_to == result_state) {
            return Err(ProtocolError::ResultStateInvalid);
        }

        let before = VertexKey::new(receiver.name_arc(), receiver.current_state());
        let after = VertexKey::new(receiver.name_arc(), result_state.clone());
        self.vertices.insert(before.clone(), ());
        self.vertices.insert(after.clone(), ());

        let key = EdgeKey {
            receiver: before,
            kind,
            sender: sender.map(|actor| actor.name_arc()),
        };
        match self.edges.entry(key) {
            Entry::Occupied(existing) => {
                if existing.get() != &after {
                    return Err(ProtocolError::ProtocolInvalid(format!(
                        "rule for {} on {} already leads to {}",
                        existing.key().receiver,
                        kind,
                        existing.get().state(),
                    )));
                }
            }
            Entry::Vacant(slot) => {
                trace!(edge = %after, "edge registered");
                slot.insert(after.clone());
            }
        }

        if let Some((dwell, revert_to)) = timeout {
            self.vertices
                .insert(VertexKey::new(receiver.name_arc(), revert_to.clone()), ());
            self.timeouts.insert(
                after,
                TimeoutSpec {
                    dwell,
                    revert_to: revert_to.clone(),
                },
            );
            trace!(dwell = ?dwell, revert_to = %revert_to, "timeout reversion registered");
        }
        Ok(())
    }

    /// Resolves the state `receiver` would end up in when a message of `kind`
    /// arrives from `sender` (anyone if `None`), without touching the actor.
    ///
    /// The lookup probe is a template [`Message`], so the sender's live state
    /// cannot influence matching. A lookup naming a specific sender falls
    /// back to the any-sender edge when no exact edge exists.
    ///
    /// # Errors
    /// [`ProtocolError::NoSuchRule`] when no registered transition matches —
    /// an expected, recoverable answer, never a guessed state.
    #[instrument(skip_all, fields(receiver = receiver.name(), kind = %kind))]
    pub fn get_result_state(
        &self,
        receiver: &Actor,
        kind: K,
        sender: Option<&Actor>,
    ) -> Result<State, ProtocolError> {
        let probe = Message::template(kind, receiver, sender)?;
        self.resolve(&probe)
    }

    fn resolve(&self, probe: &Message<K>) -> Result<State, ProtocolError> {
        let current = probe
            .to()
            .state()
            .cloned()
            .unwrap_or_else(State::undefined);
        let vertex = VertexKey::new(probe.to().name_arc(), current);
        let sender = probe.from().name_arc();
        match self.lookup(&vertex, probe.kind(), sender.as_ref()) {
            // a dangling edge target would be a graph corruption; treat it the
            // same as no rule rather than answer from a missing vertex
            Some(target) if self.vertices.contains_key(&target) => Ok(target.state().clone()),
            _ => Err(ProtocolError::NoSuchRule {
                actor: vertex.actor().to_string(),
                state: vertex.state().name().to_string(),
                kind: probe.kind().to_string(),
                sender: sender.map(|name| name.to_string()),
            }),
        }
    }

    fn lookup(&self, vertex: &VertexKey, kind: K, sender: Option<&ActorName>) -> Option<VertexKey> {
        if let Some(name) = sender {
            let exact = EdgeKey {
                receiver: vertex.clone(),
                kind,
                sender: Some(name.clone()),
            };
            if let Some(target) = self.edges.get(&exact) {
                return Some(target.value().clone());
            }
            trace!(sender = %name, "no exact-sender edge, trying any-sender");
        }
        let wildcard = EdgeKey {
            receiver: vertex.clone(),
            kind,
            sender: None,
        };
        self.edges.get(&wildcard).map(|target| target.value().clone())
    }

    /// Resolves and *applies* a transition: the runtime path.
    ///
    /// On success the receiver has moved to the returned state, and if that
    /// state carries a registered timeout reversion a cancellable timer is
    /// armed: when it expires with the actor still there, the actor reverts
    /// exactly once; any interleaved transition cancels it first.
    ///
    /// Concurrent transitions of the same actor are safe: if the actor moves
    /// between resolution and application, resolution restarts from the new
    /// state, and a timer is armed only while the actor still stands in the
    /// state it watches — a racing transition's timer is never displaced by a
    /// stale one.
    ///
    /// # Errors
    /// As [`Protocol::get_result_state`]. A transition into a timed state
    /// additionally needs a running tokio runtime to arm its reversion;
    /// outside one it is rejected with [`ProtocolError::ProtocolInvalid`]
    /// before the actor moves. Protocols without timed rules never spawn
    /// anything.
    #[instrument(skip_all, fields(receiver = receiver.name(), kind = %kind))]
    pub fn advance(
        &self,
        receiver: &Actor,
        kind: K,
        sender: Option<&Actor>,
    ) -> Result<State, ProtocolError> {
        if receiver.name().trim().is_empty() {
            return Err(ProtocolError::ReceivingActorInvalid);
        }
        if matches!(sender, Some(actor) if actor.name().trim().is_empty()) {
            return Err(ProtocolError::SendingActorInvalid);
        }
        let sender_name = sender.map(|actor| actor.name_arc());
        loop {
            let current = receiver.current_state();
            let vertex = VertexKey::new(receiver.name_arc(), current.clone());
            let Some(target) = self.lookup(&vertex, kind, sender_name.as_ref()) else {
                return Err(ProtocolError::NoSuchRule {
                    actor: receiver.name().to_string(),
                    state: current.name().to_string(),
                    kind: kind.to_string(),
                    sender: sender_name.map(|name| name.to_string()),
                });
            };
            let next = target.state().clone();
            if self.timeouts.contains_key(&target)
                && tokio::runtime::Handle::try_current().is_err()
            {
                return Err(ProtocolError::ProtocolInvalid(
                    "a timed transition needs a running tokio runtime to arm its reversion".into(),
                ));
            }
            let rule = Rule::direct(
                Sender::from_actor(sender),
                receiver.clone(),
                current.clone(),
                kind,
                Some(next.clone()),
            );
            let prior = receiver.apply(Some(&rule));
            if prior == current {
                self.arm_timeout(receiver, &next);
                return Ok(next);
            }
            trace!(actor = %receiver.name(), "actor moved during transition, resolving again");
        }
    }

    /// Arms the reverse-transition timer for `entered`, if one is registered.
    fn arm_timeout(&self, receiver: &Actor, entered: &State) {
        let key = VertexKey::new(receiver.name_arc(), entered.clone());
        let Some(spec) = self.timeouts.get(&key) else {
            return;
        };
        let dwell = spec.dwell;
        let revert_to = spec.revert_to.clone();
        drop(spec);

        let token = CancellationToken::new();
        if !receiver.arm_if_in(entered, token.clone()) {
            trace!(actor = %receiver.name(), state = %entered, "actor moved on before the timer was armed");
            return;
        }
        let actor = receiver.clone();
        let entered = entered.clone();
        trace!(actor = %actor.name(), state = %entered, dwell = ?dwell, "timeout reversion armed");
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    trace!(actor = %actor.name(), "timeout reversion cancelled");
                }
                _ = tokio::time::sleep(dwell) => {
                    actor.revert_if_still(&entered, &revert_to);
                }
            }
        });
    }

    /// Number of (actor, state) vertices registered so far.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of transitions registered so far.
    pub fn rule_count(&self) -> usize {
        self.edges.len()
    }

    /// True until the first rule is registered.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
