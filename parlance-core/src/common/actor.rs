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
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use static_assertions::assert_impl_all;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::common::{ActorName, State};
use crate::protocol::Rule;
use crate::traits::MessageKind;

/// Sequence for auto-generated actor names.
static NEXT_INDEX: AtomicUsize = AtomicUsize::new(1);

/// A named protocol participant carrying a mutable current [`State`].
///
/// `Actor` is a cheap-to-clone handle: clones share the same underlying state
/// cell, so a handle kept by a router and a handle kept by application code
/// observe the same life-cycle position. The name is immutable once set;
/// [`Actor::apply`] is the sole mutation path for the state (the timeout
/// reversion inside the engine goes through the same guarded cell).
///
/// Equality, ordering, and hashing are by name alone — an actor is identified
/// by who it is, never by where it currently stands.
#[derive(Debug, Clone)]
pub struct Actor {
    name: ActorName,
    inner: Arc<ActorInner>,
}

#[derive(Debug)]
struct ActorInner {
    state: Mutex<State>,
    /// Cancellation token of the currently armed timeout reversion, if any.
    armed: Mutex<Option<CancellationToken>>,
}

impl Actor {
    /// Creates a named actor starting in [`State::undefined`].
    pub fn new(name: impl AsRef<str>) -> Self {
        Self::with_state(name, State::undefined())
    }

    /// Creates a named actor starting in the given state.
    pub fn with_state(name: impl AsRef<str>, state: State) -> Self {
        Actor {
            name: Arc::from(name.as_ref()),
            inner: Arc::new(ActorInner {
                state: Mutex::new(state),
                armed: Mutex::new(None),
            }),
        }
    }

    /// The actor's immutable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A snapshot of the actor's current state.
    pub fn current_state(&self) -> State {
        self.lock_state().clone()
    }

    /// Applies a transition rule to this actor.
    ///
    /// If the rule's precondition state equals the actor's current state and
    /// the rule declares a result state, the actor moves there; otherwise the
    /// actor is left untouched. Either way the state *prior* to the call is
    /// returned, so callers can tell whether the rule fired by comparing it
    /// with [`Actor::current_state`].
    ///
    /// A transition that fires also cancels any armed timeout reversion: the
    /// actor left the state the timer was watching.
    pub fn apply<K: MessageKind>(&self, rule: Option<&Rule<K>>) -> State {
        let mut state = self.lock_state();
        let prior = state.clone();
        if let Some(rule) = rule {
            if rule.precondition() == &*state {
                if let Some(next) = rule.result_state() {
                    *state = next.clone();
                    trace!(actor = %self.name, from = %prior, to = %next, "transition applied");
                    self.disarm();
                }
            }
        }
        prior
    }

    /// Arms a timeout reversion watching `watched`, cancelling any previously
    /// armed one. Refuses when the actor no longer stands in `watched`: a
    /// concurrent transition has already moved it on, the new timer is stale,
    /// and whatever that transition armed must survive. Check and swap happen
    /// under the state lock. Returns whether the token was armed.
    pub(crate) fn arm_if_in(&self, watched: &State, token: CancellationToken) -> bool {
        let state = self.lock_state();
        if &*state != watched {
            return false;
        }
        let mut armed = self.lock_armed();
        if let Some(previous) = armed.replace(token) {
            previous.cancel();
        }
        true
    }

    /// Moves the actor to `revert_to` iff it still stands in `entered`.
    ///
    /// This is the expiry half of a timeout reversion. The check and the move
    /// happen under the state lock, so a concurrent [`Actor::apply`] either
    /// wins (and the reversion is a no-op) or observes the reverted state.
    /// Returns whether the reversion fired.
    pub(crate) fn revert_if_still(&self, entered: &State, revert_to: &State) -> bool {
        let mut state = self.lock_state();
        if &*state != entered {
            trace!(actor = %self.name, "timeout expired after state moved on, nothing to revert");
            return false;
        }
        *state = revert_to.clone();
        trace!(actor = %self.name, from = %entered, to = %revert_to, "timeout reversion applied");
        self.disarm();
        true
    }

    fn disarm(&self) {
        if let Some(token) = self.lock_armed().take() {
            token.cancel();
        }
    }

    // Lock helpers recover from poisoning: a panicked holder cannot leave the
    // state cell half-written, the guarded value is always a whole State.
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_armed(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.inner.armed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn name_arc(&self) -> ActorName {
        self.name.clone()
    }
}

impl Default for Actor {
    /// An auto-named actor (`Actor1`, `Actor2`, ...) in [`State::undefined`].
    fn default() -> Self {
        let index = NEXT_INDEX.fetch_add(1, AtomicOrdering::Relaxed);
        Self::new(format!("Actor{index}"))
    }
}

impl PartialEq for Actor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Actor {}

impl Hash for Actor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Actor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Actor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        write!(f, "{}[{}]", self.name, *state)
    }
}

assert_impl_all!(Actor: Send, Sync);
