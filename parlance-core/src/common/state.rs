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
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::Arc;

use lazy_static::lazy_static;
use static_assertions::assert_impl_all;

use crate::protocol::ProtocolError;

/// Sequence for the informational state id. Identity is the name; the id only
/// records construction order within a process.
static NEXT_ID: AtomicI64 = AtomicI64::new(0);

lazy_static! {
    static ref UNDEFINED: State = State {
        name: Arc::from("UNDEFINED"),
        id: State::UNDEFINED_ID,
    };
}

/// An immutable, named position in an actor's life-cycle.
///
/// Two states are equal iff their names match, case-sensitively. The numeric
/// id is assigned monotonically at construction and carries no identity; the
/// distinguished [`State::undefined`] singleton reserves id `-1`.
///
/// `State` is a value type: cloning shares the name allocation, and a state is
/// never mutated after construction.
#[derive(Debug, Clone)]
pub struct State {
    name: Arc<str>,
    id: i64,
}

impl State {
    /// Reserved id of the UNDEFINED singleton.
    const UNDEFINED_ID: i64 = -1;

    /// Creates a named state.
    ///
    /// # Errors
    /// Returns [`ProtocolError::StateNameInvalid`] if `name` is empty.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ProtocolError> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(ProtocolError::StateNameInvalid);
        }
        Ok(State {
            name: Arc::from(name),
            id: NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed),
        })
    }

    /// The distinguished state of an actor whose life-cycle position is not
    /// (yet) known. Every [`crate::common::Actor`] starts here unless
    /// constructed with an explicit state.
    pub fn undefined() -> State {
        UNDEFINED.clone()
    }

    /// True iff this is the UNDEFINED singleton.
    pub fn is_undefined(&self) -> bool {
        self.id == Self::UNDEFINED_ID
    }

    /// The state's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Construction-order id; `-1` for the UNDEFINED singleton.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        self.name.clone()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

assert_impl_all!(State: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_name() -> anyhow::Result<()> {
        let a = State::new("Ready")?;
        let b = State::new("Ready")?;
        let c = State::new("Busy")?;
        assert_eq!(a, b);
        assert_ne!(a, c);
        // ids differ even when names match
        assert_ne!(a.id(), b.id());
        Ok(())
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            State::new(""),
            Err(ProtocolError::StateNameInvalid)
        ));
    }

    #[test]
    fn undefined_is_distinguished() -> anyhow::Result<()> {
        assert!(State::undefined().is_undefined());
        assert_eq!(State::undefined().id(), -1);
        // a state merely *named* UNDEFINED is equal by name but not the singleton
        let imposter = State::new("UNDEFINED")?;
        assert_eq!(imposter, State::undefined());
        assert!(!imposter.is_undefined());
        Ok(())
    }

    #[test]
    fn ordering_is_by_name() -> anyhow::Result<()> {
        let mut states = vec![State::new("b")?, State::new("a")?, State::new("c")?];
        states.sort();
        let names: Vec<_> = states.iter().map(State::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        Ok(())
    }
}
