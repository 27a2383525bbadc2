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
use std::fmt;

use derive_new::new;

use crate::common::{ActorName, State};

/// A vertex of the protocol graph: one (actor, state) pair.
///
/// The graph never stores live [`crate::common::Actor`] handles — a vertex is
/// a pure lookup key pairing an actor's name with a snapshot of one life-cycle
/// position, so the graph stays free of shared mutable state and pointer
/// cycles.
#[derive(new, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey {
    actor: ActorName,
    state: State,
}

impl VertexKey {
    /// Name of the actor this vertex belongs to.
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// The life-cycle position this vertex pins.
    pub fn state(&self) -> &State {
        &self.state
    }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.actor, self.state)
    }
}
