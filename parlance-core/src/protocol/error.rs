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

/// The closed taxonomy of protocol-engine failures.
///
/// Every variant except [`ProtocolError::NoSuchRule`] is a validation failure
/// raised synchronously at a construction boundary and surfaced to the caller
/// unchanged; nothing is retried or repaired. `NoSuchRule` is different in
/// kind: it is the expected, recoverable answer to "this message has no
/// registered transition", and callers are free to log it and move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A sending actor was named but the name is blank.
    SendingActorInvalid,
    /// The receiving actor's name is blank.
    ReceivingActorInvalid,
    /// Text did not name any kind in the protocol's closed message set.
    MessageTypeInvalid,
    /// A timed rule's reversion target is unusable (e.g. equal to the state
    /// the timer watches, which could never make progress).
    ResultStateInvalid,
    /// A state was given an empty name.
    StateNameInvalid,
    /// The protocol definition itself is inconsistent; the reason says how.
    ProtocolInvalid(String),
    /// A message was used in a way its form forbids; the reason says how.
    MessageInvalid(String),
    /// No registered transition matches the (actor, state, kind, sender)
    /// lookup. Recoverable by design.
    NoSuchRule {
        /// Receiving actor's name.
        actor: String,
        /// The state the actor stood in at lookup time.
        state: String,
        /// Textual form of the message kind.
        kind: String,
        /// The sender's name, `None` for an any-sender lookup.
        sender: Option<String>,
    },
}

impl ProtocolError {
    /// True for the recoverable no-matching-transition case.
    pub fn is_no_such_rule(&self) -> bool {
        matches!(self, ProtocolError::NoSuchRule { .. })
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProtocolError::SendingActorInvalid => write!(f, "Sending actor is invalid"),
            ProtocolError::ReceivingActorInvalid => write!(f, "Receiving actor is invalid"),
            ProtocolError::MessageTypeInvalid => write!(f, "Message type is invalid"),
            ProtocolError::ResultStateInvalid => write!(f, "Result state is invalid"),
            ProtocolError::StateNameInvalid => write!(f, "State name must not be empty"),
            ProtocolError::ProtocolInvalid(reason) => write!(f, "Protocol is invalid: {reason}"),
            ProtocolError::MessageInvalid(reason) => write!(f, "Message is invalid: {reason}"),
            ProtocolError::NoSuchRule {
                actor,
                state,
                kind,
                sender,
            } => match sender {
                Some(sender) => write!(
                    f,
                    "No rule for {actor} in state {state} receiving {kind} from {sender}"
                ),
                None => write!(
                    f,
                    "No rule for {actor} in state {state} receiving {kind} from anyone"
                ),
            },
        }
    }
}

impl std::error::Error for ProtocolError {}
