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
use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::protocol::ProtocolError;

/// The closed set of message kinds a protocol speaks.
///
/// Applications supply their own vocabulary as a plain fieldless enum:
///
/// ```
/// use std::fmt;
/// use parlance_core::prelude::MessageKind;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum Handshake {
///     Syn,
///     Ack,
/// }
///
/// impl fmt::Display for Handshake {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         match self {
///             Handshake::Syn => write!(f, "SYN"),
///             Handshake::Ack => write!(f, "ACK"),
///         }
///     }
/// }
///
/// impl MessageKind for Handshake {
///     fn all() -> &'static [Self] {
///         &[Handshake::Syn, Handshake::Ack]
///     }
/// }
///
/// assert_eq!(Handshake::parse("ACK"), Some(Handshake::Ack));
/// ```
pub trait MessageKind:
    Copy + Clone + Debug + Display + PartialEq + Eq + PartialOrd + Ord + Hash + Send + Sync + 'static
{
    /// Every kind in the set, in declaration order.
    fn all() -> &'static [Self];

    /// Parses the textual form produced by `Display`. `None` when the text
    /// names no kind in the set.
    fn parse(text: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.to_string() == text)
    }

    /// Like [`MessageKind::parse`], but unknown text is a protocol error.
    fn parse_required(text: &str) -> Result<Self, ProtocolError> {
        Self::parse(text).ok_or(ProtocolError::MessageTypeInvalid)
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Handshake {
        Syn,
        SynAck,
        Ack,
    }

    impl fmt::Display for Handshake {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Handshake::Syn => write!(f, "SYN"),
                Handshake::SynAck => write!(f, "SYN-ACK"),
                Handshake::Ack => write!(f, "ACK"),
            }
        }
    }

    impl MessageKind for Handshake {
        fn all() -> &'static [Self] {
            &[Handshake::Syn, Handshake::SynAck, Handshake::Ack]
        }
    }

    #[test]
    fn parse_round_trips_every_kind() {
        for kind in Handshake::all() {
            assert_eq!(Handshake::parse(&kind.to_string()), Some(*kind));
        }
    }

    #[test]
    fn unknown_text_is_a_typed_error() {
        assert_eq!(Handshake::parse("FIN"), None);
        assert!(matches!(
            Handshake::parse_required("FIN"),
            Err(ProtocolError::MessageTypeInvalid)
        ));
    }
}
