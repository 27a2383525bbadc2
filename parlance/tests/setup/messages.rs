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

use parlance::prelude::MessageKind;

/// The message vocabulary the integration tests speak: a tiny ping protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Volley {
    Ping,
    Pong,
    Reset,
}

impl fmt::Display for Volley {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Volley::Ping => write!(f, "PING"),
            Volley::Pong => write!(f, "PONG"),
            Volley::Reset => write!(f, "RESET"),
        }
    }
}

impl MessageKind for Volley {
    fn all() -> &'static [Self] {
        &[Volley::Ping, Volley::Pong, Volley::Reset]
    }
}
