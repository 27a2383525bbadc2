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

//! Internal type aliases shared across the engine.

use std::sync::Arc;

/// Crate-internal: an actor's immutable name. Shared, never mutated, so a
/// cheap `Arc<str>` is used everywhere a name travels between structures.
pub(crate) type ActorName = Arc<str>;
