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

#![allow(dead_code)]

use std::time::Duration;

use tokio::time::sleep;

use parlance::prelude::*;

use crate::setup::{initialize_tracing, messages::Volley};
mod setup;

fn ping_pong_protocol(alice: &Actor) -> anyhow::Result<Protocol<Volley>> {
    let protocol = Protocol::new();
    let pinged = State::new("Pinged")?;
    let answered = State::new("Answered")?;
    protocol.add_rule(alice, Volley::Ping, &pinged, None)?;
    let alice_pinged = Actor::with_state(alice.name(), pinged);
    protocol.add_rule(&alice_pinged, Volley::Pong, &answered, None)?;
    Ok(protocol)
}

/// Deliveries fed through the handle advance the registered actor.
#[tokio::test]
async fn deliveries_advance_registered_actors() -> anyhow::Result<()> {
    initialize_tracing();

    let alice = Actor::new("alice");
    let router = ProtocolRouter::new(ping_pong_protocol(&alice)?);
    router.register(&alice);
    let handle = router.spawn();

    handle.deliver("alice", Volley::Ping, Some("bob")).await?;
    handle.deliver("alice", Volley::Pong, Some("bob")).await?;
    sleep(Duration::from_millis(100)).await;

    assert_eq!(alice.current_state().name(), "Answered");
    handle.shutdown().await;
    Ok(())
}

/// A delivery with no matching rule is dropped without disturbing the actor,
/// and the router keeps serving afterwards.
#[tokio::test]
async fn protocol_violations_are_tolerated() -> anyhow::Result<()> {
    initialize_tracing();

    let alice = Actor::new("alice");
    let router = ProtocolRouter::new(ping_pong_protocol(&alice)?);
    router.register(&alice);
    let handle = router.spawn();

    // PONG is not valid from UNDEFINED; RESET is not valid anywhere
    handle.deliver("alice", Volley::Pong, None).await?;
    handle.deliver("alice", Volley::Reset, None).await?;
    sleep(Duration::from_millis(50)).await;
    assert!(alice.current_state().is_undefined());

    handle.deliver("alice", Volley::Ping, None).await?;
    sleep(Duration::from_millis(50)).await;
    assert_eq!(alice.current_state().name(), "Pinged");

    handle.shutdown().await;
    Ok(())
}

/// Deliveries for actors the router has never seen are dropped, not errors.
#[tokio::test]
async fn unregistered_receivers_are_dropped() -> anyhow::Result<()> {
    initialize_tracing();

    let alice = Actor::new("alice");
    let router = ProtocolRouter::new(ping_pong_protocol(&alice)?);
    // alice deliberately not registered
    let handle = router.spawn();

    handle.deliver("alice", Volley::Ping, None).await?;
    sleep(Duration::from_millis(50)).await;
    assert!(alice.current_state().is_undefined());

    handle.shutdown().await;
    Ok(())
}

/// After shutdown the inbox is closed and further deliveries fail.
#[tokio::test]
async fn shutdown_closes_the_inbox() -> anyhow::Result<()> {
    initialize_tracing();

    let alice = Actor::new("alice");
    let router = ProtocolRouter::new(ping_pong_protocol(&alice)?);
    router.register(&alice);
    let handle = router.spawn();

    handle.shutdown().await;
    assert!(handle.deliver("alice", Volley::Ping, None).await.is_err());
    Ok(())
}
