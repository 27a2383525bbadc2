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

/// A timed rule reverts the actor once the dwell time expires with no
/// further transition.
///
/// **Scenario:**
/// 1. `alice` moves to `Pinged` on PING, with a 50 ms reversion to `Idle`.
/// 2. Nothing else happens.
///
/// **Verification:** after comfortably more than 50 ms, `alice` stands in
/// `Idle` again.
#[tokio::test]
async fn timeout_reverts_an_idle_actor() -> anyhow::Result<()> {
    initialize_tracing();

    let protocol = Protocol::new();
    let idle = State::new("Idle")?;
    let pinged = State::new("Pinged")?;
    let alice = Actor::with_state("alice", idle.clone());

    protocol.add_rule_with_timeout(
        &alice,
        Volley::Ping,
        &pinged,
        None,
        Duration::from_millis(50),
        &idle,
    )?;

    assert_eq!(protocol.advance(&alice, Volley::Ping, None)?, pinged);
    assert_eq!(alice.current_state(), pinged);

    sleep(Duration::from_millis(250)).await;
    assert_eq!(alice.current_state(), idle);
    Ok(())
}

/// A transition before expiry cancels the armed reversion: the timer must
/// fire at most once and only if the actor truly dwelled.
///
/// **Scenario:**
/// 1. `alice` moves to `Pinged` on PING with a 200 ms reversion to `Idle`.
/// 2. Well within the dwell time, PONG moves her on to `Answered`.
///
/// **Verification:** long after the original timer would have expired,
/// `alice` still stands in `Answered`.
#[tokio::test]
async fn transition_cancels_the_pending_reversion() -> anyhow::Result<()> {
    initialize_tracing();

    let protocol = Protocol::new();
    let idle = State::new("Idle")?;
    let pinged = State::new("Pinged")?;
    let answered = State::new("Answered")?;
    let alice = Actor::with_state("alice", idle.clone());

    protocol.add_rule_with_timeout(
        &alice,
        Volley::Ping,
        &pinged,
        None,
        Duration::from_millis(200),
        &idle,
    )?;
    let alice_pinged = Actor::with_state("alice", pinged.clone());
    protocol.add_rule(&alice_pinged, Volley::Pong, &answered, None)?;

    protocol.advance(&alice, Volley::Ping, None)?;
    sleep(Duration::from_millis(20)).await;
    assert_eq!(protocol.advance(&alice, Volley::Pong, None)?, answered);

    sleep(Duration::from_millis(400)).await;
    assert_eq!(alice.current_state(), answered);
    Ok(())
}

/// Back-to-back timed transitions leave the latest timer in charge: the
/// timer armed for `Pinged` goes stale the moment PONG moves `alice` on, and
/// only the `Answered` timer fires.
#[tokio::test]
async fn chained_timed_transitions_keep_the_latest_timer() -> anyhow::Result<()> {
    initialize_tracing();

    let protocol = Protocol::new();
    let idle = State::new("Idle")?;
    let pinged = State::new("Pinged")?;
    let answered = State::new("Answered")?;
    let alice = Actor::with_state("alice", idle.clone());

    protocol.add_rule_with_timeout(
        &alice,
        Volley::Ping,
        &pinged,
        None,
        Duration::from_millis(500),
        &idle,
    )?;
    let alice_pinged = Actor::with_state("alice", pinged.clone());
    protocol.add_rule_with_timeout(
        &alice_pinged,
        Volley::Pong,
        &answered,
        None,
        Duration::from_millis(50),
        &pinged,
    )?;

    protocol.advance(&alice, Volley::Ping, None)?;
    protocol.advance(&alice, Volley::Pong, None)?;

    sleep(Duration::from_millis(250)).await;
    // the Answered timer reverted her; reversions arm nothing further, so the
    // long Pinged timer never runs
    assert_eq!(alice.current_state(), pinged);
    Ok(())
}

/// Reversion re-enables the original rule: after reverting to `Idle` the
/// actor can be pinged again.
#[tokio::test]
async fn reverted_actor_accepts_the_rule_again() -> anyhow::Result<()> {
    initialize_tracing();

    let protocol = Protocol::new();
    let idle = State::new("Idle")?;
    let pinged = State::new("Pinged")?;
    let alice = Actor::with_state("alice", idle.clone());

    protocol.add_rule_with_timeout(
        &alice,
        Volley::Ping,
        &pinged,
        None,
        Duration::from_millis(30),
        &idle,
    )?;

    protocol.advance(&alice, Volley::Ping, None)?;
    sleep(Duration::from_millis(200)).await;
    assert_eq!(alice.current_state(), idle);

    assert_eq!(protocol.advance(&alice, Volley::Ping, None)?, pinged);
    Ok(())
}
