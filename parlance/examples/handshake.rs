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

//! A two-actor handshake driven through the router.
//!
//! `server` waits for SYN, half-opens with a 500 ms timeout reversion, and
//! completes on ACK. Run with `cargo run --example handshake`.

use std::fmt;
use std::time::Duration;

use tokio::time::sleep;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parlance::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Handshake {
    Syn,
    Ack,
}

impl fmt::Display for Handshake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handshake::Syn => write!(f, "SYN"),
            Handshake::Ack => write!(f, "ACK"),
        }
    }
}

impl MessageKind for Handshake {
    fn all() -> &'static [Self] {
        &[Handshake::Syn, Handshake::Ack]
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&CONFIG.tracing.default_level)),
        )
        .init();

    let listening = State::new("Listening")?;
    let half_open = State::new("HalfOpen")?;
    let established = State::new("Established")?;

    let server = Actor::with_state("server", listening.clone());
    let client = Actor::new("client");

    let protocol = Protocol::new();
    // SYN from anyone half-opens the connection; dwelling there 500 ms with
    // no ACK falls back to Listening.
    protocol.add_rule_with_timeout(
        &server,
        Handshake::Syn,
        &half_open,
        None,
        Duration::from_millis(500),
        &listening,
    )?;
    // only the client's ACK completes the handshake
    let server_half_open = Actor::with_state("server", half_open.clone());
    protocol.add_rule(&server_half_open, Handshake::Ack, &established, Some(&client))?;

    let router = ProtocolRouter::new(protocol);
    router.register(&server);
    router.register(&client);
    let handle = router.spawn();

    handle.deliver("server", Handshake::Syn, Some("client")).await?;
    sleep(Duration::from_millis(50)).await;
    info!(state = %server.current_state(), "after SYN");

    handle.deliver("server", Handshake::Ack, Some("client")).await?;
    sleep(Duration::from_millis(50)).await;
    info!(state = %server.current_state(), "after ACK");

    // a stray SYN now violates the protocol; the router logs and drops it
    handle.deliver("server", Handshake::Syn, Some("client")).await?;
    sleep(Duration::from_millis(50)).await;
    info!(state = %server.current_state(), "after stray SYN");

    handle.shutdown().await;
    Ok(())
}
