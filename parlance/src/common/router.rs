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
use std::sync::Arc;

use anyhow::anyhow;
use dashmap::DashMap;
use parlance_core::prelude::{Actor, MessageKind, Protocol};
use tokio::sync::mpsc::{channel, Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, instrument, trace, warn};

use crate::common::CONFIG;

/// One incoming protocol event: `to` received a message of `kind` from
/// `from` (anyone, if `None`). Actors are referenced by name — the router
/// owns the live handles.
#[derive(Debug, Clone)]
pub struct Delivery<K: MessageKind> {
    /// Name of the receiving actor.
    pub to: String,
    /// Kind of the received message.
    pub kind: K,
    /// Name of the sending actor, `None` when unknown or irrelevant.
    pub from: Option<String>,
}

/// Drives a [`Protocol`] from an inbox of [`Delivery`] events.
///
/// The router owns the registry of live actor handles and runs as a single
/// tokio task: each delivery is resolved and applied via
/// [`Protocol::advance`], so per-actor transitions are serialized through the
/// router while the protocol graph itself stays shared and lock-light.
///
/// A delivery with no matching rule is a protocol violation by the remote
/// peer, not a router failure: it is logged at `warn` and dropped.
#[derive(Debug)]
pub struct ProtocolRouter<K: MessageKind> {
    protocol: Arc<Protocol<K>>,
    actors: Arc<DashMap<String, Actor>>,
    inbox: Receiver<Delivery<K>>,
    handle: RouterHandle<K>,
}

/// Cheap-to-clone handle for feeding and stopping a spawned
/// [`ProtocolRouter`].
#[derive(Debug, Clone)]
pub struct RouterHandle<K: MessageKind> {
    outbox: Sender<Delivery<K>>,
    cancellation_token: CancellationToken,
    tracker: TaskTracker,
}

impl<K: MessageKind> ProtocolRouter<K> {
    /// Creates a router over `protocol` with an inbox sized from
    /// [`CONFIG`](crate::common::CONFIG).
    pub fn new(protocol: Protocol<K>) -> Self {
        let (outbox, inbox) = channel(CONFIG.limits.router_inbox_capacity);
        ProtocolRouter {
            protocol: Arc::new(protocol),
            actors: Arc::new(DashMap::new()),
            inbox,
            handle: RouterHandle {
                outbox,
                cancellation_token: CancellationToken::new(),
                tracker: TaskTracker::new(),
            },
        }
    }

    /// The shared protocol graph, for registering further rules or resolving
    /// states out-of-band.
    pub fn protocol(&self) -> Arc<Protocol<K>> {
        self.protocol.clone()
    }

    /// Registers a live actor handle with the router. Deliveries name actors;
    /// unregistered receivers are logged and dropped.
    pub fn register(&self, actor: &Actor) {
        self.actors.insert(actor.name().to_string(), actor.clone());
    }

    /// Looks up a registered actor by name.
    pub fn actor(&self, name: &str) -> Option<Actor> {
        self.actors.get(name).map(|entry| entry.value().clone())
    }

    /// A handle for feeding the router once spawned.
    pub fn handle(&self) -> RouterHandle<K> {
        self.handle.clone()
    }

    /// Consumes the router and runs it as a tokio task, returning the handle.
    pub fn spawn(self) -> RouterHandle<K> {
        let handle = self.handle.clone();
        let _ = handle.tracker.spawn(self.run());
        handle.tracker.close();
        handle
    }

    #[instrument(skip(self))]
    async fn run(mut self) {
        let cancel_token = self.handle.cancellation_token.clone();
        let mut cancel = Box::pin(cancel_token.cancelled());

        loop {
            tokio::select! {
                // React immediately to cancellation
                _ = &mut cancel => {
                    trace!("cancellation token triggered for router");
                    break;
                }
                incoming = self.inbox.recv() => {
                    let Some(delivery) = incoming else { break; };
                    self.dispatch(delivery);
                }
            }
        }
    }

    fn dispatch(&self, delivery: Delivery<K>) {
        let Some(receiver) = self.actor(&delivery.to) else {
            warn!(to = %delivery.to, kind = %delivery.kind, "delivery for unregistered actor dropped");
            return;
        };
        // an unregistered sender still participates by name; sender identity
        // is all the lookup needs
        let sender = delivery
            .from
            .as_deref()
            .map(|name| self.actor(name).unwrap_or_else(|| Actor::new(name)));

        match self
            .protocol
            .advance(&receiver, delivery.kind, sender.as_ref())
        {
            Ok(next) => {
                trace!(actor = %receiver.name(), kind = %delivery.kind, state = %next, "delivery advanced actor");
            }
            Err(err) if err.is_no_such_rule() => {
                warn!(%err, "delivery violates the protocol, dropped");
            }
            Err(err) => {
                error!(%err, "delivery failed");
            }
        }
    }
}

impl<K: MessageKind> RouterHandle<K> {
    /// Queues a delivery for the router.
    ///
    /// # Errors
    /// When the router has shut down and its inbox is closed.
    pub async fn deliver(
        &self,
        to: impl Into<String>,
        kind: K,
        from: Option<&str>,
    ) -> anyhow::Result<()> {
        self.outbox
            .send(Delivery {
                to: to.into(),
                kind,
                from: from.map(str::to_string),
            })
            .await
            .map_err(|_| anyhow!("router inbox closed"))
    }

    /// Stops the router and waits for it to finish, up to the configured
    /// shutdown timeout.
    pub async fn shutdown(&self) {
        self.cancellation_token.cancel();
        if tokio::time::timeout(CONFIG.router_shutdown_timeout(), self.tracker.wait())
            .await
            .is_err()
        {
            warn!(
                "router did not stop within {} ms",
                CONFIG.timeouts.router_shutdown_timeout_ms
            );
        }
    }
}
