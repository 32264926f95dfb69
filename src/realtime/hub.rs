// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Server-side fan-out: live websocket sessions register here and
//! events are published per account email. No buffering for offline
//! users; a user with no live connection simply misses the push and
//! reloads from the REST seed next time.

use crate::realtime::events::RealtimeEvent;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tokio::sync::mpsc;

pub struct PushHub {
    connections: RwLock<HashMap<u64, Connection>>,
    next_connection_id: AtomicU64,
}

struct Connection {
    email: String,
    sender: mpsc::UnboundedSender<RealtimeEvent>,
}

impl PushHub {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            next_connection_id: AtomicU64::new(1),
        }
    }

    pub fn register(&self, email: &str) -> (u64, mpsc::UnboundedReceiver<RealtimeEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection_id = self.next_connection_id.fetch_add(1, Ordering::SeqCst);
        let mut connections = match self.connections.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        connections.insert(
            connection_id,
            Connection {
                email: email.to_string(),
                sender,
            },
        );
        log::debug!(
            "Realtime connection {} registered for {} ({} live)",
            connection_id,
            email,
            connections.len()
        );
        (connection_id, receiver)
    }

    pub fn deregister(&self, connection_id: u64) {
        let mut connections = match self.connections.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if connections.remove(&connection_id).is_some() {
            log::debug!(
                "Realtime connection {} deregistered ({} live)",
                connection_id,
                connections.len()
            );
        }
    }

    /// Sends the event to every live connection of one account.
    /// Returns the number of connections reached; zero is normal when
    /// the user is offline.
    pub fn publish(&self, email: &str, event: RealtimeEvent) -> usize {
        let connections = match self.connections.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut delivered = 0;
        for connection in connections.values() {
            if connection.email == email && connection.sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn connection_count(&self) -> usize {
        let connections = match self.connections.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        connections.len()
    }
}

impl Default for PushHub {
    fn default() -> Self {
        Self::new()
    }
}
