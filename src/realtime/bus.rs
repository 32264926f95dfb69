// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Client-side event bus: one connection per session, named events
//! fanned out to subscribers in registration order. The bus owns the
//! handler registrations; the transport only carries bytes.

use crate::realtime::events::RealtimeEvent;
use crate::realtime::transport::{Transport, TransportError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

pub type EventHandler = Arc<dyn Fn(&RealtimeEvent) + Send + Sync>;

struct HandlerEntry {
    id: u64,
    handler: EventHandler,
}

struct BusInner {
    handlers: Mutex<HashMap<String, Vec<HandlerEntry>>>,
    next_handler_id: AtomicU64,
    session_token: Mutex<Option<String>>,
}

impl BusInner {
    fn lock_handlers(&self) -> MutexGuard<'_, HashMap<String, Vec<HandlerEntry>>> {
        match self.handlers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_token(&self) -> MutexGuard<'_, Option<String>> {
        match self.session_token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Explicitly constructed per session; there is no ambient singleton.
/// Build one at session start with the transport of your choice and
/// drop it (after `disconnect`) at session end.
pub struct EventBus {
    transport: Arc<dyn Transport>,
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            inner: Arc::new(BusInner {
                handlers: Mutex::new(HashMap::new()),
                next_handler_id: AtomicU64::new(1),
                session_token: Mutex::new(None),
            }),
        }
    }

    /// Idempotent: connecting again with the token of the live
    /// connection is a no-op. A different token tears the old
    /// connection down first.
    pub fn connect(&self, token: &str) -> Result<(), TransportError> {
        // The token lock is held across the whole sequence so two
        // concurrent connects cannot both miss the no-op check.
        let mut current = self.inner.lock_token();
        if self.transport.is_connected() && current.as_deref() == Some(token) {
            log::debug!("Realtime bus already connected; ignoring connect");
            return Ok(());
        }
        if self.transport.is_connected() {
            self.transport.disconnect();
        }
        self.transport.connect(token)?;
        *current = Some(token.to_string());
        Ok(())
    }

    /// Registers a handler for one event type. Handlers for the same
    /// type fire in registration order; the returned subscription
    /// removes exactly this handler and no other.
    pub fn on(
        &self,
        event_type: &str,
        handler: impl Fn(&RealtimeEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_handler_id.fetch_add(1, Ordering::SeqCst);
        let mut handlers = self.inner.lock_handlers();
        handlers
            .entry(event_type.to_string())
            .or_default()
            .push(HandlerEntry {
                id,
                handler: Arc::new(handler),
            });
        Subscription {
            inner: self.inner.clone(),
            event_type: event_type.to_string(),
            id,
        }
    }

    /// Fire-and-forget: no delivery confirmation is awaited and a
    /// failed send is only logged.
    pub fn emit(&self, event_type: &str, payload: Value) {
        if let Err(err) = self.transport.emit(event_type, payload) {
            log::warn!("Realtime emit '{}' failed: {}", event_type, err);
        }
    }

    /// Delivers one inbound event to its subscribers, in registration
    /// order. Called by the transport driver in transport-arrival
    /// order; the bus never reorders or coalesces.
    pub fn dispatch(&self, event: &RealtimeEvent) {
        let handlers: Vec<EventHandler> = {
            let registered = self.inner.lock_handlers();
            match registered.get(&event.event_type) {
                Some(entries) => entries.iter().map(|entry| entry.handler.clone()).collect(),
                None => return,
            }
        };
        for handler in handlers {
            handler(event);
        }
    }

    /// Tears the connection down and clears every handler
    /// registration; the bus owns the handlers, not the transport.
    pub fn disconnect(&self) {
        self.transport.disconnect();
        let mut handlers = self.inner.lock_handlers();
        handlers.clear();
        let mut current = self.inner.lock_token();
        *current = None;
    }

    /// Mirrors the transport flag. A `false` period means events may
    /// have been missed; there is no replay.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }
}

/// Capability to deregister exactly one handler.
pub struct Subscription {
    inner: Arc<BusInner>,
    event_type: String,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        let mut handlers = self.inner.lock_handlers();
        if let Some(entries) = handlers.get_mut(&self.event_type) {
            entries.retain(|entry| entry.id != self.id);
            if entries.is_empty() {
                handlers.remove(&self.event_type);
            }
        }
    }
}
