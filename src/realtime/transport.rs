// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    NotConnected,
    ConnectFailed,
    SendFailed,
}

#[derive(Debug, Clone)]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.message)
    }
}

impl Error for TransportError {}

/// The whole surface the event bus needs from a push connection:
/// connect with a credential, emit, tear down, and one connected flag.
/// Reconnection and backoff belong to the implementation behind this
/// trait, not to the bus.
pub trait Transport: Send + Sync {
    fn connect(&self, token: &str) -> Result<(), TransportError>;
    fn emit(&self, event_type: &str, payload: Value) -> Result<(), TransportError>;
    fn disconnect(&self);
    fn is_connected(&self) -> bool;
}

/// In-process transport: records every emit and counts connects.
/// Inbound events are injected by whoever drives the bus. Used by the
/// test suites and by embedders that bridge their own connection.
pub struct LoopbackTransport {
    connected: AtomicBool,
    connect_count: AtomicUsize,
    token: Mutex<Option<String>>,
    emitted: Mutex<Vec<(String, Value)>>,
    fail_emits: AtomicBool,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            connect_count: AtomicUsize::new(0),
            token: Mutex::new(None),
            emitted: Mutex::new(Vec::new()),
            fail_emits: AtomicBool::new(false),
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connect_count.load(Ordering::SeqCst)
    }

    pub fn emitted(&self) -> Vec<(String, Value)> {
        match self.emitted.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Makes subsequent emits fail, to exercise fire-and-forget paths.
    pub fn set_fail_emits(&self, fail: bool) {
        self.fail_emits.store(fail, Ordering::SeqCst);
    }

    pub fn current_token(&self) -> Option<String> {
        match self.token.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for LoopbackTransport {
    fn connect(&self, token: &str) -> Result<(), TransportError> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);
        let mut current = match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = Some(token.to_string());
        Ok(())
    }

    fn emit(&self, event_type: &str, payload: Value) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::new(
                TransportErrorKind::NotConnected,
                "Transport is not connected",
            ));
        }
        if self.fail_emits.load(Ordering::SeqCst) {
            return Err(TransportError::new(
                TransportErrorKind::SendFailed,
                "Emit failed",
            ));
        }
        let mut emitted = match self.emitted.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        emitted.push((event_type.to_string(), payload));
        Ok(())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        let mut current = match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = None;
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
