// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Stale-response suppression for filtered fetches. Each issued
//! request takes a ticket; only the ticket of the most recently issued
//! request may apply its result, so a slow earlier response can never
//! overwrite the state of a later one.

use std::sync::Mutex;
use std::time::Duration;

/// Client-side bound on any single fetch. Without it a dead request
/// leaves a spinner running forever.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

struct SlotState<T> {
    generation: u64,
    value: Option<T>,
}

pub struct LatestSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                generation: 0,
                value: None,
            }),
        }
    }

    /// Starts a new request generation, invalidating every ticket
    /// issued before.
    pub fn begin(&self) -> RequestTicket {
        let mut state = self.lock();
        state.generation += 1;
        RequestTicket {
            generation: state.generation,
        }
    }

    /// Applies a response only if its ticket is still the latest.
    /// Returns whether the value was stored.
    pub fn complete(&self, ticket: RequestTicket, value: T) -> bool {
        let mut state = self.lock();
        if ticket.generation != state.generation {
            log::debug!(
                "Dropping stale response (generation {} superseded by {})",
                ticket.generation,
                state.generation
            );
            return false;
        }
        state.value = Some(value);
        true
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.lock().generation == ticket.generation
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotState<T>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T: Clone> LatestSlot<T> {
    pub fn value(&self) -> Option<T> {
        self.lock().value.clone()
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Awaits a fetch under the standard client timeout; `None` means the
/// deadline passed and the caller should surface last-known state.
pub async fn fetch_with_timeout<F, T>(future: F) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    match tokio::time::timeout(REQUEST_TIMEOUT, future).await {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Fetch timed out after {}s", REQUEST_TIMEOUT.as_secs());
            None
        }
    }
}
