// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::notifications::{NotificationItem, ReadState, NOTIFICATION_RETENTION};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Server-side per-account notification record. This is what the REST
/// seed endpoint serves; the same retention bound applies as on the
/// client so the two views cannot drift apart in size.
pub struct NotificationStore {
    accounts: Mutex<HashMap<String, VecDeque<NotificationItem>>>,
    retention: usize,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::with_retention(NOTIFICATION_RETENTION)
    }

    pub fn with_retention(retention: usize) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            retention: retention.max(1),
        }
    }

    /// Records a notification for an account and returns the stored
    /// item, ready to be published to live connections.
    pub fn record(&self, email: &str, item: NotificationItem) -> NotificationItem {
        let mut accounts = self.lock();
        let list = accounts.entry(email.to_string()).or_default();
        list.push_front(item.clone());
        while list.len() > self.retention {
            list.pop_back();
        }
        item
    }

    /// Durable mark-read. The server record goes straight to
    /// `ReadConfirmed`; the local/confirmed split only exists on the
    /// client.
    pub fn mark_read(&self, email: &str, id: &str) -> bool {
        let mut accounts = self.lock();
        let list = match accounts.get_mut(email) {
            Some(list) => list,
            None => return false,
        };
        match list.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.state = ReadState::ReadConfirmed;
                true
            }
            None => false,
        }
    }

    /// Snapshot for the REST seed, newest first.
    pub fn snapshot(&self, email: &str) -> Vec<NotificationItem> {
        let accounts = self.lock();
        accounts
            .get(email)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn unread_count(&self, email: &str) -> usize {
        let accounts = self.lock();
        accounts
            .get(email)
            .map(|list| list.iter().filter(|item| !item.is_read()).count())
            .unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, VecDeque<NotificationItem>>> {
        match self.accounts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}
