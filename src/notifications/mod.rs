// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Notification records and the two places they live: the server-side
//! per-account store (durable record, REST seed source) and the
//! client-side feed derived from push events.

pub mod feed;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use feed::{MarkReadOutcome, NotificationFeed};
pub use store::NotificationStore;

/// Uniform retention bound for notification lists. The compact UI
/// surfaces the most recent three; nothing anywhere keeps more than
/// this many.
pub const NOTIFICATION_RETENTION: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Message,
    Property,
    Ticket,
    Billing,
    System,
}

/// Read lifecycle is one-way. `ReadLocal` means the flip happened on
/// the client only; `ReadConfirmed` means the server has the receipt.
/// There is no transition back to unread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadState {
    Unread,
    ReadLocal,
    ReadConfirmed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationItem {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub state: ReadState,
    pub received_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl NotificationItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message: message.into(),
            kind,
            state: ReadState::Unread,
            received_at: Utc::now(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_read(&self) -> bool {
        self.state != ReadState::Unread
    }
}
