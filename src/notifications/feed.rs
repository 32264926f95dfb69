// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Client-local notification cache. Never the source of truth: it is
//! seeded once per session from the REST initial load and then updated
//! from push events. Mark-as-read is optimistic; the server receipt is
//! a separate, best-effort step.

use crate::notifications::{NotificationItem, ReadState, NOTIFICATION_RETENTION};
use crate::realtime::events::{NotificationPush, RealtimeEvent};
use std::collections::VecDeque;

/// What a local mark-read did. `AppliedLocally` tells the caller the
/// flip is visible now and a read receipt should be emitted; it does
/// NOT mean the server knows yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    AppliedLocally,
    AlreadyRead,
    NotFound,
}

pub struct NotificationFeed {
    // Newest first; eviction pops from the back.
    items: VecDeque<NotificationItem>,
    retention: usize,
    seeded: bool,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::with_retention(NOTIFICATION_RETENTION)
    }

    pub fn with_retention(retention: usize) -> Self {
        Self {
            items: VecDeque::new(),
            retention: retention.max(1),
            seeded: false,
        }
    }

    /// Applies the REST initial load. Only the first seed of a session
    /// wins; later calls are ignored so a re-render cannot clobber
    /// push-delivered items.
    pub fn seed(&mut self, items: Vec<NotificationItem>) -> bool {
        if self.seeded {
            log::debug!("Ignoring repeated notification seed");
            return false;
        }
        self.seeded = true;
        // The REST snapshot is newest first; insert oldest first so the
        // deque keeps newest at the front and eviction still drops the
        // oldest.
        for item in items.into_iter().rev() {
            self.insert(item);
        }
        true
    }

    /// Folds one push event into the cache. Non-notification events
    /// and duplicates of an already-known id are ignored.
    pub fn ingest(&mut self, event: &RealtimeEvent) -> bool {
        let push = match NotificationPush::from_event(event) {
            Some(push) => push,
            None => return false,
        };
        if self.items.iter().any(|item| item.id == push.id) {
            return false;
        }
        let mut item = NotificationItem::new(push.id, push.title, push.message, push.kind);
        item.received_at = event.timestamp;
        item.data = push.data;
        self.insert(item);
        true
    }

    /// Synchronous, optimistic flip. The caller is responsible for the
    /// follow-up receipt emit when this returns `AppliedLocally`; the
    /// flip is never rolled back if that emit fails.
    pub fn mark_read(&mut self, id: &str) -> MarkReadOutcome {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => match item.state {
                ReadState::Unread => {
                    item.state = ReadState::ReadLocal;
                    MarkReadOutcome::AppliedLocally
                }
                ReadState::ReadLocal | ReadState::ReadConfirmed => MarkReadOutcome::AlreadyRead,
            },
            None => MarkReadOutcome::NotFound,
        }
    }

    /// Upgrades a local flip once the server echoes the receipt.
    pub fn confirm_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) if item.state == ReadState::ReadLocal => {
                item.state = ReadState::ReadConfirmed;
                true
            }
            _ => false,
        }
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_read()).count()
    }

    /// Most recent `count` items, newest first, for the compact view.
    pub fn recent(&self, count: usize) -> Vec<&NotificationItem> {
        self.items.iter().take(count).collect()
    }

    pub fn items(&self) -> impl Iterator<Item = &NotificationItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Logout: drop everything, allow a fresh seed.
    pub fn clear(&mut self) {
        self.items.clear();
        self.seeded = false;
    }

    fn insert(&mut self, item: NotificationItem) {
        self.items.push_front(item);
        while self.items.len() > self.retention {
            self.items.pop_back();
        }
    }
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationKind;
    use crate::realtime::events::{NotificationPush, EVENT_ACTIVITY};
    use serde_json::json;

    fn push_event(id: &str) -> RealtimeEvent {
        NotificationPush {
            id: id.to_string(),
            title: format!("Title {}", id),
            message: "message".to_string(),
            kind: NotificationKind::Info,
            data: None,
        }
        .into_event()
    }

    #[test]
    fn mark_read_is_synchronous_and_idempotent() {
        let mut feed = NotificationFeed::new();
        feed.ingest(&push_event("n-1"));
        assert_eq!(feed.unread_count(), 1);

        assert_eq!(feed.mark_read("n-1"), MarkReadOutcome::AppliedLocally);
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(feed.mark_read("n-1"), MarkReadOutcome::AlreadyRead);
        assert_eq!(feed.mark_read("n-404"), MarkReadOutcome::NotFound);
    }

    #[test]
    fn confirm_upgrades_only_local_reads() {
        let mut feed = NotificationFeed::new();
        feed.ingest(&push_event("n-1"));
        assert!(!feed.confirm_read("n-1"));

        feed.mark_read("n-1");
        assert!(feed.confirm_read("n-1"));
        assert!(!feed.confirm_read("n-1"));
        let item = feed.recent(1)[0];
        assert_eq!(item.state, ReadState::ReadConfirmed);
    }

    #[test]
    fn retention_evicts_oldest_first() {
        let mut feed = NotificationFeed::with_retention(3);
        for index in 0..5 {
            feed.ingest(&push_event(&format!("n-{}", index)));
        }
        assert_eq!(feed.len(), 3);
        let ids: Vec<&str> = feed.items().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["n-4", "n-3", "n-2"]);
    }

    #[test]
    fn recent_serves_the_compact_view_newest_first() {
        let mut feed = NotificationFeed::new();
        for index in 0..5 {
            feed.ingest(&push_event(&format!("n-{}", index)));
        }
        let ids: Vec<&str> = feed.recent(3).iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["n-4", "n-3", "n-2"]);
    }

    fn seed_item(id: &str) -> NotificationItem {
        NotificationItem::new(id, format!("Title {}", id), "seeded", NotificationKind::Info)
    }

    #[test]
    fn seed_preserves_newest_first_order() {
        let mut feed = NotificationFeed::new();
        // Snapshot shape: newest first.
        feed.seed(vec![seed_item("n-3"), seed_item("n-2"), seed_item("n-1")]);
        let ids: Vec<&str> = feed.items().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["n-3", "n-2", "n-1"]);
        let recent: Vec<&str> = feed.recent(2).iter().map(|item| item.id.as_str()).collect();
        assert_eq!(recent, vec!["n-3", "n-2"]);
    }

    #[test]
    fn eviction_after_seed_drops_the_oldest_item() {
        let mut feed = NotificationFeed::with_retention(3);
        feed.seed(vec![seed_item("n-3"), seed_item("n-2"), seed_item("n-1")]);

        feed.ingest(&push_event("n-4"));
        let ids: Vec<&str> = feed.items().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["n-4", "n-3", "n-2"]);
    }

    #[test]
    fn seed_applies_once_per_session() {
        let mut feed = NotificationFeed::new();
        assert!(feed.seed(vec![NotificationItem::new(
            "n-1",
            "Seeded",
            "from rest",
            NotificationKind::System,
        )]));
        assert!(!feed.seed(vec![NotificationItem::new(
            "n-2",
            "Late",
            "ignored",
            NotificationKind::System,
        )]));
        assert_eq!(feed.len(), 1);

        feed.clear();
        assert!(feed.is_empty());
        assert!(feed.seed(Vec::new()));
    }

    #[test]
    fn ingest_skips_duplicates_and_foreign_events() {
        let mut feed = NotificationFeed::new();
        assert!(feed.ingest(&push_event("n-1")));
        assert!(!feed.ingest(&push_event("n-1")));
        assert!(!feed.ingest(&RealtimeEvent::new(EVENT_ACTIVITY, json!({"id": "n-2"}))));
        assert_eq!(feed.len(), 1);
    }
}
