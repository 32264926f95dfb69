// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Server-to-client event names.
pub const EVENT_NOTIFICATION: &str = "notification";
pub const EVENT_NEW_MESSAGE: &str = "new_message";
pub const EVENT_ACTIVITY: &str = "activity";
pub const EVENT_NOTIFICATION_READ_CONFIRMED: &str = "notification_read_confirmed";

// Client-to-server event names.
pub const EVENT_MARK_NOTIFICATION_READ: &str = "mark_notification_read";

/// One push event. Transient: created on receipt, handed to the
/// subscribed handlers once, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeEvent {
    pub event_type: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl RealtimeEvent {
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
            timestamp: Utc::now(),
        }
    }
}

/// Payload of an `EVENT_NOTIFICATION` push.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPush {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: crate::notifications::NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl NotificationPush {
    pub fn from_event(event: &RealtimeEvent) -> Option<NotificationPush> {
        if event.event_type != EVENT_NOTIFICATION {
            return None;
        }
        match serde_json::from_value(event.payload.clone()) {
            Ok(push) => Some(push),
            Err(err) => {
                log::warn!("Discarding malformed notification push: {}", err);
                None
            }
        }
    }

    pub fn into_event(self) -> RealtimeEvent {
        let payload = serde_json::to_value(&self).unwrap_or(Value::Null);
        RealtimeEvent::new(EVENT_NOTIFICATION, payload)
    }
}

/// Payload of the fire-and-forget read receipt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkReadPayload {
    pub notification_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationKind;
    use serde_json::json;

    #[test]
    fn notification_push_round_trips_through_event() {
        let push = NotificationPush {
            id: "n-1".to_string(),
            title: "New lead".to_string(),
            message: "A customer enquired about Oak House".to_string(),
            kind: NotificationKind::Property,
            data: Some(json!({"property_id": "p-42"})),
        };
        let event = push.clone().into_event();
        assert_eq!(event.event_type, EVENT_NOTIFICATION);
        assert_eq!(NotificationPush::from_event(&event), Some(push));
    }

    #[test]
    fn from_event_rejects_other_event_types() {
        let event = RealtimeEvent::new(EVENT_ACTIVITY, json!({"id": "n-1"}));
        assert!(NotificationPush::from_event(&event).is_none());
    }

    #[test]
    fn from_event_discards_malformed_payload() {
        let event = RealtimeEvent::new(EVENT_NOTIFICATION, json!({"nope": true}));
        assert!(NotificationPush::from_event(&event).is_none());
    }
}
