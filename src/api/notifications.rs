// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::api::session_user;
use crate::app_state::AppState;
use crate::notifications::{NotificationItem, NotificationKind};
use crate::permissions::{has_permission, Permission};
use crate::realtime::events::NotificationPush;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// Initial-load seed for the client feed. Served once per session by
/// convention; afterwards the client relies on push events.
pub async fn list_notifications(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let user = match session_user(&req, &state) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(json!({
                "success": false,
                "message": "Authentication required"
            })));
        }
    };

    let notifications = state.notifications.snapshot(&user.email);
    let unread = state.notifications.unread_count(&user.email);
    // compact_count tells the client how many items its compact view
    // shows; the feed passes it to `recent`.
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "notifications": notifications,
            "unread": unread,
            "compact_count": state.config.notifications.compact_count
        }
    })))
}

/// Durable mark-read, the REST counterpart of the websocket emit.
pub async fn mark_read(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = match session_user(&req, &state) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(json!({
                "success": false,
                "message": "Authentication required"
            })));
        }
    };

    let id = path.into_inner();
    if state.notifications.mark_read(&user.email, &id) {
        Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "id": id
        })))
    } else {
        Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "Notification not found"
        })))
    }
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub email: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Admin announcement: records the notification for the target account
/// and pushes it to that account's live connections.
pub async fn publish(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PublishRequest>,
) -> Result<HttpResponse> {
    let user = match session_user(&req, &state) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(json!({
                "success": false,
                "message": "Authentication required"
            })));
        }
    };

    if !has_permission(&user, Permission::SendAnnouncements) {
        log::warn!("{} attempted to publish without permission", user.email);
        return Ok(HttpResponse::Forbidden().json(json!({
            "success": false,
            "message": "Missing permission"
        })));
    }

    if state.user_store.find(&body.email).is_none() {
        return Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "Target account not found"
        })));
    }

    let body = body.into_inner();
    let mut item = NotificationItem::new(
        Uuid::new_v4().to_string(),
        body.title,
        body.message,
        body.kind,
    );
    if let Some(data) = body.data {
        item = item.with_data(data);
    }
    let item = state.notifications.record(&body.email, item);

    let push = NotificationPush {
        id: item.id.clone(),
        title: item.title.clone(),
        message: item.message.clone(),
        kind: item.kind,
        data: item.data.clone(),
    };
    let delivered = state.hub.publish(&body.email, push.into_event());
    log::info!(
        "Notification {} published to {} ({} live connections)",
        item.id,
        body.email,
        delivered
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "id": item.id,
        "delivered": delivered
    })))
}
