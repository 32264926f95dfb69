// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! REST surface. Every response is JSON with a `success` flag; the
//! notification seed keeps the `{ success, data }` envelope clients of
//! the previous backend already parse.

pub mod navigation;
pub mod notifications;
pub mod session;

use crate::app_state::AppState;
use crate::iam::User;
use actix_web::{web, HttpRequest};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/session", web::post().to(session::create_session))
        .route("/api/session/logout", web::post().to(session::end_session))
        .route("/api/navigation", web::get().to(navigation::navigation))
        .route(
            "/api/notifications",
            web::get().to(notifications::list_notifications),
        )
        .route(
            "/api/notifications/{id}/read",
            web::post().to(notifications::mark_read),
        )
        .route(
            "/api/notifications/publish",
            web::post().to(notifications::publish),
        )
        .route("/ws", web::get().to(crate::realtime::ws::realtime_ws));
}

pub(crate) fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(header) = req.headers().get("Authorization") {
        let value = header.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        return Some(token.trim().to_string());
    }
    req.headers()
        .get("X-Session-Token")
        .and_then(|header| header.to_str().ok())
        .map(|token| token.trim().to_string())
}

pub(crate) fn session_user(req: &HttpRequest, state: &AppState) -> Option<User> {
    let token = session_token(req)?;
    let email = state.sessions.resolve(&token)?;
    state.user_store.find(&email)
}
