// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Session issue/teardown. Squares consumes identity, it does not own
//! it: the real credential check lives with the upstream auth service,
//! and this endpoint only exchanges a known account for an opaque
//! token.

use crate::api::session_token;
use crate::app_state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub email: String,
}

pub async fn create_session(
    state: web::Data<AppState>,
    body: web::Json<SessionRequest>,
) -> Result<HttpResponse> {
    let user = match state.user_store.find(&body.email) {
        Some(user) => user,
        None => {
            log::warn!("Session request for unknown account");
            return Ok(HttpResponse::Unauthorized().json(json!({
                "success": false,
                "message": "Unknown account"
            })));
        }
    };

    let token = state.sessions.issue(&user.email);
    log::info!("Session issued for {}", user.email);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "token": token,
        "email": user.email,
        "name": user.name,
        "role": user.role,
        "expires_in_seconds": state.sessions.expiry_seconds()
    })))
}

pub async fn end_session(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let token = match session_token(&req) {
        Some(token) => token,
        None => {
            return Ok(HttpResponse::Unauthorized().json(json!({
                "success": false,
                "message": "Authentication required"
            })));
        }
    };
    let revoked = state.sessions.revoke(&token);
    log::debug!("Session logout (revoked={})", revoked);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "revoked": revoked
    })))
}
