// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::api::session_user;
use crate::app_state::AppState;
use crate::pages::resolver::resolve_pages;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde_json::json;

/// Resolved navigation for the session user. The resolver decides
/// (superadmin override, explicit assignment in registry order, or the
/// role-category fallback); this handler only serializes.
pub async fn navigation(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let user = match session_user(&req, &state) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(json!({
                "success": false,
                "message": "Authentication required"
            })));
        }
    };

    let pages = resolve_pages(Some(&user));
    log::debug!(
        "Navigation resolved for {} ({} pages)",
        user.email,
        pages.len()
    );
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "role": user.role,
        "pages": pages
    })))
}
