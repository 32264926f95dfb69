// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

pub mod ws;

use actix_web::{web, App, HttpServer};
use serde_json::json;
use squares::api;
use squares::app_state::AppState;
use squares::config::test_config;
use squares::iam::{User, UserStore};
use std::net::TcpListener;
use std::sync::Arc;

pub const SUPERADMIN_EMAIL: &str = "root@example.com";
pub const ADMIN_EMAIL: &str = "announcer@example.com";
pub const SUBADMIN_EMAIL: &str = "sub@example.com";
pub const ASSIGNED_EMAIL: &str = "assigned@example.com";
pub const AGENT_EMAIL: &str = "agent@example.com";
pub const CUSTOMER_EMAIL: &str = "customer@example.com";

fn user(email: &str, name: &str, role: &str, pages: &[&str], permissions: &[&str]) -> User {
    User {
        email: email.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        role_pages: pages.iter().map(|id| id.to_string()).collect(),
        role_permissions: permissions.iter().map(|id| id.to_string()).collect(),
    }
}

pub fn test_users() -> Vec<User> {
    vec![
        // Superadmin with a bogus assignment: the override must win.
        user(
            SUPERADMIN_EMAIL,
            "Root",
            "superadmin",
            &["vendor_billing"],
            &[],
        ),
        user(
            ADMIN_EMAIL,
            "Announcer",
            "subadmin",
            &[],
            &["send_announcements"],
        ),
        user(SUBADMIN_EMAIL, "Sub Admin", "subadmin", &[], &[]),
        user(
            ASSIGNED_EMAIL,
            "Assigned",
            "subadmin",
            &["support_tickets", "subadmin_dashboard", "support_tickets"],
            &[],
        ),
        user(AGENT_EMAIL, "Agent", "agent", &[], &[]),
        user(CUSTOMER_EMAIL, "Customer", "customer", &[], &[]),
    ]
}

pub fn build_state() -> web::Data<AppState> {
    let config = Arc::new(test_config());
    let user_store = Arc::new(UserStore::from_users(test_users()));
    web::Data::new(AppState::new(config, user_store))
}

pub async fn start_test_server(state: web::Data<AppState>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");

    actix_web::rt::spawn(async move {
        let _ = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(api::configure)
        })
        .workers(1)
        .listen(listener)
        .expect("listen")
        .run()
        .await;
    });

    format!("http://{}", addr)
}

pub async fn create_session(client: &awc::Client, base: &str, email: &str) -> String {
    let mut response = client
        .post(format!("{}/api/session", base))
        .send_json(&json!({ "email": email }))
        .await
        .expect("session request");
    let body: serde_json::Value = response.json().await.expect("session body");
    assert_eq!(body["success"], true, "session denied: {}", body);
    body["token"].as_str().expect("token").to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
