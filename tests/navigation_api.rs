// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use common::{
    bearer, build_state, create_session, start_test_server, AGENT_EMAIL, ASSIGNED_EMAIL,
    SUBADMIN_EMAIL, SUPERADMIN_EMAIL,
};
use squares::pages::pages_by_category;
use squares::roles::RoleCategory;

async fn fetch_page_ids(client: &awc::Client, base: &str, token: &str) -> Vec<String> {
    let mut response = client
        .get(format!("{}/api/navigation", base))
        .insert_header(bearer(token))
        .send()
        .await
        .expect("navigation request");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("navigation body");
    assert_eq!(body["success"], true);
    body["pages"]
        .as_array()
        .expect("pages array")
        .iter()
        .map(|page| page["id"].as_str().expect("page id").to_string())
        .collect()
}

#[actix_web::test]
async fn superadmin_gets_all_admin_pages_despite_assignment() {
    let base = start_test_server(build_state()).await;
    let client = awc::Client::new();
    let token = create_session(&client, &base, SUPERADMIN_EMAIL).await;

    let ids = fetch_page_ids(&client, &base, &token).await;
    let expected: Vec<String> = pages_by_category(RoleCategory::Admin)
        .iter()
        .map(|page| page.id.to_string())
        .collect();
    assert_eq!(ids, expected);
}

#[actix_web::test]
async fn explicit_assignment_comes_back_in_registry_order_without_duplicates() {
    let base = start_test_server(build_state()).await;
    let client = awc::Client::new();
    let token = create_session(&client, &base, ASSIGNED_EMAIL).await;

    // Assignment lists support_tickets first and twice; the registry
    // declares subadmin_dashboard first.
    let ids = fetch_page_ids(&client, &base, &token).await;
    assert_eq!(ids, vec!["subadmin_dashboard", "support_tickets"]);
}

#[actix_web::test]
async fn unassigned_subadmin_falls_back_to_category() {
    let base = start_test_server(build_state()).await;
    let client = awc::Client::new();
    let token = create_session(&client, &base, SUBADMIN_EMAIL).await;

    let ids = fetch_page_ids(&client, &base, &token).await;
    assert_eq!(
        ids,
        vec![
            "subadmin_dashboard",
            "property_reviews",
            "property_rejections",
            "support_tickets",
            "vendor_performance",
            "addon_services",
            "notifications",
            "reports",
            "subadmin_privacy_policy",
            "subadmin_refund_policy",
        ]
    );
}

#[actix_web::test]
async fn agent_fallback_equals_vendor_category() {
    let base = start_test_server(build_state()).await;
    let client = awc::Client::new();
    let token = create_session(&client, &base, AGENT_EMAIL).await;

    let ids = fetch_page_ids(&client, &base, &token).await;
    let expected: Vec<String> = pages_by_category(RoleCategory::Vendor)
        .iter()
        .map(|page| page.id.to_string())
        .collect();
    assert_eq!(ids, expected);
}

#[actix_web::test]
async fn navigation_requires_a_session() {
    let base = start_test_server(build_state()).await;
    let client = awc::Client::new();

    let response = client
        .get(format!("{}/api/navigation", base))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/api/navigation", base))
        .insert_header(bearer("not-a-token"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 401);
}

#[actix_web::test]
async fn logout_revokes_the_session() {
    let base = start_test_server(build_state()).await;
    let client = awc::Client::new();
    let token = create_session(&client, &base, AGENT_EMAIL).await;

    let response = client
        .post(format!("{}/api/session/logout", base))
        .insert_header(bearer(&token))
        .send()
        .await
        .expect("logout");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/api/navigation", base))
        .insert_header(bearer(&token))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 401);
}
