// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Navigation resolution: from a user's role and claims to the pages
//! they may see. Pure, never fails; everything malformed degrades to
//! the fallback path or an empty set.

use crate::iam::User;
use crate::pages::{pages_by_category, pages_by_ids, PageDescriptor};
use crate::roles::{fallback_category, is_superadmin, RoleCategory};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

/// Priority order, first match wins:
/// 1. superadmin gets every admin page, ignoring any assignment;
/// 2. an explicit non-empty page list is honored (registry order);
/// 3. otherwise the legacy role-name table picks a whole category.
pub fn resolve_pages(user: Option<&User>) -> Vec<&'static PageDescriptor> {
    let user = match user {
        Some(user) => user,
        None => return Vec::new(),
    };

    if is_superadmin(&user.role) {
        return pages_by_category(RoleCategory::Admin);
    }

    if !user.role_pages.is_empty() {
        return pages_by_ids(&user.role_pages);
    }

    match fallback_category(&user.role) {
        Some(category) => pages_by_category(category),
        None => Vec::new(),
    }
}

fn identity_fingerprint(user: &User) -> u64 {
    let mut hasher = DefaultHasher::new();
    user.email.hash(&mut hasher);
    user.role.hash(&mut hasher);
    user.role_pages.hash(&mut hasher);
    hasher.finish()
}

/// Memoizes the last resolution so the navigation set is recomputed
/// only when the user identity actually changes, not on every render
/// of a sidebar.
pub struct NavigationCache {
    cached: Mutex<Option<(u64, Vec<&'static PageDescriptor>)>>,
}

impl NavigationCache {
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
        }
    }

    pub fn pages_for(&self, user: Option<&User>) -> Vec<&'static PageDescriptor> {
        let user = match user {
            Some(user) => user,
            None => return Vec::new(),
        };
        let fingerprint = identity_fingerprint(user);
        let mut cached = match self.cached.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some((cached_fingerprint, pages)) = cached.as_ref() {
            if *cached_fingerprint == fingerprint {
                return pages.clone();
            }
        }
        let pages = resolve_pages(Some(user));
        *cached = Some((fingerprint, pages.clone()));
        pages
    }

    pub fn invalidate(&self) {
        let mut cached = match self.cached.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cached = None;
    }
}

impl Default for NavigationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, role_pages: &[&str]) -> User {
        User {
            email: format!("{}@example.com", role),
            name: role.to_string(),
            role: role.to_string(),
            role_pages: role_pages.iter().map(|id| id.to_string()).collect(),
            role_permissions: Vec::new(),
        }
    }

    fn ids(pages: &[&'static PageDescriptor]) -> Vec<&'static str> {
        pages.iter().map(|descriptor| descriptor.id).collect()
    }

    #[test]
    fn superadmin_override_ignores_assignment() {
        let assigned = user("superadmin", &["vendor_billing", "customer_home"]);
        let unassigned = user("superadmin", &[]);
        let expected = ids(&pages_by_category(RoleCategory::Admin));
        assert_eq!(ids(&resolve_pages(Some(&assigned))), expected);
        assert_eq!(ids(&resolve_pages(Some(&unassigned))), expected);
    }

    #[test]
    fn explicit_assignment_resolves_in_registry_order() {
        let assigned = user("subadmin", &["support_tickets", "subadmin_dashboard"]);
        assert_eq!(
            ids(&resolve_pages(Some(&assigned))),
            vec!["subadmin_dashboard", "support_tickets"]
        );
    }

    #[test]
    fn agent_falls_back_to_vendor_category() {
        let agent = user("agent", &[]);
        assert_eq!(
            ids(&resolve_pages(Some(&agent))),
            ids(&pages_by_category(RoleCategory::Vendor))
        );
    }

    #[test]
    fn subadmin_fallback_matches_category_listing() {
        let subadmin = user("subadmin", &[]);
        assert_eq!(
            ids(&resolve_pages(Some(&subadmin))),
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

    #[test]
    fn unknown_role_and_missing_user_resolve_empty() {
        assert!(resolve_pages(None).is_empty());
        assert!(resolve_pages(Some(&user("auditor", &[]))).is_empty());
    }

    #[test]
    fn stale_page_ids_are_dropped_silently() {
        let assigned = user("subadmin", &["support_tickets", "page_deleted_long_ago"]);
        assert_eq!(ids(&resolve_pages(Some(&assigned))), vec!["support_tickets"]);
    }

    #[test]
    fn cache_recomputes_only_on_identity_change() {
        let cache = NavigationCache::new();
        let agent = user("agent", &[]);
        let first = cache.pages_for(Some(&agent));
        let second = cache.pages_for(Some(&agent));
        assert_eq!(ids(&first), ids(&second));

        let promoted = user("superadmin", &[]);
        let third = cache.pages_for(Some(&promoted));
        assert_eq!(ids(&third), ids(&pages_by_category(RoleCategory::Admin)));
    }
}
