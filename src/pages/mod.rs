// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Static catalog of portal pages.
//!
//! The registry is the single source of navigation truth: declaration
//! order here is the canonical layout order for every sidebar, and
//! lookups by id always yield registry order, never caller order.

pub mod resolver;

use crate::roles::RoleCategory;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;

/// Build-time metadata for one navigable portal screen.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    pub category: RoleCategory,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_label: Option<&'static str>,
}

const fn page(
    id: &'static str,
    label: &'static str,
    path: &'static str,
    category: RoleCategory,
    description: &'static str,
) -> PageDescriptor {
    PageDescriptor {
        id,
        label,
        path,
        category,
        description,
        sub_label: None,
    }
}

const fn sub_page(
    id: &'static str,
    label: &'static str,
    sub_label: &'static str,
    path: &'static str,
    category: RoleCategory,
    description: &'static str,
) -> PageDescriptor {
    PageDescriptor {
        id,
        label,
        path,
        category,
        description,
        sub_label: Some(sub_label),
    }
}

/// The full page catalog, in canonical declaration order.
pub static PAGE_REGISTRY: &[PageDescriptor] = &[
    // Admin portal
    page(
        "admin_dashboard",
        "Dashboard",
        "/admin/dashboard",
        RoleCategory::Admin,
        "Platform-wide overview and key metrics",
    ),
    page(
        "vendor_management",
        "Vendors",
        "/admin/vendors",
        RoleCategory::Admin,
        "Approve, suspend and audit vendor accounts",
    ),
    page(
        "customer_management",
        "Customers",
        "/admin/customers",
        RoleCategory::Admin,
        "Customer account administration",
    ),
    page(
        "subadmin_management",
        "Sub-admins",
        "/admin/subadmins",
        RoleCategory::Admin,
        "Create sub-admin accounts and assign their pages",
    ),
    page(
        "role_permissions",
        "Roles & Permissions",
        "/admin/roles",
        RoleCategory::Admin,
        "Edit role definitions and permission grants",
    ),
    page(
        "property_moderation",
        "Property Moderation",
        "/admin/properties",
        RoleCategory::Admin,
        "Final review queue for escalated listings",
    ),
    page(
        "billing_plans",
        "Billing Plans",
        "/admin/billing",
        RoleCategory::Admin,
        "Subscription plans and add-on pricing",
    ),
    page(
        "support_overview",
        "Support Overview",
        "/admin/support",
        RoleCategory::Admin,
        "All support tickets across the platform",
    ),
    page(
        "platform_reports",
        "Reports",
        "/admin/reports",
        RoleCategory::Admin,
        "Revenue, listing and engagement reports",
    ),
    page(
        "admin_notifications",
        "Announcements",
        "/admin/announcements",
        RoleCategory::Admin,
        "Send announcements to portal users",
    ),
    sub_page(
        "admin_privacy_policy",
        "Privacy Policy",
        "Legal",
        "/admin/legal/privacy",
        RoleCategory::Admin,
        "Edit the published privacy policy",
    ),
    sub_page(
        "admin_refund_policy",
        "Refund Policy",
        "Legal",
        "/admin/legal/refunds",
        RoleCategory::Admin,
        "Edit the published refund policy",
    ),
    // Sub-admin portal
    page(
        "subadmin_dashboard",
        "Dashboard",
        "/subadmin/dashboard",
        RoleCategory::Subadmin,
        "Assigned-area overview for sub-admins",
    ),
    page(
        "property_reviews",
        "Property Reviews",
        "/subadmin/reviews",
        RoleCategory::Subadmin,
        "Queue of listings awaiting review",
    ),
    page(
        "property_rejections",
        "Property Rejections",
        "/subadmin/rejections",
        RoleCategory::Subadmin,
        "Rejected listings and rejection reasons",
    ),
    page(
        "support_tickets",
        "Support Tickets",
        "/subadmin/tickets",
        RoleCategory::Subadmin,
        "Tickets assigned to this sub-admin",
    ),
    page(
        "vendor_performance",
        "Vendor Performance",
        "/subadmin/vendor-performance",
        RoleCategory::Subadmin,
        "Listing quality and response-time scores per vendor",
    ),
    page(
        "addon_services",
        "Add-on Services",
        "/subadmin/addons",
        RoleCategory::Subadmin,
        "Review vendor add-on service requests",
    ),
    page(
        "notifications",
        "Notifications",
        "/subadmin/notifications",
        RoleCategory::Subadmin,
        "Notification feed for this account",
    ),
    page(
        "reports",
        "Reports",
        "/subadmin/reports",
        RoleCategory::Subadmin,
        "Reports scoped to the assigned area",
    ),
    sub_page(
        "subadmin_privacy_policy",
        "Privacy Policy",
        "Legal",
        "/subadmin/legal/privacy",
        RoleCategory::Subadmin,
        "Read-only privacy policy view",
    ),
    sub_page(
        "subadmin_refund_policy",
        "Refund Policy",
        "Legal",
        "/subadmin/legal/refunds",
        RoleCategory::Subadmin,
        "Read-only refund policy view",
    ),
    // Vendor portal
    page(
        "vendor_dashboard",
        "Dashboard",
        "/vendor/dashboard",
        RoleCategory::Vendor,
        "Listing and lead overview for this vendor",
    ),
    page(
        "vendor_properties",
        "My Properties",
        "/vendor/properties",
        RoleCategory::Vendor,
        "Create and manage property listings",
    ),
    page(
        "vendor_leads",
        "Leads",
        "/vendor/leads",
        RoleCategory::Vendor,
        "Customer enquiries on this vendor's listings",
    ),
    page(
        "vendor_messages",
        "Messages",
        "/vendor/messages",
        RoleCategory::Vendor,
        "Conversations with customers",
    ),
    page(
        "vendor_billing",
        "Billing",
        "/vendor/billing",
        RoleCategory::Vendor,
        "Invoices and payment history",
    ),
    page(
        "vendor_subscription",
        "Subscription",
        "/vendor/subscription",
        RoleCategory::Vendor,
        "Current plan and upgrades",
    ),
    page(
        "vendor_addons",
        "Add-ons",
        "/vendor/addons",
        RoleCategory::Vendor,
        "Purchased add-on services",
    ),
    page(
        "vendor_reports",
        "Reports",
        "/vendor/reports",
        RoleCategory::Vendor,
        "Listing performance reports",
    ),
    // Customer portal
    page(
        "customer_home",
        "Home",
        "/home",
        RoleCategory::Customer,
        "Personalized property feed",
    ),
    page(
        "saved_properties",
        "Saved Properties",
        "/saved",
        RoleCategory::Customer,
        "Bookmarked listings",
    ),
    page(
        "customer_messages",
        "Messages",
        "/messages",
        RoleCategory::Customer,
        "Conversations with vendors",
    ),
    page(
        "customer_support",
        "Support",
        "/support",
        RoleCategory::Customer,
        "Open and track support tickets",
    ),
    page(
        "customer_billing",
        "Billing",
        "/billing",
        RoleCategory::Customer,
        "Payment methods and receipts",
    ),
    page(
        "customer_profile",
        "Profile",
        "/profile",
        RoleCategory::Customer,
        "Account details and preferences",
    ),
];

static PAGE_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    PAGE_REGISTRY
        .iter()
        .enumerate()
        .map(|(position, descriptor)| (descriptor.id, position))
        .collect()
});

#[derive(Debug)]
pub struct PageRegistryError {
    message: String,
}

impl PageRegistryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PageRegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page registry error: {}", self.message)
    }
}

impl Error for PageRegistryError {}

/// Startup sanity pass over the static catalog. Duplicate ids would
/// make id lookups ambiguous, so they are a hard error.
pub fn validate_registry() -> Result<(), PageRegistryError> {
    let mut seen = HashSet::new();
    for descriptor in PAGE_REGISTRY {
        if !seen.insert(descriptor.id) {
            return Err(PageRegistryError::new(format!(
                "Duplicate page id '{}'",
                descriptor.id
            )));
        }
        if descriptor.path.is_empty() || !descriptor.path.starts_with('/') {
            return Err(PageRegistryError::new(format!(
                "Page '{}' has invalid path '{}'",
                descriptor.id, descriptor.path
            )));
        }
    }
    Ok(())
}

/// Pages of one category, in declaration order.
pub fn pages_by_category(category: RoleCategory) -> Vec<&'static PageDescriptor> {
    PAGE_REGISTRY
        .iter()
        .filter(|descriptor| descriptor.category == category)
        .collect()
}

/// Pages matching the given ids, in **registry declaration order**
/// regardless of input order. Unknown ids are skipped and duplicates
/// collapse to a single entry, so a stale or repeated assignment can
/// never duplicate or invent a sidebar entry.
pub fn pages_by_ids<I, S>(ids: I) -> Vec<&'static PageDescriptor>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let wanted: HashSet<usize> = ids
        .into_iter()
        .filter_map(|id| PAGE_INDEX.get(id.as_ref()).copied())
        .collect();
    PAGE_REGISTRY
        .iter()
        .enumerate()
        .filter(|(position, _)| wanted.contains(position))
        .map(|(_, descriptor)| descriptor)
        .collect()
}

pub fn page_by_id(id: &str) -> Option<&'static PageDescriptor> {
    PAGE_INDEX.get(id).map(|position| &PAGE_REGISTRY[*position])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_validates_clean() {
        validate_registry().expect("registry is well formed");
    }

    #[test]
    fn category_filter_preserves_declaration_order() {
        let subadmin: Vec<&str> = pages_by_category(RoleCategory::Subadmin)
            .iter()
            .map(|descriptor| descriptor.id)
            .collect();
        assert_eq!(
            subadmin,
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
    fn ids_lookup_uses_registry_order_not_input_order() {
        let pages = pages_by_ids(["vendor_billing", "vendor_dashboard"]);
        let ids: Vec<&str> = pages.iter().map(|descriptor| descriptor.id).collect();
        assert_eq!(ids, vec!["vendor_dashboard", "vendor_billing"]);
    }

    #[test]
    fn ids_lookup_deduplicates_and_skips_unknown() {
        let pages = pages_by_ids(["vendor_billing", "vendor_billing", "deleted_page"]);
        let ids: Vec<&str> = pages.iter().map(|descriptor| descriptor.id).collect();
        assert_eq!(ids, vec!["vendor_billing"]);
    }

    #[test]
    fn page_by_id_is_total() {
        assert_eq!(page_by_id("vendor_dashboard").unwrap().id, "vendor_dashboard");
        assert!(page_by_id("no_such_page").is_none());
    }

    #[test]
    fn sub_labels_survive_lookup() {
        let legal = page_by_id("admin_privacy_policy").unwrap();
        assert_eq!(legal.sub_label, Some("Legal"));
    }
}
