// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::iam::User;
use crate::roles::is_superadmin;
use std::error::Error;
use std::fmt;

/// Closed set of portal permissions. User records carry permission ids
/// as strings; every string must parse into this enum to grant
/// anything, so a typo'd id is inert instead of silently granting a
/// phantom capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewProperties,
    ManageProperties,
    ApproveProperties,
    RejectProperties,
    ManageUsers,
    ManageRoles,
    ViewReports,
    ManageSupportTickets,
    ManageBilling,
    SendAnnouncements,
}

pub const ALL_PERMISSIONS: &[Permission] = &[
    Permission::ViewProperties,
    Permission::ManageProperties,
    Permission::ApproveProperties,
    Permission::RejectProperties,
    Permission::ManageUsers,
    Permission::ManageRoles,
    Permission::ViewReports,
    Permission::ManageSupportTickets,
    Permission::ManageBilling,
    Permission::SendAnnouncements,
];

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewProperties => "view_properties",
            Permission::ManageProperties => "manage_properties",
            Permission::ApproveProperties => "approve_properties",
            Permission::RejectProperties => "reject_properties",
            Permission::ManageUsers => "manage_users",
            Permission::ManageRoles => "manage_roles",
            Permission::ViewReports => "view_reports",
            Permission::ManageSupportTickets => "manage_support_tickets",
            Permission::ManageBilling => "manage_billing",
            Permission::SendAnnouncements => "send_announcements",
        }
    }

    pub fn parse(id: &str) -> Result<Permission, PermissionParseError> {
        match id.trim() {
            "view_properties" => Ok(Permission::ViewProperties),
            "manage_properties" => Ok(Permission::ManageProperties),
            "approve_properties" => Ok(Permission::ApproveProperties),
            "reject_properties" => Ok(Permission::RejectProperties),
            "manage_users" => Ok(Permission::ManageUsers),
            "manage_roles" => Ok(Permission::ManageRoles),
            "view_reports" => Ok(Permission::ViewReports),
            "manage_support_tickets" => Ok(Permission::ManageSupportTickets),
            "manage_billing" => Ok(Permission::ManageBilling),
            "send_announcements" => Ok(Permission::SendAnnouncements),
            other => Err(PermissionParseError::new(other)),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct PermissionParseError {
    id: String,
}

impl PermissionParseError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for PermissionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown permission id '{}'", self.id)
    }
}

impl Error for PermissionParseError {}

/// Superadmin holds every permission implicitly; everyone else only
/// what their record names. Unparseable ids on a record are skipped
/// with a debug log and grant nothing.
pub fn has_permission(user: &User, permission: Permission) -> bool {
    if is_superadmin(&user.role) {
        return true;
    }
    user.role_permissions.iter().any(|id| {
        match Permission::parse(id) {
            Ok(parsed) => parsed == permission,
            Err(err) => {
                log::debug!("Ignoring permission on {}: {}", user.email, err);
                false
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iam::User;

    fn user_with(permissions: &[&str]) -> User {
        User {
            email: "vendor@example.com".to_string(),
            name: "Vendor".to_string(),
            role: "agent".to_string(),
            role_pages: Vec::new(),
            role_permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn parse_round_trips_every_permission() {
        for permission in ALL_PERMISSIONS {
            assert_eq!(Permission::parse(permission.as_str()).unwrap(), *permission);
        }
    }

    #[test]
    fn unknown_id_grants_nothing() {
        let user = user_with(&["manage_propertys"]);
        assert!(!has_permission(&user, Permission::ManageProperties));
    }

    #[test]
    fn named_permission_is_granted() {
        let user = user_with(&["manage_properties", "view_reports"]);
        assert!(has_permission(&user, Permission::ManageProperties));
        assert!(has_permission(&user, Permission::ViewReports));
        assert!(!has_permission(&user, Permission::ManageUsers));
    }

    #[test]
    fn superadmin_has_everything() {
        let mut user = user_with(&[]);
        user.role = "superadmin".to_string();
        for permission in ALL_PERMISSIONS {
            assert!(has_permission(&user, *permission));
        }
    }
}
