// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// The distinguished highest-trust role. It bypasses explicit page
/// assignment entirely (see `pages::resolver`).
pub const SUPERADMIN_ROLE: &str = "superadmin";

pub const MAX_ROLE_CHARS: usize = 64;

/// The portal area a page or user belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    Admin,
    Subadmin,
    Vendor,
    Customer,
}

impl RoleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCategory::Admin => "admin",
            RoleCategory::Subadmin => "subadmin",
            RoleCategory::Vendor => "vendor",
            RoleCategory::Customer => "customer",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legacy compatibility table mapping a role name to its portal
/// category. Used only when a user carries no explicit page
/// assignment. Unrecognized roles map to no category at all, which
/// resolves to an empty navigation set rather than an error.
pub fn fallback_category(role: &str) -> Option<RoleCategory> {
    match role.trim() {
        SUPERADMIN_ROLE => Some(RoleCategory::Admin),
        "subadmin" => Some(RoleCategory::Subadmin),
        "agent" | "vendor" => Some(RoleCategory::Vendor),
        "customer" => Some(RoleCategory::Customer),
        _ => None,
    }
}

pub fn is_superadmin(role: &str) -> bool {
    role.trim() == SUPERADMIN_ROLE
}

#[derive(Debug)]
pub struct RoleValidationError {
    message: String,
}

impl RoleValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RoleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for RoleValidationError {}

pub fn normalize_role(role: &str) -> Result<String, RoleValidationError> {
    let trimmed = role.trim();
    if trimmed.is_empty() {
        return Err(RoleValidationError::new("Role is required"));
    }
    if trimmed.chars().count() > MAX_ROLE_CHARS {
        return Err(RoleValidationError::new(format!(
            "Role must be at most {} characters",
            MAX_ROLE_CHARS
        )));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(RoleValidationError::new(format!(
            "Role '{}' contains invalid characters",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}
