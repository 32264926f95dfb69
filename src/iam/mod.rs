// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Minimal identity layer. Squares consumes user claims (role,
//! assigned pages, permission grants) and never owns their lifecycle;
//! accounts live in `users.yaml` in the runtime directory.

pub mod session;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

pub use session::SessionTokenStore;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub email: String,
    pub name: String,
    pub role: String,
    pub role_pages: Vec<String>,
    pub role_permissions: Vec<String>,
}

// Structure matching the YAML file format. Missing page or permission
// lists mean "use the role fallback", never an error.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YamlUser {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_pages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_permissions: Vec<String>,
}

impl YamlUser {
    pub fn into_user(self, email: String) -> User {
        User {
            email,
            name: self.name,
            role: self.role,
            role_pages: self.role_pages,
            role_permissions: self.role_permissions,
        }
    }
}

#[derive(Debug, Clone)]
pub enum IamError {
    UserNotFound(String),
    FileError(String),
    ParseError(String),
}

impl std::fmt::Display for IamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IamError::UserNotFound(email) => write!(f, "User not found: {}", email),
            IamError::FileError(msg) => write!(f, "File error: {}", msg),
            IamError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for IamError {}

pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
}

impl UserStore {
    pub fn load(path: &Path) -> Result<Self, IamError> {
        let content = fs::read_to_string(path).map_err(|err| {
            IamError::FileError(format!("Cannot read {}: {}", path.display(), err))
        })?;
        let raw: HashMap<String, YamlUser> = serde_yaml::from_str(&content).map_err(|err| {
            IamError::ParseError(format!("Invalid users file {}: {}", path.display(), err))
        })?;
        let users = raw
            .into_iter()
            .map(|(email, user)| (email.clone(), user.into_user(email)))
            .collect();
        Ok(Self {
            users: RwLock::new(users),
        })
    }

    pub fn from_users(users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.email.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    pub fn find(&self, email: &str) -> Option<User> {
        let users = match self.users.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        users.get(email).cloned()
    }

    pub fn len(&self) -> usize {
        let users = match self.users.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
