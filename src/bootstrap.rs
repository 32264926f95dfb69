// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! First-run setup: materialize `config.yaml` and `users.yaml` in the
//! runtime directory when absent, then load and validate both.

use crate::config::{load_config, ConfigError, RawConfig, ValidatedConfig};
use crate::iam::{IamError, UserStore, YamlUser};
use crate::roles::SUPERADMIN_ROLE;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const USERS_FILE_NAME: &str = "users.yaml";
const DEFAULT_SUPERADMIN_EMAIL: &str = "admin@localhost";

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Iam(IamError),
    Io(String),
}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::Config(err) => write!(f, "{}", err),
            BootstrapError::Iam(err) => write!(f, "{}", err),
            BootstrapError::Io(msg) => write!(f, "Bootstrap I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BootstrapError {}

impl From<ConfigError> for BootstrapError {
    fn from(err: ConfigError) -> Self {
        BootstrapError::Config(err)
    }
}

impl From<IamError> for BootstrapError {
    fn from(err: IamError) -> Self {
        BootstrapError::Iam(err)
    }
}

pub struct BootstrapResult {
    pub config: ValidatedConfig,
    pub user_store: UserStore,
    pub config_path: PathBuf,
    pub users_path: PathBuf,
    pub created_config: bool,
    pub created_users: bool,
}

pub fn bootstrap_runtime(root: &Path) -> Result<BootstrapResult, BootstrapError> {
    fs::create_dir_all(root)
        .map_err(|err| BootstrapError::Io(format!("Cannot create {}: {}", root.display(), err)))?;

    let config_path = root.join(CONFIG_FILE_NAME);
    let created_config = ensure_default_config(&config_path)?;
    let users_path = root.join(USERS_FILE_NAME);
    let created_users = ensure_default_users(&users_path)?;

    let config = load_config(&config_path)?;
    let user_store = UserStore::load(&users_path)?;

    Ok(BootstrapResult {
        config,
        user_store,
        config_path,
        users_path,
        created_config,
        created_users,
    })
}

fn ensure_default_config(path: &Path) -> Result<bool, BootstrapError> {
    if path.exists() {
        return Ok(false);
    }
    let content = serde_yaml::to_string(&RawConfig::default())
        .map_err(|err| BootstrapError::Io(format!("Cannot render default config: {}", err)))?;
    fs::write(path, content)
        .map_err(|err| BootstrapError::Io(format!("Cannot write {}: {}", path.display(), err)))?;
    log::info!("Created default {}", path.display());
    Ok(true)
}

fn ensure_default_users(path: &Path) -> Result<bool, BootstrapError> {
    if path.exists() {
        return Ok(false);
    }
    let mut users: HashMap<String, YamlUser> = HashMap::new();
    users.insert(
        DEFAULT_SUPERADMIN_EMAIL.to_string(),
        YamlUser {
            name: "Administrator".to_string(),
            role: SUPERADMIN_ROLE.to_string(),
            role_pages: Vec::new(),
            role_permissions: Vec::new(),
        },
    );
    let content = serde_yaml::to_string(&users)
        .map_err(|err| BootstrapError::Io(format!("Cannot render default users: {}", err)))?;
    fs::write(path, content)
        .map_err(|err| BootstrapError::Io(format!("Cannot write {}: {}", path.display(), err)))?;
    log::info!("Created default {}", path.display());
    Ok(true)
}
