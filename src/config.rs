// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8460
}

fn default_workers() -> usize {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_description")]
    pub description: String,
}

fn default_app_name() -> String {
    "Squares".to_string()
}

fn default_app_description() -> String {
    "Multi-role property portal".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: default_app_description(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RealtimeConfig {
    #[serde(default = "default_session_expiry_minutes")]
    pub session_expiry_minutes: u64,
}

fn default_session_expiry_minutes() -> u64 {
    480
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            session_expiry_minutes: default_session_expiry_minutes(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotificationConfig {
    #[serde(default = "default_notification_retention")]
    pub retention: usize,
    #[serde(default = "default_compact_count")]
    pub compact_count: usize,
}

fn default_notification_retention() -> usize {
    100
}

fn default_compact_count() -> usize {
    3
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            retention: default_notification_retention(),
            compact_count: default_compact_count(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RawConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    pub realtime: RealtimeConfig,
    pub notifications: NotificationConfig,
}

const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

pub fn validate_config(raw: RawConfig) -> Result<ValidatedConfig, ConfigError> {
    if raw.server.workers == 0 {
        return Err(ConfigError::ValidationError(
            "server.workers must be at least 1".to_string(),
        ));
    }
    if !KNOWN_LOG_LEVELS.contains(&raw.logging.level.to_lowercase().as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "Unknown logging.level '{}'",
            raw.logging.level
        )));
    }
    if raw.notifications.retention == 0 {
        return Err(ConfigError::ValidationError(
            "notifications.retention must be at least 1".to_string(),
        ));
    }
    if raw.notifications.compact_count > raw.notifications.retention {
        return Err(ConfigError::ValidationError(
            "notifications.compact_count cannot exceed retention".to_string(),
        ));
    }
    if raw.realtime.session_expiry_minutes == 0 {
        return Err(ConfigError::ValidationError(
            "realtime.session_expiry_minutes must be at least 1".to_string(),
        ));
    }
    Ok(ValidatedConfig {
        server: raw.server,
        app: raw.app,
        logging: raw.logging,
        realtime: raw.realtime,
        notifications: raw.notifications,
    })
}

pub fn load_config(path: &Path) -> Result<ValidatedConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| {
        ConfigError::LoadError(format!("Cannot read {}: {}", path.display(), err))
    })?;
    let raw: RawConfig = serde_yaml::from_str(&content).map_err(|err| {
        ConfigError::LoadError(format!("Invalid config {}: {}", path.display(), err))
    })?;
    validate_config(raw)
}

/// Defaults used by the test suites.
pub fn test_config() -> ValidatedConfig {
    validate_config(RawConfig::default()).expect("default config is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = validate_config(RawConfig::default()).expect("defaults valid");
        assert_eq!(config.notifications.retention, 100);
        assert_eq!(config.notifications.compact_count, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut raw = RawConfig::default();
        raw.logging.level = "shout".to_string();
        assert!(matches!(
            validate_config(raw),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn compact_count_cannot_exceed_retention() {
        let mut raw = RawConfig::default();
        raw.notifications.retention = 2;
        raw.notifications.compact_count = 3;
        assert!(validate_config(raw).is_err());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let raw: RawConfig = serde_yaml::from_str("server:\n  port: 9000\n").unwrap();
        let config = validate_config(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.app.name, "Squares");
    }
}
