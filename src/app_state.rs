// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ValidatedConfig;
use crate::iam::{SessionTokenStore, UserStore};
use crate::notifications::NotificationStore;
use crate::realtime::PushHub;

pub struct AppState {
    pub config: Arc<ValidatedConfig>,
    pub user_store: Arc<UserStore>,
    pub sessions: SessionTokenStore,
    pub hub: Arc<PushHub>,
    pub notifications: Arc<NotificationStore>,
}

impl AppState {
    pub fn new(config: Arc<ValidatedConfig>, user_store: Arc<UserStore>) -> Self {
        let sessions = SessionTokenStore::new_with_expiry(Duration::from_secs(
            config.realtime.session_expiry_minutes * 60,
        ));
        let notifications = Arc::new(NotificationStore::with_retention(
            config.notifications.retention,
        ));
        Self {
            config,
            user_store,
            sessions,
            hub: Arc::new(PushHub::new()),
            notifications,
        }
    }
}
