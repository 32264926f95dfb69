// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod api;
pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod iam;
pub mod notifications;
pub mod pages;
pub mod permissions;
pub mod realtime;
pub mod roles;
pub mod util;
