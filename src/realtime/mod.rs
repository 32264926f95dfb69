// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Realtime push: server-side fan-out hub plus the client-side event
//! bus. Delivery is per-connection ordered and best-effort only: a
//! disconnect gap means events may have been missed, and nothing here
//! replays them.

pub mod bus;
pub mod events;
pub mod hub;
pub mod protocol;
pub mod transport;
pub mod ws;

pub use bus::{EventBus, Subscription};
pub use events::{
    NotificationPush, RealtimeEvent, EVENT_ACTIVITY, EVENT_MARK_NOTIFICATION_READ,
    EVENT_NEW_MESSAGE, EVENT_NOTIFICATION, EVENT_NOTIFICATION_READ_CONFIRMED,
};
pub use hub::PushHub;
pub use protocol::{decode_frame, encode_frame, PortalFrame};
pub use transport::{LoopbackTransport, Transport, TransportError, TransportErrorKind};
