// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::realtime::events::RealtimeEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const WS_MAX_MESSAGE_BYTES: usize = 63 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    Codec,
    FrameTooLarge,
}

#[derive(Debug, Clone)]
pub struct ProtocolError {
    kind: ProtocolErrorKind,
    message: String,
}

impl ProtocolError {
    pub fn new(kind: ProtocolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ProtocolErrorKind {
        self.kind
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ws protocol error: {}", self.message)
    }
}

impl std::error::Error for ProtocolError {}

/// Frames on the portal websocket. Text frames carrying one JSON
/// object each; the first client frame must be `Auth`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortalFrame {
    Auth(AuthFrame),
    AuthOk(AuthOkFrame),
    AuthErr(AuthErrFrame),
    Event(RealtimeEvent),
    Emit(EmitFrame),
    Error(ErrorFrame),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthFrame {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthOkFrame {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthErrFrame {
    pub message: String,
}

/// Client-to-server fire-and-forget event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmitFrame {
    pub event_type: String,
    pub payload: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorFrame {
    pub message: String,
}

pub fn encode_frame(frame: &PortalFrame) -> Result<String, ProtocolError> {
    let encoded = serde_json::to_string(frame)
        .map_err(|err| ProtocolError::new(ProtocolErrorKind::Codec, err.to_string()))?;
    if encoded.len() > WS_MAX_MESSAGE_BYTES {
        return Err(ProtocolError::new(
            ProtocolErrorKind::FrameTooLarge,
            format!("Frame of {} bytes exceeds limit", encoded.len()),
        ));
    }
    Ok(encoded)
}

pub fn decode_frame(text: &str) -> Result<PortalFrame, ProtocolError> {
    if text.len() > WS_MAX_MESSAGE_BYTES {
        return Err(ProtocolError::new(
            ProtocolErrorKind::FrameTooLarge,
            format!("Frame of {} bytes exceeds limit", text.len()),
        ));
    }
    serde_json::from_str(text)
        .map_err(|err| ProtocolError::new(ProtocolErrorKind::Codec, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::events::EVENT_MARK_NOTIFICATION_READ;
    use serde_json::json;

    #[test]
    fn frames_round_trip() {
        let frames = vec![
            PortalFrame::Auth(AuthFrame {
                token: "t-1".to_string(),
            }),
            PortalFrame::AuthOk(AuthOkFrame {
                email: "a@example.com".to_string(),
            }),
            PortalFrame::Emit(EmitFrame {
                event_type: EVENT_MARK_NOTIFICATION_READ.to_string(),
                payload: json!({"notification_id": "n-1"}),
            }),
            PortalFrame::Event(RealtimeEvent::new("activity", json!({"what": "login"}))),
        ];
        for frame in frames {
            let encoded = encode_frame(&frame).unwrap();
            assert_eq!(decode_frame(&encoded).unwrap(), frame);
        }
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let huge = "x".repeat(WS_MAX_MESSAGE_BYTES + 1);
        let err = decode_frame(&huge).unwrap_err();
        assert_eq!(err.kind(), ProtocolErrorKind::FrameTooLarge);
    }

    #[test]
    fn garbage_is_a_codec_error() {
        let err = decode_frame("{not json").unwrap_err();
        assert_eq!(err.kind(), ProtocolErrorKind::Codec);
    }
}
