// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Portal websocket endpoint. The first client frame must be an auth
//! frame carrying a session token; after that the connection joins the
//! push hub and receives event frames until either side closes.

use crate::app_state::AppState;
use crate::notifications::store::NotificationStore;
use crate::realtime::events::{
    MarkReadPayload, RealtimeEvent, EVENT_MARK_NOTIFICATION_READ,
    EVENT_NOTIFICATION_READ_CONFIRMED,
};
use crate::realtime::hub::PushHub;
use crate::realtime::protocol::{
    decode_frame, encode_frame, AuthErrFrame, AuthOkFrame, EmitFrame, ErrorFrame, PortalFrame,
    WS_MAX_MESSAGE_BYTES,
};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use actix_ws::{AggregatedMessage, AggregatedMessageStream, Session};
use futures_util::StreamExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
const HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(500);
#[cfg(not(test))]
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn realtime_ws(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (response, session, message_stream) = actix_ws::handle(&req, stream)?;
    let message_stream = message_stream
        .max_frame_size(WS_MAX_MESSAGE_BYTES)
        .aggregate_continuations()
        .max_continuation_size(WS_MAX_MESSAGE_BYTES);
    let state = state.into_inner();

    actix_web::rt::spawn(async move {
        handle_ws_session(session, message_stream, state).await;
    });

    Ok(response)
}

async fn handle_ws_session(
    mut session: Session,
    mut message_stream: AggregatedMessageStream,
    state: Arc<AppState>,
) {
    let email = match authenticate(&mut session, &mut message_stream, &state).await {
        Some(email) => email,
        None => {
            let _ = session.close(None).await;
            return;
        }
    };

    let (connection_id, mut events) = state.hub.register(&email);
    if send_frame(
        &mut session,
        &PortalFrame::AuthOk(AuthOkFrame {
            email: email.clone(),
        }),
    )
    .await
    .is_err()
    {
        state.hub.deregister(connection_id);
        return;
    }
    log::info!("Realtime session started for {}", email);

    loop {
        tokio::select! {
            event = events.recv() => {
                let event = match event {
                    Some(event) => event,
                    None => break,
                };
                if send_frame(&mut session, &PortalFrame::Event(event)).await.is_err() {
                    break;
                }
            }
            message = message_stream.next() => {
                let message = match message {
                    Some(Ok(message)) => message,
                    _ => break,
                };
                match message {
                    AggregatedMessage::Text(text) => {
                        handle_client_frame(&mut session, &text, &email, &state.hub, &state.notifications).await;
                    }
                    AggregatedMessage::Ping(bytes) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    AggregatedMessage::Close(_) => break,
                    _ => {}
                }
            }
        }
    }

    state.hub.deregister(connection_id);
    let _ = session.close(None).await;
    log::info!("Realtime session ended for {}", email);
}

async fn authenticate(
    session: &mut Session,
    message_stream: &mut AggregatedMessageStream,
    state: &AppState,
) -> Option<String> {
    let first = match tokio::time::timeout(HANDSHAKE_TIMEOUT, message_stream.next()).await {
        Ok(Some(Ok(message))) => message,
        Ok(_) => return None,
        Err(_) => {
            log::debug!("Realtime handshake timed out");
            let _ = send_auth_err(session, "Authentication timeout").await;
            return None;
        }
    };

    let text = match first {
        AggregatedMessage::Text(text) => text,
        _ => {
            let _ = send_auth_err(session, "Expected auth frame").await;
            return None;
        }
    };

    let frame = match decode_frame(&text) {
        Ok(frame) => frame,
        Err(err) => {
            log::debug!("Realtime handshake codec error: {}", err);
            let _ = send_auth_err(session, "Malformed auth frame").await;
            return None;
        }
    };

    let token = match frame {
        PortalFrame::Auth(auth) => auth.token,
        _ => {
            let _ = send_auth_err(session, "Expected auth frame").await;
            return None;
        }
    };

    let email = match state.sessions.resolve(&token) {
        Some(email) => email,
        None => {
            log::warn!("Realtime connection with invalid session token");
            let _ = send_auth_err(session, "Invalid or expired session").await;
            return None;
        }
    };

    if state.user_store.find(&email).is_none() {
        log::warn!("Realtime session token for unknown account {}", email);
        let _ = send_auth_err(session, "Unknown account").await;
        return None;
    }

    Some(email)
}

async fn handle_client_frame(
    session: &mut Session,
    text: &str,
    email: &str,
    hub: &PushHub,
    notifications: &NotificationStore,
) {
    let frame = match decode_frame(text) {
        Ok(frame) => frame,
        Err(err) => {
            log::debug!("Dropping malformed client frame from {}: {}", email, err);
            let _ = send_frame(
                session,
                &PortalFrame::Error(ErrorFrame {
                    message: "Malformed frame".to_string(),
                }),
            )
            .await;
            return;
        }
    };

    match frame {
        PortalFrame::Emit(emit) => handle_emit(emit, email, hub, notifications),
        other => {
            log::debug!("Ignoring unexpected client frame from {}: {:?}", email, other);
        }
    }
}

// Client emits are fire-and-forget: anything invalid is logged and
// dropped, never answered with an error the client would wait on.
fn handle_emit(emit: EmitFrame, email: &str, hub: &PushHub, notifications: &NotificationStore) {
    if emit.event_type != EVENT_MARK_NOTIFICATION_READ {
        log::debug!("Ignoring unknown emit '{}' from {}", emit.event_type, email);
        return;
    }
    let payload: MarkReadPayload = match serde_json::from_value(emit.payload) {
        Ok(payload) => payload,
        Err(err) => {
            log::debug!("Malformed mark-read payload from {}: {}", email, err);
            return;
        }
    };
    if notifications.mark_read(email, &payload.notification_id) {
        hub.publish(
            email,
            RealtimeEvent::new(
                EVENT_NOTIFICATION_READ_CONFIRMED,
                json!({ "notification_id": payload.notification_id }),
            ),
        );
    } else {
        log::debug!(
            "Mark-read for unknown notification '{}' from {}",
            payload.notification_id,
            email
        );
    }
}

async fn send_auth_err(session: &mut Session, message: &str) -> Result<(), actix_ws::Closed> {
    send_frame(
        session,
        &PortalFrame::AuthErr(AuthErrFrame {
            message: message.to_string(),
        }),
    )
    .await
}

async fn send_frame(session: &mut Session, frame: &PortalFrame) -> Result<(), actix_ws::Closed> {
    let encoded = match encode_frame(frame) {
        Ok(encoded) => encoded,
        Err(err) => {
            log::error!("Failed to encode ws frame: {}", err);
            return Ok(());
        }
    };
    session.text(encoded).await
}
