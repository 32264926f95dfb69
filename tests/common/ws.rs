// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use awc::ws::{Frame as ClientFrame, Message as ClientMessage};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use squares::realtime::protocol::{decode_frame, encode_frame, AuthFrame, PortalFrame};

pub async fn read_portal_frame<S, E>(framed: &mut S) -> PortalFrame
where
    S: Stream<Item = Result<ClientFrame, E>> + Sink<ClientMessage, Error = E> + Unpin,
    E: std::fmt::Debug,
{
    loop {
        let frame = framed.next().await.expect("ws frame").expect("ws ok");
        match frame {
            ClientFrame::Text(bytes) => {
                let text = std::str::from_utf8(&bytes).expect("utf8 frame");
                return decode_frame(text).expect("decode frame");
            }
            ClientFrame::Ping(bytes) => {
                framed.send(ClientMessage::Pong(bytes)).await.expect("pong");
            }
            ClientFrame::Close(reason) => panic!("WebSocket closed: {:?}", reason),
            _ => {}
        }
    }
}

pub async fn send_portal_frame<S, E>(framed: &mut S, frame: &PortalFrame)
where
    S: Stream<Item = Result<ClientFrame, E>> + Sink<ClientMessage, Error = E> + Unpin,
    E: std::fmt::Debug,
{
    let encoded = encode_frame(frame).expect("encode frame");
    framed
        .send(ClientMessage::Text(encoded.into()))
        .await
        .expect("send frame");
}

/// Sends the auth frame and returns the server's answer.
pub async fn authenticate<S, E>(framed: &mut S, token: &str) -> PortalFrame
where
    S: Stream<Item = Result<ClientFrame, E>> + Sink<ClientMessage, Error = E> + Unpin,
    E: std::fmt::Debug,
{
    send_portal_frame(
        framed,
        &PortalFrame::Auth(AuthFrame {
            token: token.to_string(),
        }),
    )
    .await;
    read_portal_frame(framed).await
}
