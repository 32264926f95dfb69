// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use uuid::Uuid;

const SESSION_EXPIRY_MINUTES: u64 = 480;

#[derive(Clone, Debug)]
struct SessionData {
    created_at: Instant,
    email: String,
}

/// Opaque session tokens bound to an account email. The map lives on a
/// dedicated worker thread; callers talk to it over a channel, so no
/// lock is shared with request handlers.
#[derive(Clone)]
pub struct SessionTokenStore {
    sender: mpsc::Sender<SessionCommand>,
    expiry: Duration,
}

enum SessionCommand {
    Issue {
        email: String,
        reply: mpsc::Sender<String>,
    },
    Resolve {
        token: String,
        reply: mpsc::Sender<Option<String>>,
    },
    Revoke {
        token: String,
        reply: mpsc::Sender<bool>,
    },
}

impl SessionTokenStore {
    pub fn new() -> Self {
        Self::new_with_expiry_inner(Duration::from_secs(SESSION_EXPIRY_MINUTES * 60))
    }

    pub fn new_with_expiry(expiry: Duration) -> Self {
        Self::new_with_expiry_inner(expiry)
    }

    fn new_with_expiry_inner(expiry: Duration) -> Self {
        let sender = start_session_worker(expiry);
        Self { sender, expiry }
    }

    pub fn issue(&self, email: &str) -> String {
        self.request(
            |reply| SessionCommand::Issue {
                email: email.to_string(),
                reply,
            },
            String::new(),
        )
    }

    /// Non-consuming: a session token stays valid until revoked or
    /// expired.
    pub fn resolve(&self, token: &str) -> Option<String> {
        self.request(
            |reply| SessionCommand::Resolve {
                token: token.to_string(),
                reply,
            },
            None,
        )
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.request(
            |reply| SessionCommand::Revoke {
                token: token.to_string(),
                reply,
            },
            false,
        )
    }

    pub fn expiry_seconds(&self) -> u64 {
        self.expiry.as_secs()
    }

    fn request<T>(&self, build: impl FnOnce(mpsc::Sender<T>) -> SessionCommand, fallback: T) -> T {
        let (reply, receive) = mpsc::channel();
        if self.sender.send(build(reply)).is_err() {
            log::error!("🚨 CRITICAL: SessionTokenStore channel closed");
            return fallback;
        }
        receive.recv().unwrap_or(fallback)
    }
}

impl Default for SessionTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

fn start_session_worker(expiry: Duration) -> mpsc::Sender<SessionCommand> {
    let (sender, receiver) = mpsc::channel();
    let thread = thread::Builder::new().name("session-token-store".to_string());
    if let Err(err) = thread.spawn(move || run_session_worker(receiver, expiry)) {
        log::error!("SessionTokenStore worker failed to start: {}", err);
    }
    sender
}

fn run_session_worker(receiver: mpsc::Receiver<SessionCommand>, expiry: Duration) {
    let mut sessions: HashMap<String, SessionData> = HashMap::new();
    while let Ok(command) = receiver.recv() {
        let now = Instant::now();
        cleanup_expired(&mut sessions, now, expiry);
        match command {
            SessionCommand::Issue { email, reply } => {
                let token = Uuid::new_v4().to_string();
                sessions.insert(
                    token.clone(),
                    SessionData {
                        created_at: now,
                        email,
                    },
                );
                let _ = reply.send(token);
            }
            SessionCommand::Resolve { token, reply } => {
                let email = sessions.get(&token).and_then(|data| {
                    if data.created_at.elapsed() < expiry {
                        Some(data.email.clone())
                    } else {
                        None
                    }
                });
                let _ = reply.send(email);
            }
            SessionCommand::Revoke { token, reply } => {
                let _ = reply.send(sessions.remove(&token).is_some());
            }
        }
    }
}

fn cleanup_expired(sessions: &mut HashMap<String, SessionData>, now: Instant, expiry: Duration) {
    sessions.retain(|_, data| now.duration_since(data.created_at) < expiry);
}
