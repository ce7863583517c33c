//! In-memory login sessions keyed by an opaque cookie token.
//!
//! Sessions expire after a period of inactivity (moka time-to-idle). Tokens are
//! only kept as BLAKE3 digests.

#[cfg(test)]
mod tests;

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use moka::sync::Cache;
use serde::Serialize;
use std::time::Duration;

use crate::accounts::{Role, User};
use crate::constants::SESSION_COOKIE;
use crate::hashing::hash_token;

/// Identity attached to a logged-in request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub name: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<[u8; 32], SessionUser>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .field("entries", &self.sessions.entry_count())
            .finish()
    }
}

impl SessionStore {
    const MAX_SESSIONS: u64 = 10_000;

    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(Self::MAX_SESSIONS)
                .time_to_idle(ttl)
                .build(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a session and returns its token.
    pub fn create(&self, user: SessionUser) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.insert(hash_token(&token), user);
        token
    }

    /// Returns the session for `token`, refreshing its idle timer.
    pub fn get(&self, token: &str) -> Option<SessionUser> {
        self.sessions.get(&hash_token(token))
    }

    pub fn remove(&self, token: &str) {
        self.sessions.invalidate(&hash_token(token));
    }

    /// `Set-Cookie` value carrying `token`.
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.ttl.as_secs()
        )
    }

    /// `Set-Cookie` value that clears the session cookie.
    pub fn clear_cookie() -> String {
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

/// Extracts the session token from the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
