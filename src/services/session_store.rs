// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-side session storage for SUAP access tokens.
//!
//! The browser only ever holds a signed session id; the bearer token stays
//! in this process. Entries expire after the configured session lifetime.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;

/// Bytes of entropy in session ids and OAuth nonces.
const RANDOM_TOKEN_BYTES: usize = 32;

/// Token response from the SUAP OAuth token endpoint.
#[derive(Clone, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

#[derive(Clone)]
struct SessionEntry {
    token: OAuthToken,
    expires_at: DateTime<Utc>,
}

/// Concurrent map of session id to token, shared by all requests.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<DashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Store `token` under a fresh session id and return the id.
    pub fn create(&self, token: OAuthToken) -> Result<String, AppError> {
        self.purge_expired();

        let id = random_token()?;
        self.entries.insert(
            id.clone(),
            SessionEntry {
                token,
                expires_at: Utc::now() + self.ttl,
            },
        );
        Ok(id)
    }

    /// Token for a live session. Expired sessions are evicted and read as absent.
    pub fn get(&self, id: &str) -> Option<OAuthToken> {
        let now = Utc::now();
        self.entries.remove_if(id, |_, entry| entry.expires_at <= now);
        self.entries.get(id).map(|entry| entry.token.clone())
    }

    pub fn remove(&self, id: &str) {
        self.entries.remove(id);
    }

    /// Number of stored sessions, live or not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge_expired(&self) {
        let now = Utc::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }
}

/// Per-request view of one browser's session.
///
/// Built by the session extractor from the session cookie; handlers only
/// see `get_token`, `set_token`, `clear` and `is_authenticated`.
#[derive(Clone)]
pub struct Session {
    id: Option<String>,
    store: SessionStore,
}

impl Session {
    pub fn new(id: Option<String>, store: SessionStore) -> Self {
        Self { id, store }
    }

    /// Session without a cookie.
    pub fn anonymous(store: SessionStore) -> Self {
        Self { id: None, store }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn get_token(&self) -> Option<OAuthToken> {
        self.id.as_deref().and_then(|id| self.store.get(id))
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// Store a token under a new session id, dropping any previous session.
    ///
    /// Returns the new id for the caller to put in the session cookie.
    pub fn set_token(&mut self, token: OAuthToken) -> Result<String, AppError> {
        self.clear();
        let id = self.store.create(token)?;
        self.id = Some(id.clone());
        Ok(id)
    }

    /// Drop the stored token but keep the id, so later reads on this
    /// request see the session as signed out.
    pub fn invalidate(&self) {
        if let Some(id) = self.id.as_deref() {
            self.store.remove(id);
        }
    }

    pub fn clear(&mut self) {
        if let Some(id) = self.id.take() {
            self.store.remove(&id);
        }
    }
}

/// URL-safe random string from the system CSPRNG.
pub fn random_token() -> Result<String, AppError> {
    let mut bytes = [0u8; RANDOM_TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
