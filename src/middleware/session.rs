// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie handling and the authentication guard.
//!
//! The cookie carries an HS256 JWT whose subject is the server-side session
//! id. A missing, forged or expired cookie simply yields an anonymous
//! session.

use crate::services::session_store::Session;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "suap_session";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (server-side session id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let id = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| decode_session_jwt(cookie.value(), &state.config.jwt_signing_key));

        Ok(Session::new(id, state.sessions.clone()))
    }
}

/// Middleware for pages that need a signed-in user: redirect to `/login` otherwise.
pub async fn require_session(session: Session, request: Request, next: Next) -> Response {
    if !session.is_authenticated() {
        tracing::debug!(path = %request.uri().path(), "No session, redirecting to login");
        return Redirect::temporary("/login").into_response();
    }
    next.run(request).await
}

/// Create the JWT stored in the session cookie.
pub fn create_session_jwt(
    session_id: &str,
    signing_key: &[u8],
    ttl: chrono::Duration,
) -> anyhow::Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: session_id.to_string(),
        iat: usize::try_from(now.timestamp())?,
        exp: usize::try_from((now + ttl).timestamp())?,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Session id from a cookie JWT, if the signature and expiry check out.
pub fn decode_session_jwt(token: &str, signing_key: &[u8]) -> Option<String> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims.sub)
}

/// Session cookie carrying `jwt`.
pub fn session_cookie(jwt: String, secure: bool, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, jwt))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Cookie that clears the session cookie. Attributes match [`session_cookie`].
pub fn session_removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}
