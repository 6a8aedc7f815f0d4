// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SUAP OAuth login, callback and logout routes.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::session::{create_session_jwt, session_cookie, session_removal_cookie};
use crate::services::oauth_state::{sign_state, verify_state, STATE_MAX_AGE_MS};
use crate::services::session_store::{random_token, Session};
use crate::AppState;

pub const CALLBACK_PATH: &str = "/login/authorized";
pub const NONCE_COOKIE: &str = "suap_oauth_nonce";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route(CALLBACK_PATH, get(authorized))
        .route("/logout", get(logout))
}

/// Start OAuth flow - redirect to the SUAP authorization page.
async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let origin = external_origin(&headers, &state.config);
    let callback_url = format!("{}{}", origin, CALLBACK_PATH);

    let nonce = random_token()?;
    let oauth_state = sign_state(
        &nonce,
        chrono::Utc::now().timestamp_millis(),
        &state.config.oauth_state_key,
    )?;

    let auth_url = format!(
        "{}?\
         response_type=code&\
         client_id={}&\
         redirect_uri={}&\
         scope={}&\
         state={}",
        state.config.authorize_url(),
        urlencoding::encode(&state.config.suap_client_id),
        urlencoding::encode(&callback_url),
        urlencoding::encode(&state.config.oauth_scope),
        oauth_state
    );

    tracing::info!(
        client_id = %state.config.suap_client_id,
        callback_url = %callback_url,
        "Starting OAuth flow, redirecting to SUAP"
    );

    let jar = jar.add(nonce_cookie(nonce, is_secure(&origin)));
    Ok((jar, Redirect::temporary(&auth_url)))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for a token and start a session.
///
/// Any failure sends the user home; the reason only goes to the log.
async fn authorized(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    mut session: Session,
    Query(params): Query<CallbackParams>,
) -> Response {
    let origin = external_origin(&headers, &state.config);
    let secure = is_secure(&origin);
    let jar = jar.remove(nonce_removal_cookie(secure));

    match complete_login(&state, &origin, &headers, &mut session, params).await {
        Ok(session_id) => {
            let ttl = state.config.session_ttl();
            match create_session_jwt(&session_id, &state.config.jwt_signing_key, ttl) {
                Ok(jwt) => {
                    tracing::info!("OAuth successful, session started");
                    let jar = jar.add(session_cookie(jwt, secure, ttl));
                    (jar, Redirect::temporary("/perfil")).into_response()
                }
                Err(e) => {
                    session.clear();
                    tracing::error!(error = %e, "Session cookie creation failed");
                    (jar, Redirect::temporary("/")).into_response()
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "OAuth authorization failed");
            (jar, Redirect::temporary("/")).into_response()
        }
    }
}

async fn complete_login(
    state: &Arc<AppState>,
    origin: &str,
    headers: &HeaderMap,
    session: &mut Session,
    params: CallbackParams,
) -> Result<String> {
    if let Some(error) = params.error {
        return Err(AppError::OAuth(format!("Provider returned error: {}", error)));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::OAuth("Missing authorization code".to_string()))?;
    let returned_state = params
        .state
        .ok_or_else(|| AppError::OAuth("Missing state".to_string()))?;

    let jar = CookieJar::from_headers(headers);
    let nonce = jar
        .get(NONCE_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::OAuth("Missing nonce cookie".to_string()))?;

    verify_state(
        &returned_state,
        &nonce,
        &state.config.oauth_state_key,
        chrono::Utc::now().timestamp_millis(),
    )?;

    tracing::info!("Exchanging authorization code for token");

    let callback_url = format!("{}{}", origin, CALLBACK_PATH);
    let token = state.suap.exchange_code(&code, &callback_url).await?;

    session.set_token(token)
}

/// Logout - drop the stored token and the cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    mut session: Session,
) -> (CookieJar, Redirect) {
    session.clear();
    let secure = is_secure(&external_origin(&headers, &state.config));
    (
        jar.remove(session_removal_cookie(secure)),
        Redirect::temporary("/"),
    )
}

/// Scheme and host this app is reached at.
///
/// `PUBLIC_URL` wins; otherwise built from the `Host` header, using plain
/// HTTP only for localhost.
pub fn external_origin(headers: &HeaderMap, config: &Config) -> String {
    if let Some(public_url) = &config.public_url {
        return public_url.clone();
    }

    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:5000");

    let scheme = if host.starts_with("localhost") || host.starts_with("127.0.0.1") {
        "http"
    } else {
        "https"
    };
    format!("{}://{}", scheme, host)
}

fn is_secure(origin: &str) -> bool {
    origin.starts_with("https://")
}

fn nonce_cookie(nonce: String, secure: bool) -> Cookie<'static> {
    Cookie::build((NONCE_COOKIE, nonce))
        .path(CALLBACK_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::milliseconds(STATE_MAX_AGE_MS))
        .build()
}

fn nonce_removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((NONCE_COOKIE, ""))
        .path(CALLBACK_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}
