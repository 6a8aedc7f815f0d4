// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use suap_boletim::config::{BoletimEndpointStyle, Config};
use suap_boletim::middleware::session::{create_session_jwt, SESSION_COOKIE};
use suap_boletim::routes::create_router;
use suap_boletim::services::{OAuthToken, Session};
use suap_boletim::AppState;
use std::sync::Arc;
use wiremock::MockServer;

/// Bearer token handed out by [`signed_in_cookie`].
#[allow(dead_code)]
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Create a test app talking to `suap` instead of the real SUAP host.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(suap: &MockServer) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_style(suap, BoletimEndpointStyle::Path)
}

#[allow(dead_code)]
pub fn create_test_app_with_style(
    suap: &MockServer,
    style: BoletimEndpointStyle,
) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default().with_suap_base_url(&suap.uri());
    config.boletim_endpoint_style = style;

    let state = Arc::new(AppState::new(config).expect("Failed to build test state"));
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn test_token() -> OAuthToken {
    OAuthToken {
        access_token: TEST_ACCESS_TOKEN.to_string(),
        token_type: Some("Bearer".to_string()),
        expires_in: Some(36000),
        refresh_token: None,
        scope: Some("identificacao email documentos_pessoais".to_string()),
    }
}

/// A signed-in session in the store, as a handler would see it.
#[allow(dead_code)]
pub fn signed_in_session(state: &AppState) -> Session {
    let mut session = Session::anonymous(state.sessions.clone());
    session
        .set_token(test_token())
        .expect("Failed to store test session");
    session
}

/// `Cookie` header value for a freshly signed-in browser.
#[allow(dead_code)]
pub fn signed_in_cookie(state: &AppState) -> String {
    let session = signed_in_session(state);
    let id = session.id().expect("session id after set_token");
    let jwt = create_session_jwt(id, &state.config.jwt_signing_key, state.config.session_ttl())
        .expect("Failed to sign session cookie");
    format!("{SESSION_COOKIE}={jwt}")
}
