// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth login, callback and logout flow tests.
//!
//! Drives the router through the full SUAP authorization-code dance with
//! the token endpoint and API mocked.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

const HOST: &str = "localhost:5000";

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

/// `name=value` part of a Set-Cookie header.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().to_string()
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

async fn send(app: &axum::Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri).header(header::HOST, HOST);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Start a login and return `(state param, nonce cookie pair)`.
async fn start_login(app: &axum::Router) -> (String, String) {
    let response = send(app, "/login", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = location(&response);
    let state = location
        .split("state=")
        .nth(1)
        .expect("state param in authorize URL")
        .to_string();
    let nonce = find_cookie(&set_cookie_headers(&response), "suap_oauth_nonce")
        .expect("nonce cookie on login");

    (state, cookie_pair(&nonce))
}

#[tokio::test]
async fn test_home_renders_landing_without_session() {
    let suap = MockServer::start().await;
    let (app, _) = common::create_test_app(&suap);

    let response = send(&app, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Log in with SUAP"));
}

#[tokio::test]
async fn test_home_redirects_signed_in_user_to_profile() {
    let suap = MockServer::start().await;
    let (app, state) = common::create_test_app(&suap);
    let cookie = common::signed_in_cookie(&state);

    let response = send(&app, "/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/perfil");
}

#[tokio::test]
async fn test_profile_requires_session() {
    let suap = MockServer::start().await;
    let (app, _) = common::create_test_app(&suap);

    let response = send(&app, "/perfil", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_forged_session_cookie_is_anonymous() {
    let suap = MockServer::start().await;
    let (app, _) = common::create_test_app(&suap);

    let response = send(&app, "/perfil", Some("suap_session=not.a.jwt")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_redirects_to_suap_authorize() {
    let suap = MockServer::start().await;
    let (app, _) = common::create_test_app(&suap);

    let response = send(&app, "/login", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = location(&response);
    assert!(location.starts_with(&format!("{}/o/authorize/?response_type=code", suap.uri())));
    assert!(location.contains("client_id=test_client_id"));
    assert!(location.contains(
        "redirect_uri=http%3A%2F%2Flocalhost%3A5000%2Flogin%2Fauthorized"
    ));
    assert!(location.contains("scope=identificacao%20email%20documentos_pessoais"));
    assert!(location.contains("state="));

    let nonce = find_cookie(&set_cookie_headers(&response), "suap_oauth_nonce").unwrap();
    assert!(nonce.contains("Path=/login/authorized"));
    assert!(nonce.contains("HttpOnly"));
    assert!(!nonce.contains("Secure"));
}

#[tokio::test]
async fn test_callback_completes_login() {
    let suap = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .and(body_string_contains("code=good-code"))
        .and(body_string_contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A5000%2Flogin%2Fauthorized",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "issued-token",
            "token_type": "Bearer",
            "expires_in": 36000,
            "scope": "identificacao email documentos_pessoais"
        })))
        .expect(1)
        .mount(&suap)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/minhas-informacoes/meus-dados/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matricula": "20231011110001",
            "nome_usual": "Ana Souza"
        })))
        .mount(&suap)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/minhas-informacoes/meus-cursos/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "curso": {"descricao": "Informática para Internet"}, "situacao": "Matriculado"}
        ])))
        .mount(&suap)
        .await;

    let (app, state) = common::create_test_app(&suap);
    let (oauth_state, nonce) = start_login(&app).await;

    let response = send(
        &app,
        &format!("/login/authorized?code=good-code&state={oauth_state}"),
        Some(&nonce),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/perfil");
    assert_eq!(state.sessions.len(), 1);

    let set_cookies = set_cookie_headers(&response);
    let session_cookie = find_cookie(&set_cookies, "suap_session").expect("session cookie");
    assert!(session_cookie.contains("HttpOnly"));
    assert!(session_cookie.contains("Path=/"));
    let nonce_removal = find_cookie(&set_cookies, "suap_oauth_nonce").unwrap();
    assert!(nonce_removal.contains("Max-Age=0"));

    // The new session works on protected pages.
    let response = send(&app, "/perfil", Some(&cookie_pair(&session_cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Ana Souza"));
    assert!(html.contains("Informática para Internet"));
}

#[tokio::test]
async fn test_callback_with_tampered_state_redirects_home() {
    let suap = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "x"})))
        .expect(0)
        .mount(&suap)
        .await;

    let (app, state) = common::create_test_app(&suap);
    let (_, nonce) = start_login(&app).await;

    let response = send(
        &app,
        "/login/authorized?code=good-code&state=Zm9yZ2Vk",
        Some(&nonce),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
    assert!(find_cookie(&set_cookie_headers(&response), "suap_session").is_none());
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_callback_without_nonce_cookie_redirects_home() {
    let suap = MockServer::start().await;
    let (app, state) = common::create_test_app(&suap);
    let (oauth_state, _) = start_login(&app).await;

    let response = send(
        &app,
        &format!("/login/authorized?code=good-code&state={oauth_state}"),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_callback_denied_by_user_redirects_home() {
    let suap = MockServer::start().await;
    let (app, state) = common::create_test_app(&suap);
    let (oauth_state, nonce) = start_login(&app).await;

    let response = send(
        &app,
        &format!("/login/authorized?error=access_denied&state={oauth_state}"),
        Some(&nonce),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_callback_token_exchange_failure_redirects_home() {
    let suap = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .expect(1)
        .mount(&suap)
        .await;

    let (app, state) = common::create_test_app(&suap);
    let (oauth_state, nonce) = start_login(&app).await;

    let response = send(
        &app,
        &format!("/login/authorized?code=stale&state={oauth_state}"),
        Some(&nonce),
    )
    .await;

    assert_eq!(location(&response), "/");
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let suap = MockServer::start().await;
    let (app, state) = common::create_test_app(&suap);
    let cookie = common::signed_in_cookie(&state);
    assert_eq!(state.sessions.len(), 1);

    let response = send(&app, "/logout", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
    assert!(state.sessions.is_empty());

    let removal = find_cookie(&set_cookie_headers(&response), "suap_session").unwrap();
    assert!(removal.contains("Max-Age=0"));
    assert!(removal.contains("Path=/"));

    // The old cookie no longer opens protected pages.
    let response = send(&app, "/perfil", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logout_without_session_is_harmless() {
    let suap = MockServer::start().await;
    let (app, _) = common::create_test_app(&suap);

    let response = send(&app, "/logout", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_pages_carry_security_headers() {
    let suap = MockServer::start().await;
    let (app, _) = common::create_test_app(&suap);

    let response = send(&app, "/", None).await;
    let headers = response.headers();
    assert!(headers.contains_key("content-security-policy"));
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
}
