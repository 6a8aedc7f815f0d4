// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Nothing here is ever shown to the user in detail: errors turn into a
//! redirect or a generic error page and are logged server-side.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("SUAP API error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Upstream rejected the bearer token.
    pub const UPSTREAM_TOKEN_ERROR: &'static str = "SUAP rejected the access token";

    /// Whether this is an upstream failure caused by an expired or revoked token.
    pub fn is_upstream_token_error(&self) -> bool {
        matches!(self, AppError::Upstream(msg) if msg == Self::UPSTREAM_TOKEN_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Unauthorized => Redirect::temporary("/login").into_response(),
            AppError::OAuth(msg) => {
                tracing::error!(error = %msg, "OAuth login failed");
                Redirect::temporary("/").into_response()
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "SUAP API error");
                (StatusCode::BAD_GATEWAY, Html(crate::views::error_page())).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(crate::views::error_page()),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_unauthorized_redirects_to_login() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[test]
    fn test_oauth_error_redirects_home() {
        let response = AppError::OAuth("bad state".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response = AppError::Internal(anyhow::anyhow!("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
