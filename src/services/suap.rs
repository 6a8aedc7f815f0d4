// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SUAP API client.
//!
//! Handles:
//! - Authenticated GETs against the REST API with the session's bearer token
//! - Shape detection for list and paginated responses
//! - The OAuth authorization-code exchange
//!
//! Read calls never fail outward: every failure is logged and surfaces as
//! "no data" (`None` or an empty list). A 401 from SUAP also ends the
//! caller's session.

use serde_json::Value;
use std::time::Duration;

use crate::config::{BoletimEndpointStyle, Config};
use crate::error::AppError;
use crate::models::fields::{next_page, result_items};
use crate::models::grade::normalize_grade_records;
use crate::models::period::normalize_periods;
use crate::models::{CourseEnrollment, GradeRecord, Period, UserProfile};
use crate::services::session_store::{OAuthToken, Session};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on pages followed for one paginated listing.
const MAX_PAGES: usize = 20;

/// Endpoint paths relative to the API root.
pub mod endpoints {
    pub const MY_DATA: &str = "minhas-informacoes/meus-dados/";
    pub const MY_COURSES: &str = "minhas-informacoes/meus-cursos/";
    pub const MY_PERIODS: &str = "minhas-informacoes/meus-periodos-letivos/";
    pub const BOLETIM: &str = "minhas-informacoes/boletim/";

    /// Path-parameterized grade report for one period.
    pub fn boletim_for(year: i32, term: u8) -> String {
        format!("{}{}/{}/", BOLETIM, year, term)
    }
}

/// SUAP API client.
#[derive(Clone)]
pub struct SuapClient {
    http: reqwest::Client,
    api_base_url: String,
    token_url: String,
    suap_host: String,
    client_id: String,
    client_secret: String,
    boletim_style: BoletimEndpointStyle,
}

impl SuapClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url(),
            token_url: config.token_url(),
            suap_host: config.suap_base_url.clone(),
            client_id: config.suap_client_id.clone(),
            client_secret: config.suap_client_secret.clone(),
            boletim_style: config.boletim_endpoint_style,
        })
    }

    /// GET `{api_base_url}{endpoint}` with the session's token.
    ///
    /// Returns `None` without touching the network when the session has no
    /// token, and `None` (logged) on any transport, status or JSON failure.
    pub async fn get(
        &self,
        session: &Session,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Option<Value> {
        let token = session.get_token()?;
        let url = format!("{}{}", self.api_base_url, endpoint.trim_start_matches('/'));

        match self.get_json(&url, &token.access_token, query).await {
            Ok(value) => Some(value),
            Err(e) => {
                self.handle_failure(session, endpoint, &e);
                None
            }
        }
    }

    /// Log a failed read. A rejected token ends the session, so the
    /// handler sees it as signed out and sends the user back to login.
    fn handle_failure(&self, session: &Session, endpoint: &str, error: &AppError) {
        if error.is_upstream_token_error() {
            tracing::warn!(endpoint, "SUAP rejected the access token, ending session");
            session.invalidate();
        } else {
            tracing::warn!(endpoint, error = %error, "SUAP request failed");
        }
    }

    /// Items of a list endpoint, following `next` links of paginated responses.
    ///
    /// Only `next` URLs under the API root are followed, so the bearer token
    /// is never sent elsewhere.
    async fn get_items(
        &self,
        session: &Session,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Vec<Value> {
        let Some(first) = self.get(session, endpoint, query).await else {
            return Vec::new();
        };
        let Some(items) = result_items(&first) else {
            tracing::warn!(endpoint, "Unexpected SUAP response shape, expected a list");
            return Vec::new();
        };

        let mut all = items.to_vec();
        let mut next = next_page(&first).map(str::to_string);
        let mut pages = 1;

        while let Some(url) = next.take() {
            if pages >= MAX_PAGES {
                tracing::warn!(endpoint, pages, "Pagination limit reached");
                break;
            }
            if !url.starts_with(&self.api_base_url) {
                tracing::warn!(endpoint, next = %url, "Refusing to follow off-site pagination link");
                break;
            }
            let Some(token) = session.get_token() else {
                break;
            };
            match self.get_json(&url, &token.access_token, &[]).await {
                Ok(page) => {
                    if let Some(items) = result_items(&page) {
                        all.extend_from_slice(items);
                    }
                    next = next_page(&page).map(str::to_string);
                    pages += 1;
                }
                Err(e) => {
                    self.handle_failure(session, endpoint, &e);
                    break;
                }
            }
        }

        all
    }

    // ─── Typed Fetches ───────────────────────────────────────────

    /// Signed-in user's profile.
    pub async fn fetch_user(&self, session: &Session) -> Option<UserProfile> {
        let raw = self.get(session, endpoints::MY_DATA, &[]).await?;
        Some(UserProfile::from_raw(&raw, &self.suap_host))
    }

    /// The student's first (active) enrollment.
    pub async fn fetch_enrollment(&self, session: &Session) -> Option<CourseEnrollment> {
        let raw = self.get(session, endpoints::MY_COURSES, &[]).await?;
        CourseEnrollment::first_of(&raw)
    }

    /// Periods the student has grades in, most recent first.
    pub async fn fetch_periods(&self, session: &Session) -> Vec<Period> {
        let raw = self.get_items(session, endpoints::MY_PERIODS, &[]).await;
        normalize_periods(&raw)
    }

    /// Normalized grade report for one period.
    pub async fn fetch_boletim(&self, session: &Session, period: Period) -> Vec<GradeRecord> {
        let raw = match self.boletim_style {
            BoletimEndpointStyle::Path => {
                let endpoint = endpoints::boletim_for(period.year, period.term);
                self.get_items(session, &endpoint, &[]).await
            }
            BoletimEndpointStyle::Query => {
                let query = [
                    ("ano_letivo", period.year.to_string()),
                    ("periodo_letivo", period.term.to_string()),
                ];
                self.get_items(session, endpoints::BOLETIM, &query).await
            }
        };

        tracing::debug!(%period, count = raw.len(), "Fetched grade report");
        normalize_grade_records(&raw)
    }

    // ─── OAuth ───────────────────────────────────────────────────

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<OAuthToken, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "SUAP token exchange failed");
            return Err(AppError::OAuth(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let token: OAuthToken = response
            .json()
            .await
            .map_err(|e| AppError::OAuth(format!("Failed to parse token response: {}", e)))?;

        if token.access_token.is_empty() {
            return Err(AppError::OAuth("Token response without access_token".to_string()));
        }
        Ok(token)
    }

    // ─── HTTP ────────────────────────────────────────────────────

    async fn get_json(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<Value, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json(&self, response: reqwest::Response) -> Result<Value, AppError> {
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "SUAP returned an error status");

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(AppError::Upstream(AppError::UPSTREAM_TOKEN_ERROR.to_string()));
            }
            return Err(AppError::Upstream(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))
    }
}
