// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page routes: landing, profile and grade report.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::period::{available_terms, available_years, report_periods, resolve_period};
use crate::models::{aggregate, PeriodSelection};
use crate::services::Session;
use crate::views::{self, BoletimView};
use crate::AppState;

/// Public pages.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home))
}

/// Pages behind the session guard (applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/perfil", get(profile))
        .route("/boletim", get(boletim))
}

/// Landing page, or straight to the profile when signed in.
async fn home(session: Session) -> Response {
    if session.is_authenticated() {
        return Redirect::temporary("/perfil").into_response();
    }
    Html(views::landing_page()).into_response()
}

async fn profile(State(state): State<Arc<AppState>>, session: Session) -> Result<Html<String>> {
    let (user, enrollment) = tokio::join!(
        state.suap.fetch_user(&session),
        state.suap.fetch_enrollment(&session)
    );
    ensure_signed_in(&session)?;

    if user.is_none() {
        tracing::warn!("Rendering profile without user data");
    }

    Ok(Html(views::profile_page(user.as_ref(), enrollment.as_ref())))
}

/// SUAP may have rejected the token mid-request, which ends the session.
fn ensure_signed_in(session: &Session) -> Result<()> {
    if session.is_authenticated() {
        Ok(())
    } else {
        tracing::info!("Session ended by SUAP, redirecting to login");
        Err(AppError::Unauthorized)
    }
}

// ─── Grade Report ────────────────────────────────────────────

/// `?ano=2024&periodo=1`. Non-numeric values are ignored.
#[derive(Debug, Default, Deserialize)]
struct BoletimQuery {
    #[serde(default)]
    ano: Option<String>,
    #[serde(default)]
    periodo: Option<String>,
}

impl BoletimQuery {
    fn selection(&self) -> PeriodSelection {
        PeriodSelection {
            year: self.ano.as_deref().and_then(|v| v.trim().parse().ok()),
            term: self.periodo.as_deref().and_then(|v| v.trim().parse().ok()),
        }
    }
}

async fn boletim(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<BoletimQuery>,
) -> Result<Html<String>> {
    let selection = query.selection();

    let (user, periods) = tokio::join!(
        state.suap.fetch_user(&session),
        state.suap.fetch_periods(&session)
    );
    ensure_signed_in(&session)?;

    let resolved = resolve_period(&periods, selection, crate::time_utils::today());

    let mut records = Vec::new();
    for period in report_periods(selection, resolved) {
        records.extend(state.suap.fetch_boletim(&session, period).await);
    }
    ensure_signed_in(&session)?;
    let totals = aggregate(&records);

    tracing::info!(
        period = %resolved,
        explicit = selection.is_explicit(),
        courses = records.len(),
        "Rendering grade report"
    );

    let years = available_years(&periods);
    let terms = available_terms(&periods, resolved.year);
    Ok(Html(views::boletim_page(&BoletimView {
        user: user.as_ref(),
        selected: resolved,
        single_term: selection.is_explicit(),
        years: &years,
        terms: &terms,
        records: &records,
        totals,
    })))
}
