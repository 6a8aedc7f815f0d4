// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! SUAP Boletim: a student's profile and grade report from SUAP.
//!
//! This crate signs students in through SUAP OAuth2, fetches their data
//! from the SUAP REST API and normalizes the inconsistently-shaped grade
//! records into one canonical form with attendance totals.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use error::AppError;
use services::{SessionStore, SuapClient};

/// Shared application state, built once at startup.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub suap: SuapClient,
}

impl AppState {
    /// Wire up the session store and SUAP client from `config`.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let sessions = SessionStore::new(config.session_ttl());
        let suap = SuapClient::new(&config)?;
        Ok(Self {
            config,
            sessions,
            suap,
        })
    }
}
