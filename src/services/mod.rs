// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod oauth_state;
pub mod session_store;
pub mod suap;

pub use session_store::{OAuthToken, Session, SessionStore};
pub use suap::SuapClient;
