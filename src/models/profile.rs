// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Student profile and enrollment projections of SUAP responses.

use serde_json::Value;

use crate::models::fields::{as_int, as_label, as_text, first_present, result_items};

const REGISTRATION_FIELDS: &[&str] = &["matricula", "identificacao"];
const DISPLAY_NAME_FIELDS: &[&str] = &["nome_usual", "nome"];
const PHOTO_FIELDS: &[&str] = &["url_foto_150x200", "url_foto_75x100"];
const EMAIL_FIELDS: &[&str] = &["email", "email_academico", "email_preferencial"];

const COURSE_FIELDS: &[&str] = &["curso", "descricao", "nome_curso"];
const ENROLLMENT_STATUS_FIELDS: &[&str] = &["situacao", "situacao_matricula"];
const CAMPUS_FIELDS: &[&str] = &["campus", "campus_sigla", "uo"];

/// The signed-in user, as shown in the page header and profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub registration: String,
    pub display_name: String,
    /// Absolute photo URL.
    pub photo_url: Option<String>,
    pub email: Option<String>,
}

impl UserProfile {
    /// Project the "meus-dados" response.
    ///
    /// `suap_host` is prepended to photo URLs that SUAP returns as paths.
    pub fn from_raw(raw: &Value, suap_host: &str) -> Self {
        Self {
            registration: first_present(raw, REGISTRATION_FIELDS, as_text).unwrap_or_default(),
            display_name: first_present(raw, DISPLAY_NAME_FIELDS, as_text).unwrap_or_default(),
            photo_url: first_present(raw, PHOTO_FIELDS, as_text)
                .map(|url| absolutize_url(&url, suap_host)),
            email: first_present(raw, EMAIL_FIELDS, as_text),
        }
    }
}

/// Prefix relative URLs with `host`; absolute URLs pass through.
pub fn absolutize_url(url: &str, host: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    let host = host.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{host}{url}")
    } else {
        format!("{host}/{url}")
    }
}

/// The student's active program: the first entry of "meus-cursos".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseEnrollment {
    pub id: Option<i64>,
    pub course: String,
    pub status: Option<String>,
    pub campus: Option<String>,
}

impl CourseEnrollment {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: first_present(raw, &["id"], as_int),
            course: first_present(raw, COURSE_FIELDS, as_label).unwrap_or_default(),
            status: first_present(raw, ENROLLMENT_STATUS_FIELDS, as_label),
            campus: first_present(raw, CAMPUS_FIELDS, as_label),
        }
    }

    /// First enrollment of a list (or paginated) response.
    pub fn first_of(response: &Value) -> Option<Self> {
        result_items(response)?.first().map(Self::from_raw)
    }
}
