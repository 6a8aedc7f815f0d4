// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Academic periods ("períodos letivos") and report period selection.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::models::fields::{as_int, first_present};
use crate::time_utils::term_for_date;

const YEAR_FIELDS: &[&str] = &["ano_letivo", "ano"];
const TERM_FIELDS: &[&str] = &["periodo_letivo", "periodo", "semestre"];

/// Sub-periods a year-wide report covers.
const REPORT_TERMS: [u8; 2] = [1, 2];

/// An academic term, ordered by `(year, term)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub term: u8,
}

impl Period {
    pub fn new(year: i32, term: u8) -> Self {
        Self { year, term }
    }

    /// Parse one entry of the periods endpoint.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let year = first_present(raw, YEAR_FIELDS, as_int)?;
        let term = first_present(raw, TERM_FIELDS, as_int)?;
        Some(Self {
            year: i32::try_from(year).ok()?,
            term: u8::try_from(term).ok().filter(|t| *t > 0)?,
        })
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.year, self.term)
    }
}

/// Parse the periods endpoint, most recent first, without duplicates.
///
/// Entries without a usable year and term are dropped.
pub fn normalize_periods(raw: &[Value]) -> Vec<Period> {
    let mut periods: Vec<Period> = raw.iter().filter_map(Period::from_raw).collect();
    periods.sort_unstable_by(|a, b| b.cmp(a));
    periods.dedup();
    periods
}

/// Distinct years, most recent first.
pub fn available_years(periods: &[Period]) -> Vec<i32> {
    let mut years: Vec<i32> = periods.iter().map(|p| p.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Terms listed for `year`, ascending. Falls back to terms 1 and 2 when
/// SUAP lists none.
pub fn available_terms(periods: &[Period], year: i32) -> Vec<u8> {
    let mut terms: Vec<u8> = periods
        .iter()
        .filter(|p| p.year == year)
        .map(|p| p.term)
        .collect();
    if terms.is_empty() {
        return REPORT_TERMS.to_vec();
    }
    terms.sort_unstable();
    terms.dedup();
    terms
}

/// Year and term requested by the caller, either of which may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodSelection {
    pub year: Option<i32>,
    pub term: Option<u8>,
}

impl PeriodSelection {
    /// Both year and term were given.
    pub fn is_explicit(&self) -> bool {
        self.year.is_some() && self.term.is_some()
    }
}

/// Pick the period a grade report is for.
///
/// An explicit `(year, term)` is used as-is, even if SUAP never listed it.
/// A bare year takes its latest listed term. Otherwise the latest listed
/// period wins, and with nothing listed the period is guessed from `today`.
pub fn resolve_period(available: &[Period], selection: PeriodSelection, today: NaiveDate) -> Period {
    match (selection.year, selection.term) {
        (Some(year), Some(term)) => Period::new(year, term),
        (Some(year), None) => available
            .iter()
            .filter(|p| p.year == year)
            .max()
            .copied()
            .unwrap_or_else(|| Period::new(year, term_for_date(today))),
        _ => available
            .iter()
            .max()
            .copied()
            .unwrap_or_else(|| Period::new(today.year(), term_for_date(today))),
    }
}

/// Periods to fetch for a report on `resolved`.
///
/// An explicit selection fetches exactly that term; otherwise both
/// sub-periods of the resolved year are fetched and merged.
pub fn report_periods(selection: PeriodSelection, resolved: Period) -> Vec<Period> {
    if selection.is_explicit() {
        vec![resolved]
    } else {
        REPORT_TERMS
            .iter()
            .map(|term| Period::new(resolved.year, *term))
            .collect()
    }
}
