// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered-candidate field lookup over loosely-shaped SUAP JSON.
//!
//! SUAP has renamed fields between API revisions, so most canonical values
//! are resolved by trying a list of dotted paths in order and taking the
//! first one that is present and coerces to the wanted type.

use serde_json::Value;

/// Resolve a dotted path such as `"diario.disciplina.carga_horaria"`.
///
/// Missing keys, non-object intermediates and JSON `null` all read as absent.
pub fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = raw;
    for key in path.split('.') {
        current = current.as_object()?.get(key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Return the first candidate that is present and coerces.
///
/// A value that is present but fails coercion is skipped, so a later
/// candidate can still supply it.
pub fn first_present<T>(
    raw: &Value,
    candidates: &[&str],
    coerce: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    candidates
        .iter()
        .find_map(|path| lookup(raw, path).and_then(&coerce))
}

/// Coerce to a non-negative integer.
///
/// Accepts JSON numbers (fractions are rounded) and numeric strings such as
/// `"60"`, `" 60 "`, `"60h"` or `"7,5"`.
pub fn as_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return u32::try_from(v).ok();
            }
            n.as_f64().and_then(float_to_count)
        }
        Value::String(s) => {
            let trimmed = s.trim().trim_end_matches(['h', 'H']).trim();
            if let Ok(v) = trimmed.parse::<u32>() {
                return Some(v);
            }
            trimmed
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .and_then(float_to_count)
        }
        _ => None,
    }
}

fn float_to_count(v: f64) -> Option<u32> {
    if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 {
        Some(v.round() as u32)
    } else {
        None
    }
}

/// Coerce to a signed integer (years, ids).
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerce a scalar to display text. Empty strings read as absent.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a value that is either a bare name or an object carrying one.
///
/// SUAP sometimes returns `"curso": "Informática"` and sometimes
/// `"curso": {"id": 1, "descricao": "Informática"}`.
pub fn as_label(value: &Value) -> Option<String> {
    if value.is_object() {
        first_present(value, &["descricao", "nome", "sigla"], as_text)
    } else {
        as_text(value)
    }
}

/// Items of a list response.
///
/// Handles both observed response shapes: a bare JSON array, or a
/// paginated object `{"count": .., "next": .., "results": [..]}`.
pub fn result_items(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(map) => map.get("results")?.as_array().map(Vec::as_slice),
        _ => None,
    }
}

/// URL of the next page of a paginated response, if any.
pub fn next_page(value: &Value) -> Option<&str> {
    value
        .get("next")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
