// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Grade-report ("boletim") records and their normalization.
//!
//! The same course row has come back from SUAP with different field names
//! for workload, absences and grades. [`normalize_grade_record`] maps any of
//! those shapes onto one canonical [`GradeRecord`]. It is pure and total:
//! missing or malformed fields fall back to documented defaults.

use serde_json::Value;

use crate::models::fields::{as_count, as_label, as_text, first_present, lookup};

/// Grading stages ("bimestres") per period.
pub const MAX_STAGES: u8 = 4;

pub const DEFAULT_COURSE: &str = "-";
pub const DEFAULT_FINAL_AVERAGE: &str = "-";
pub const DEFAULT_STATUS: &str = "In progress";

const COURSE_FIELDS: &[&str] = &["disciplina", "diario.disciplina", "descricao"];

const WORKLOAD_FIELDS: &[&str] = &[
    "carga_horaria",
    "ch_total",
    "componente_curricular_ch",
    "disciplina.carga_horaria",
    "diario.disciplina.carga_horaria",
];

const ABSENCE_FIELDS: &[&str] = &["numero_faltas", "faltas", "total_faltas"];

const CLASSES_HELD_FIELDS: &[&str] = &["carga_horaria_cumprida", "aulas_dadas", "total_aulas"];

const FINAL_AVERAGE_FIELDS: &[&str] = &["media_final_disciplina", "media_disciplina", "media_final"];

const STATUS_FIELDS: &[&str] = &["situacao", "situacao_disciplina"];

/// Keys under which a structured stage grade carries its value.
const STAGE_GRADE_KEYS: &[&str] = &["nota", "grade"];

/// Grade for one stage of the period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermGrade {
    /// Stage number, 1-based.
    pub stage: u8,
    pub grade: String,
}

impl TermGrade {
    /// Human label, e.g. "2nd term".
    pub fn label(&self) -> String {
        stage_label(self.stage)
    }
}

/// Column label for a grading stage.
pub fn stage_label(stage: u8) -> String {
    format!("{} term", ordinal(stage))
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Canonical grade-report row: one course in one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRecord {
    pub course: String,
    pub workload_hours: u32,
    pub absences: u32,
    pub classes_held: u32,
    /// Stage grades in stage order. Sparse: stages without a grade are omitted.
    pub grades: Vec<TermGrade>,
    pub final_average: String,
    pub status: String,
}

impl GradeRecord {
    /// Grade for a given stage, if the upstream record had one.
    pub fn grade_for(&self, stage: u8) -> Option<&str> {
        self.grades
            .iter()
            .find(|g| g.stage == stage)
            .map(|g| g.grade.as_str())
    }
}

/// Normalize one raw SUAP grade-report row.
pub fn normalize_grade_record(raw: &Value) -> GradeRecord {
    GradeRecord {
        course: first_present(raw, COURSE_FIELDS, as_label)
            .unwrap_or_else(|| DEFAULT_COURSE.to_string()),
        workload_hours: first_present(raw, WORKLOAD_FIELDS, as_count).unwrap_or(0),
        absences: first_present(raw, ABSENCE_FIELDS, as_count).unwrap_or(0),
        classes_held: first_present(raw, CLASSES_HELD_FIELDS, as_count).unwrap_or(0),
        grades: (1..=MAX_STAGES)
            .filter_map(|stage| {
                stage_grade(raw, stage).map(|grade| TermGrade { stage, grade })
            })
            .collect(),
        final_average: first_present(raw, FINAL_AVERAGE_FIELDS, as_text)
            .unwrap_or_else(|| DEFAULT_FINAL_AVERAGE.to_string()),
        status: first_present(raw, STATUS_FIELDS, as_text)
            .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
    }
}

/// Normalize every row of a grade report.
pub fn normalize_grade_records(raw: &[Value]) -> Vec<GradeRecord> {
    raw.iter().map(normalize_grade_record).collect()
}

/// `nota_etapa_N` is either `{"nota": 8.5, "faltas": 2}` or a bare scalar.
fn stage_grade(raw: &Value, stage: u8) -> Option<String> {
    let value = lookup(raw, &format!("nota_etapa_{stage}"))?;
    if value.is_object() {
        first_present(value, STAGE_GRADE_KEYS, as_text)
    } else {
        as_text(value)
    }
}
