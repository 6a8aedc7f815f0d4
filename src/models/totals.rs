// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workload and attendance totals across a grade report.


use crate::models::GradeRecord;

/// Summed figures for a set of grade records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub workload_total: u64,
    pub classes_held_total: u64,
    pub absences_total: u64,
    /// Percentage of held classes attended. 100.0 when no classes were held.
    pub attendance_pct: f64,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            workload_total: 0,
            classes_held_total: 0,
            absences_total: 0,
            attendance_pct: 100.0,
        }
    }
}

/// Sum canonical fields over `records`.
///
/// Only integer sums feed the percentage, so the result does not depend on
/// record order.
pub fn aggregate<'a, I>(records: I) -> Totals
where
    I: IntoIterator<Item = &'a GradeRecord>,
{
    let (workload_total, classes_held_total, absences_total) =
        records
            .into_iter()
            .fold((0u64, 0u64, 0u64), |(workload, held, absences), r| {
                (
                    workload + u64::from(r.workload_hours),
                    held + u64::from(r.classes_held),
                    absences + u64::from(r.absences),
                )
            });

    Totals {
        workload_total,
        classes_held_total,
        absences_total,
        attendance_pct: attendance_percentage(classes_held_total, absences_total),
    }
}

/// `(held - absences) / held * 100`, or 100.0 when nothing was held.
pub fn attendance_percentage(classes_held: u64, absences: u64) -> f64 {
    if classes_held == 0 {
        return 100.0;
    }
    let held = classes_held as f64;
    (held - absences as f64) / held * 100.0
}
