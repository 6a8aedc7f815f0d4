// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod fields;
pub mod grade;
pub mod period;
pub mod profile;
pub mod totals;

pub use grade::{normalize_grade_record, normalize_grade_records, GradeRecord, TermGrade};
pub use period::{Period, PeriodSelection};
pub use profile::{CourseEnrollment, UserProfile};
pub use totals::{aggregate, Totals};
