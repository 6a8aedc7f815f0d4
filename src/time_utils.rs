// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar dates.

use chrono::{Datelike, Local, NaiveDate};

/// Today's date in the server's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Academic term a calendar date most likely falls in: 1 through June, 2 after.
pub fn term_for_date(date: NaiveDate) -> u8 {
    if date.month() <= 6 {
        1
    } else {
        2
    }
}
