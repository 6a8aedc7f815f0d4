// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered HTML pages.
//!
//! Every dynamic value goes through [`escape`]; SUAP data is not trusted.

use std::fmt::Write as _;

use crate::models::grade::{stage_label, MAX_STAGES};
use crate::models::{CourseEnrollment, GradeRecord, Period, Totals, UserProfile};

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;color:#1d1d1d}\
header{display:flex;justify-content:space-between;align-items:center;padding:.75rem 1.5rem;background:#2f7d32;color:#fff}\
header a{color:#fff;margin-left:1rem}main{padding:1.5rem}\
table{border-collapse:collapse;width:100%}th,td{border:1px solid #ccc;padding:.4rem .6rem;text-align:left}\
tfoot td{font-weight:bold}.empty{color:#666}.photo{border-radius:6px}";

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user: Option<&UserProfile>, body: &str) -> String {
    let nav = match user {
        Some(user) => format!(
            "<nav><span class=\"user\">{}</span><a href=\"/perfil\">Profile</a><a href=\"/boletim\">Grade report</a><a href=\"/logout\">Log out</a></nav>",
            escape(&user.display_name)
        ),
        None => "<nav><a href=\"/login\">Log in with SUAP</a></nav>".to_string(),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} · SUAP Boletim</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><strong>SUAP Boletim</strong>{nav}</header>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// Landing page for visitors without a session.
pub fn landing_page() -> String {
    layout(
        "Welcome",
        None,
        "<h1>Your grades, at a glance</h1>\n\
         <p>Sign in with your SUAP account to see your profile and grade report.</p>\n\
         <p><a href=\"/login\">Log in with SUAP</a></p>",
    )
}

/// Profile page. Missing data (upstream failure) renders as a notice.
pub fn profile_page(user: Option<&UserProfile>, enrollment: Option<&CourseEnrollment>) -> String {
    let mut body = String::from("<h1>Profile</h1>\n");

    match user {
        Some(user) => {
            if let Some(photo) = &user.photo_url {
                let _ = writeln!(
                    body,
                    "<img class=\"photo\" src=\"{}\" alt=\"Photo\" width=\"150\" height=\"200\">",
                    escape(photo)
                );
            }
            let _ = writeln!(body, "<dl>");
            let _ = writeln!(body, "<dt>Name</dt><dd id=\"name\">{}</dd>", escape(&user.display_name));
            let _ = writeln!(
                body,
                "<dt>Registration</dt><dd id=\"registration\">{}</dd>",
                escape(&user.registration)
            );
            if let Some(email) = &user.email {
                let _ = writeln!(body, "<dt>Email</dt><dd>{}</dd>", escape(email));
            }
            let _ = writeln!(body, "</dl>");
        }
        None => body.push_str("<p class=\"empty\">Profile data is unavailable right now.</p>\n"),
    }

    body.push_str("<h2>Program</h2>\n");
    match enrollment {
        Some(enrollment) => {
            let _ = writeln!(body, "<dl>");
            let _ = writeln!(
                body,
                "<dt>Course</dt><dd id=\"course\">{}</dd>",
                escape(&enrollment.course)
            );
            if let Some(status) = &enrollment.status {
                let _ = writeln!(body, "<dt>Status</dt><dd>{}</dd>", escape(status));
            }
            if let Some(campus) = &enrollment.campus {
                let _ = writeln!(body, "<dt>Campus</dt><dd>{}</dd>", escape(campus));
            }
            let _ = writeln!(body, "</dl>");
        }
        None => body.push_str("<p class=\"empty\">No enrollment found.</p>\n"),
    }

    layout("Profile", user, &body)
}

/// Data shown on the grade-report page.
pub struct BoletimView<'a> {
    pub user: Option<&'a UserProfile>,
    /// Period the report was resolved to.
    pub selected: Period,
    /// Whether only `selected.term` was fetched, rather than the whole year.
    pub single_term: bool,
    /// Years offered in the selector, most recent first.
    pub years: &'a [i32],
    /// Terms of the selected year offered in the selector, ascending.
    pub terms: &'a [u8],
    pub records: &'a [GradeRecord],
    pub totals: Totals,
}

/// Grade-report page with per-course rows and a totals footer.
pub fn boletim_page(view: &BoletimView<'_>) -> String {
    let mut body = String::new();

    let heading = if view.single_term {
        format!("Grade report {}", view.selected)
    } else {
        format!("Grade report {}", view.selected.year)
    };
    let _ = writeln!(body, "<h1>{}</h1>", escape(&heading));

    body.push_str(&period_form(view));

    if view.records.is_empty() {
        body.push_str("<p class=\"empty\">No grades found for this period.</p>\n");
    } else {
        body.push_str("<table>\n<thead><tr><th>Course</th>");
        for stage in 1..=MAX_STAGES {
            let _ = write!(body, "<th>{}</th>", escape(&stage_label(stage)));
        }
        body.push_str(
            "<th>Final average</th><th>Workload (h)</th><th>Classes held</th><th>Absences</th><th>Status</th></tr></thead>\n<tbody>\n",
        );

        for record in view.records {
            let _ = write!(body, "<tr><td>{}</td>", escape(&record.course));
            for stage in 1..=MAX_STAGES {
                let _ = write!(body, "<td>{}</td>", escape(record.grade_for(stage).unwrap_or("-")));
            }
            let _ = writeln!(
                body,
                "<td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&record.final_average),
                record.workload_hours,
                record.classes_held,
                record.absences,
                escape(&record.status),
            );
        }
        body.push_str("</tbody>\n");

        let _ = writeln!(
            body,
            "<tfoot><tr><td colspan=\"{}\">Totals</td>\
             <td id=\"total-workload\">{}</td><td id=\"total-classes\">{}</td>\
             <td id=\"total-absences\">{}</td><td id=\"attendance\">{:.1}%</td></tr></tfoot>",
            usize::from(MAX_STAGES) + 2,
            view.totals.workload_total,
            view.totals.classes_held_total,
            view.totals.absences_total,
            view.totals.attendance_pct,
        );
        body.push_str("</table>\n");
    }

    layout("Grade report", view.user, &body)
}

fn period_form(view: &BoletimView<'_>) -> String {
    let mut years: Vec<i32> = view.years.to_vec();
    if !years.contains(&view.selected.year) {
        years.push(view.selected.year);
        years.sort_unstable_by(|a, b| b.cmp(a));
    }

    let mut form = String::from("<form method=\"get\" action=\"/boletim\">\n<label>Year <select name=\"ano\">");
    for year in years {
        let selected = if year == view.selected.year { " selected" } else { "" };
        let _ = write!(form, "<option value=\"{year}\"{selected}>{year}</option>");
    }
    form.push_str("</select></label>\n<label>Term <select name=\"periodo\">");
    let all_selected = if view.single_term { "" } else { " selected" };
    let _ = write!(form, "<option value=\"\"{all_selected}>Whole year</option>");
    let mut terms: Vec<u8> = view.terms.to_vec();
    if view.single_term && !terms.contains(&view.selected.term) {
        terms.push(view.selected.term);
        terms.sort_unstable();
    }
    for term in terms {
        let selected = if view.single_term && term == view.selected.term {
            " selected"
        } else {
            ""
        };
        let _ = write!(form, "<option value=\"{term}\"{selected}>{term}</option>");
    }
    form.push_str("</select></label>\n<button type=\"submit\">Show</button>\n</form>\n");
    form
}

/// Generic failure page. Carries no error detail.
pub fn error_page() -> String {
    layout(
        "Error",
        None,
        "<h1>Something went wrong</h1>\n<p>Please try again later.</p>\n<p><a href=\"/\">Home</a></p>",
    )
}
