//! Small text helpers for presenting calendar values.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// `dd/mm/yyyy HH:MM` in the instant's own time zone.
pub fn format_time<Z: TimeZone>(time: &DateTime<Z>) -> String
where
    Z::Offset: Display,
{
    time.format("%d/%m/%Y %H:%M").to_string()
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st.
pub fn ordinal(n: i64) -> String {
    let suffix = match (n.abs() % 10, n.abs() % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
