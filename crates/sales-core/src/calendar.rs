//! Fixed calendar orderings used for derived fields and trend reindexing.

use chrono::{Datelike, NaiveDateTime, Weekday};

/// Month names in calendar order, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Day names in week order, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Full English month name for `ts`, e.g. `"April"`.
pub fn month_name(ts: &NaiveDateTime) -> &'static str {
    MONTH_NAMES[ts.month0() as usize]
}

/// Full English day name for `ts`, e.g. `"Friday"`.
pub fn weekday_name(ts: &NaiveDateTime) -> &'static str {
    weekday_label(ts.weekday())
}

/// Full English name of a [`Weekday`].
pub fn weekday_label(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// Zero-based calendar position of a month name, or `None` when unknown.
///
/// ```
/// use sales_core::calendar::month_position;
///
/// assert_eq!(month_position("January"), Some(0));
/// assert_eq!(month_position("December"), Some(11));
/// assert_eq!(month_position("Smarch"), None);
/// ```
pub fn month_position(name: &str) -> Option<usize> {
    MONTH_NAMES.iter().position(|m| *m == name)
}

/// Zero-based week position of a day name (Monday = 0), or `None`.
pub fn weekday_position(name: &str) -> Option<usize> {
    WEEKDAY_NAMES.iter().position(|d| *d == name)
}
