//! Date facet resolution.
//!
//! An exact date degrades to month precision and then to year precision
//! when its parts are missing or do not form a real calendar date. All
//! instants are UTC so month and year boundaries never shift.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// A resolved date constraint on a birth or death date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCondition {
    /// Equality with midnight UTC of a single day.
    On(DateTime<Utc>),
    /// Inclusive bounds; `None` leaves that side open.
    Between {
        gte: Option<DateTime<Utc>>,
        lte: Option<DateTime<Utc>>,
    },
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last millisecond before `next` begins.
fn end_before(next: NaiveDate) -> DateTime<Utc> {
    start_of_day(next) - Duration::milliseconds(1)
}

fn year_start(year: i32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(start_of_day)
}

fn year_end(year: i32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year + 1, 1, 1).map(end_before)
}

/// `[Jan 1 00:00:00.000, Dec 31 23:59:59.999]` of `year`.
fn year_span(year: i32) -> Option<DateCondition> {
    Some(DateCondition::Between {
        gte: Some(year_start(year)?),
        lte: Some(year_end(year)?),
    })
}

/// First instant of the month through the last millisecond of its final day.
fn month_span(year: i32, month: u32) -> Option<DateCondition> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(DateCondition::Between {
        gte: Some(start_of_day(first)),
        lte: Some(end_before(next)),
    })
}

/// Resolve an exact-mode date from its parsed parts.
///
/// Returns `None` when no year was given.
pub fn resolve_exact(
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
) -> Option<DateCondition> {
    let year = year?;

    if let Some(month) = month.filter(|m| (1..=12).contains(m)) {
        if let Some(day) = day.filter(|d| (1..=31).contains(d)) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(DateCondition::On(start_of_day(date)));
            }
        }
        if let Some(span) = month_span(year, month) {
            return Some(span);
        }
    }

    year_span(year)
}

/// Resolve a range-mode date from optional whole-year bounds.
///
/// Returns `None` when neither bound was given.
pub fn resolve_range(year_from: Option<i32>, year_to: Option<i32>) -> Option<DateCondition> {
    let gte = year_from.and_then(year_start);
    let lte = year_to.and_then(year_end);
    if gte.is_none() && lte.is_none() {
        return None;
    }
    Some(DateCondition::Between { gte, lte })
}
