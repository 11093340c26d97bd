//! Turns a calendar date plus wall-clock start/end times into an absolute
//! shift window.
//!
//! The end lands on the following day when the shift type crosses midnight,
//! or when the end time is not after the start time (`20:00`-`08:15`,
//! `00:00`-`00:00`). Create, update and bulk paths all go through
//! [`resolve_shift_window`].

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Accepts exactly `YYYY-MM-DD` naming a real calendar date.
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(AppError::validation("Invalid date format"));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation("Invalid date format"))
}

/// Accepts exactly `HH:mm`, 24-hour clock.
pub fn parse_time(value: &str) -> AppResult<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(AppError::validation("Invalid time format"));
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::validation("Invalid time format"))
}

pub fn resolve_shift_window(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    crosses_midnight: bool,
) -> ShiftWindow {
    let start = date.and_time(start);
    let mut end = date.and_time(end);
    if crosses_midnight || end <= start {
        end += Duration::hours(24);
    }
    ShiftWindow { start, end }
}

/// Parses and resolves in one step, for callers holding raw request strings.
pub fn resolve_from_strings(
    date: &str,
    start: &str,
    end: &str,
    crosses_midnight: bool,
) -> AppResult<(NaiveDate, ShiftWindow)> {
    let date = parse_date(date)?;
    let start = parse_time(start)?;
    let end = parse_time(end)?;
    Ok((date, resolve_shift_window(date, start, end, crosses_midnight)))
}
