use chrono::NaiveDate;

use crate::error::AppError;
use crate::services::shift_time::parse_date;

/// Parses a note's date range; `from` may equal `to` but not follow it.
pub fn validate_note_range(date_from: &str, date_to: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let from = parse_date(date_from)?;
    let to = parse_date(date_to)?;
    if from > to {
        return Err(AppError::validation("dateFrom must be on or before dateTo"));
    }
    Ok((from, to))
}

pub fn validate_note_body(body: &str) -> Result<(), AppError> {
    if body.trim().is_empty() {
        return Err(AppError::validation("Note body is required"));
    }
    Ok(())
}
