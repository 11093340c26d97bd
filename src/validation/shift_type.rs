use crate::error::AppError;
use crate::services::shift_time::parse_time;
use crate::validation::is_hex_color;

pub fn validate_shift_type(
    code: &str,
    label: &str,
    color: &str,
    default_start_time: &str,
    default_end_time: &str,
) -> Result<(), AppError> {
    if code.trim().is_empty() {
        return Err(AppError::validation("Shift type code is required"));
    }
    if label.trim().is_empty() {
        return Err(AppError::validation("Shift type label is required"));
    }
    if !is_hex_color(color) {
        return Err(AppError::validation("Color must be hex like #RRGGBB"));
    }
    parse_time(default_start_time)?;
    parse_time(default_end_time)?;
    Ok(())
}
