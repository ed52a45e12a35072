// src/domain/validation.rs
use crate::errors::ValidationError;

/// Required text: at least one non-whitespace character, at most `max` chars.
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    limit_text(field, value, max)
}

/// Optional text: may be empty, at most `max` chars.
pub fn limit_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    // Characters, not bytes: "Café" is four.
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// A finite number inside `[-bound, bound]`.
pub fn check_coordinate(field: &'static str, value: f64, bound: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value < -bound || value > bound {
        return Err(ValidationError::new(
            field,
            format!("must be between -{bound} and {bound}"),
        ));
    }
    Ok(())
}
