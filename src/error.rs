use thiserror::Error;

pub type NutritionResult<T> = Result<T, NutritionError>;

#[derive(Debug, Error, PartialEq)]
pub enum NutritionError {
    /// Input rejected before any computation ran.
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("nutrition table error: {0}")]
    TableLoad(String),
}

impl NutritionError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        NutritionError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Rejects NaN/infinite values and values at or below zero.
pub(crate) fn ensure_positive(field: &str, value: f64) -> NutritionResult<()> {
    if !value.is_finite() {
        return Err(NutritionError::invalid(field, format!("must be finite, got {}", value)));
    }
    if value <= 0.0 {
        return Err(NutritionError::invalid(field, format!("must be > 0, got {}", value)));
    }
    Ok(())
}

/// Rejects results that overflowed, so they never reach serialized output as `null`.
pub(crate) fn ensure_finite(field: &str, value: f64) -> NutritionResult<()> {
    if !value.is_finite() {
        return Err(NutritionError::invalid(field, format!("result out of range, got {}", value)));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(field: &str, value: f64) -> NutritionResult<()> {
    if !value.is_finite() {
        return Err(NutritionError::invalid(field, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(NutritionError::invalid(field, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

pub(crate) fn ensure_in_range(field: &str, value: f64, min: f64, max: f64) -> NutritionResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(NutritionError::invalid(
            field,
            format!("must lie in [{}, {}], got {}", min, max, value),
        ));
    }
    Ok(())
}
