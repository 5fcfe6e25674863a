//! Validation Utilities

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

use super::error::{AppError, FieldError};

/// Largest price a `NUMERIC(12, 2)` column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Convert validation errors to AppError, one entry per failed rule, ordered by field
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();

    if field_errors.is_empty() {
        return AppError::Validation("Validation failed".into());
    }

    field_errors.sort_by(|a, b| a.field.cmp(&b.field));
    AppError::InvalidFields(field_errors)
}

/// Prices are non-negative, fit `NUMERIC(12, 2)` and have at most two decimal places.
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price_negative")
            .with_message("Price must not be negative".into()));
    }
    if *price > MAX_PRICE {
        return Err(ValidationError::new("price_too_large")
            .with_message(format!("Price must not exceed {}", MAX_PRICE).into()));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("price_scale")
            .with_message("Price must have at most two decimal places".into()));
    }
    Ok(())
}
