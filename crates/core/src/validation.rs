//! Field validation helpers.
//!
//! Create/update DTOs derive [`validator::Validate`] with the field
//! constraints inline. [`validate`] runs those rules and folds the result
//! into a single [`CoreError::Validation`] naming one offending field, so
//! callers always see the same error shape.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

/// Run the derived rules of `input` and report the first failing field.
///
/// Fields are visited in alphabetical order so the reported field does not
/// depend on hash map iteration order.
pub fn validate<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(|errors| first_violation(&errors))
}

/// Reject strings made only of whitespace.
///
/// Used as `#[validate(custom(function = "paddock_core::validation::not_blank"))]`.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

/// Reject `inf` and `NaN`, which parse as floats but are not measurements.
///
/// Used as `#[validate(custom(function = "paddock_core::validation::finite"))]`.
pub fn finite(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new("finite").with_message(Cow::Borrowed("must be a finite number")));
    }
    Ok(())
}

/// Trim surrounding whitespace from a user-supplied name or label.
pub fn clean_text(value: &str) -> String {
    value.trim().to_string()
}

/// Like [`clean_text`] for optional fields, mapping blank input to `None`.
pub fn clean_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_violation(errors: &ValidationErrors) -> CoreError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    let Some(field) = fields.first() else {
        return CoreError::invalid("input", "invalid input");
    };
    let constraint = field_errors
        .get(*field)
        .and_then(|errs| errs.first())
        .map(describe)
        .unwrap_or_else(|| "invalid value".to_string());

    CoreError::invalid(field.to_string(), constraint)
}

/// Render one validator error as a short human-readable constraint.
fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(ToString::to_string);

    match error.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(min), None) => format!("length must be at least {min}"),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "invalid length".to_string(),
        },
        "range" => {
            let lower = param("min")
                .map(|v| format!(">= {v}"))
                .or_else(|| param("exclusive_min").map(|v| format!("> {v}")));
            let upper = param("max")
                .map(|v| format!("<= {v}"))
                .or_else(|| param("exclusive_max").map(|v| format!("< {v}")));
            match (lower, upper) {
                (Some(lo), Some(hi)) => format!("must be {lo} and {hi}"),
                (Some(lo), None) => format!("must be {lo}"),
                (None, Some(hi)) => format!("must be {hi}"),
                (None, None) => "out of range".to_string(),
            }
        }
        other => other.to_string(),
    }
}
