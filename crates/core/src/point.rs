//! Collection point input validation and field parsing.
//!
//! Everything that arrives from a registration form passes through here
//! before any durable write: coordinates are parsed and range-checked, the
//! state code is checked against the two-uppercase-letter format, and the
//! item list must be non-empty.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::types::DbId;

/// Number of characters in a Brazilian state code.
pub const UF_LENGTH: usize = 2;

/// Wire name of the item list on forms and query strings.
pub const ITEMS_FIELD: &str = "items";

/// Field order used when reporting the first validation failure, so the
/// reported field is stable regardless of `HashMap` iteration order.
const FIELD_ORDER: &[&str] = &[
    "name",
    "email",
    "whatsapp",
    "latitude",
    "longitude",
    "city",
    "uf",
    "item_ids",
];

/// A collection point as submitted for registration.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct NewPoint {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(email(message = "must be a valid e-mail address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub whatsapp: String,
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub city: String,
    #[validate(custom(function = "validate_uf"))]
    pub uf: String,
    #[validate(length(min = 1, message = "at least one item is required"))]
    pub item_ids: Vec<DbId>,
}

impl NewPoint {
    /// Trim text fields and run all field validations.
    ///
    /// Returns the normalized input, or the first failing field as
    /// [`CoreError::InvalidField`].
    pub fn validated(mut self) -> Result<Self, CoreError> {
        for value in [
            &mut self.name,
            &mut self.email,
            &mut self.whatsapp,
            &mut self.city,
            &mut self.uf,
        ] {
            let trimmed = value.trim();
            if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }

        self.validate().map_err(first_field_error)?;
        Ok(self)
    }
}

/// `uf` must be exactly two ASCII uppercase letters (e.g. `SP`, `MG`).
pub fn validate_uf(uf: &str) -> Result<(), ValidationError> {
    if uf.len() == UF_LENGTH && uf.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("uf")
            .with_message(Cow::Borrowed("must be exactly two uppercase letters")))
    }
}

/// Parse a latitude/longitude form value. Non-finite values are rejected
/// here because range checks let `NaN` through.
pub fn parse_coordinate(field: &str, raw: &str) -> Result<f64, CoreError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid_field(field, format!("'{raw}' is not a number")))?;
    if !value.is_finite() {
        return Err(CoreError::invalid_field(field, "must be a finite number"));
    }
    Ok(value)
}

/// Parse a comma-separated id list such as `"1, 2,3"`.
///
/// Empty segments are skipped, so `""` yields an empty list. Any segment
/// that is not an integer is an error on the `items` field.
pub fn parse_item_ids(raw: &str) -> Result<Vec<DbId>, CoreError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<DbId>().map_err(|_| {
                CoreError::invalid_field(ITEMS_FIELD, format!("'{s}' is not a valid item id"))
            })
        })
        .collect()
}

/// Convert validator output into a single field-level error.
fn first_field_error(errors: ValidationErrors) -> CoreError {
    let field_errors = errors.field_errors();

    let found = FIELD_ORDER
        .iter()
        .find_map(|name| field_errors.get(*name).map(|errs| (*name, *errs)));

    match found {
        Some((field, errs)) => {
            let message = errs
                .first()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .unwrap_or_else(|| "is invalid".to_string());
            CoreError::invalid_field(wire_name(field), message)
        }
        None => CoreError::Validation(errors.to_string()),
    }
}

/// Map a struct field name to the name clients send.
fn wire_name(field: &str) -> &str {
    match field {
        "item_ids" => ITEMS_FIELD,
        other => other,
    }
}
