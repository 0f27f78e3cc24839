//! Shipping destination form data and pre-submission validation.
//!
//! Validation runs client-side before any network call; a failed check
//! blocks the shipping-rate request entirely.

use serde::Serialize;
use thiserror::Error;

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field the error belongs to (e.g. `"zipcode"`).
    pub field: &'static str,
    /// User-facing message.
    pub message: &'static str,
}

/// All validation failures for one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid shipping destination: {}", summary(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Look up the error for a given field, if any.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == name)
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Shipping destination, as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShippingDestination {
    /// Optional; sent as an empty field when absent.
    pub company: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub street: String,
    pub city: String,
    /// Two-letter state code (e.g. `"MN"`).
    pub state: String,
    /// Five-digit ZIP code.
    pub zipcode: String,
}

impl ShippingDestination {
    /// Validate all fields.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once, so a form can annotate each
    /// input rather than surfacing one problem at a time.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.firstname.trim().is_empty() {
            errors.push(FieldError {
                field: "firstname",
                message: "First name is required",
            });
        }
        if self.lastname.trim().is_empty() {
            errors.push(FieldError {
                field: "lastname",
                message: "Last name is required",
            });
        }
        if self.street.trim().is_empty() {
            errors.push(FieldError {
                field: "street",
                message: "Street is required",
            });
        }
        if self.city.trim().is_empty() {
            errors.push(FieldError {
                field: "city",
                message: "City is required",
            });
        }
        if self.state.trim().len() != 2 {
            errors.push(FieldError {
                field: "state",
                message: "State must be the 2-letter code; e.g. MN",
            });
        }
        {
            let zip = self.zipcode.trim();
            if zip.len() != 5 || !zip.bytes().all(|b| b.is_ascii_digit()) {
                errors.push(FieldError {
                    field: "zipcode",
                    message: "Zipcode must be 5 digits",
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}
