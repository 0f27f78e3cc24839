//! Workflow-level error handling.
//!
//! Estimate failures are deliberately NOT errors here: they attach to the
//! affected line item and the flow continues. `WorkflowError` covers what
//! actually stops an operation - precondition violations, failed
//! validation, and the rate/checkout calls.

use printforge_core::{QuoteId, RateId};
use thiserror::Error;

use crate::api::ApiError;
use crate::destination::ValidationErrors;
use crate::workflow::Step;

/// Fixed user-facing message for failures the server gave no usable
/// detail for.
pub const TRY_AGAIN_MESSAGE: &str =
    "We couldn't reach the quote service. Please try again. \
     If the issue persists, please reach out to us.";

/// Errors returned by `CheckoutWorkflow` operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Operation invoked at a step where it is not defined.
    #[error("{operation} is not available at the {step:?} step")]
    WrongStep {
        operation: &'static str,
        step: Step,
    },

    /// No line item with this ID (removed, or never existed).
    #[error("no line item with id {0}")]
    UnknownLineItem(QuoteId),

    /// Patched quantity must be a positive integer.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Shipping requires at least one line item.
    #[error("no line items to ship")]
    NoLineItems,

    /// Advancing past upload requires at least one successfully
    /// estimated line item.
    #[error("no line item has a successful estimate")]
    NoEligibleLineItems,

    /// Destination form validation failed; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Selected rate is not in the offered set.
    #[error("no shipping rate with id {0}")]
    UnknownRate(RateId),

    /// Checkout requires a session from a successful rate request.
    #[error("no checkout session; request shipping rates first")]
    NoSession,

    /// Checkout requires a selected shipping rate.
    #[error("no shipping rate selected")]
    NoRateSelected,

    /// The shipping-rate request failed; state is unchanged.
    #[error("{TRY_AGAIN_MESSAGE}")]
    RatesUnavailable(#[source] ApiError),

    /// The checkout call failed; the session and selection remain usable.
    #[error(transparent)]
    Api(#[from] ApiError),
}
