//! Quote service HTTP client.
//!
//! Three endpoints, all `POST` with multipart form bodies:
//!
//! - `/v1/estimate` - price and measure one design file
//! - `/v1/checkout/shipping/rate` - open a checkout session and list rates
//! - `/v1/checkout` - finalize the session into a payment link
//!
//! # Error contract
//!
//! A `400` response carries a server-supplied payload meant for the user
//! verbatim ([`ApiError::Rejected`]). Every other failure (transport error,
//! any other status) collapses to a generic condition the caller renders
//! with a fixed try-again message.

mod client;
mod types;

pub use client::QuoteApiClient;
pub use types::{CheckoutLink, Estimate, RateLineItem, ShippingQuote, ShippingRate};

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when calling the quote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body read, JSON decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request with a 400 and a user-facing payload.
    #[error("rejected by quote service: {payload}")]
    Rejected {
        /// Response body, verbatim. JSON where the server sent JSON,
        /// otherwise the raw text wrapped in a string.
        payload: Value,
    },

    /// Any non-200, non-400 status.
    #[error("unexpected status: {0}")]
    Status(u16),

    /// The server answered 200 but the payload was unusable.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// The verbatim rejection payload, if this was a 400 response.
    #[must_use]
    pub const fn rejection_payload(&self) -> Option<&Value> {
        match self {
            Self::Rejected { payload } => Some(payload),
            _ => None,
        }
    }
}
