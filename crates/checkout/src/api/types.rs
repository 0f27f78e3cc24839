//! Wire types for quote service responses.

use printforge_core::{Color, Material, Money, RateId, SessionId};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::file::DesignFile;

/// Successful `/v1/estimate` payload: price and measured bounding box for
/// one file at one quantity/material.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Estimate {
    /// Price per printed unit.
    pub price_each: Money,
    /// Price for the full quantity.
    pub price_total: Money,
    /// Bounding box width, millimeters.
    #[serde(with = "rust_decimal::serde::float")]
    pub width: Decimal,
    /// Bounding box length, millimeters.
    #[serde(with = "rust_decimal::serde::float")]
    pub length: Decimal,
    /// Bounding box height, millimeters.
    #[serde(with = "rust_decimal::serde::float")]
    pub height: Decimal,
}

/// One delivery option from `/v1/checkout/shipping/rate`.
///
/// Immutable once received; the whole set is replaced on every request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShippingRate {
    /// Opaque identity, unique within one response.
    pub object_id: RateId,
    /// Carrier name (e.g. `"USPS"`).
    pub provider: String,
    /// Carrier service tier (e.g. `"Priority"`).
    pub service_level: String,
    /// Shipping cost.
    pub amount: Money,
    /// Minimum delivery estimate, business days.
    pub delivery_estimate_min: u32,
}

/// Successful `/v1/checkout/shipping/rate` payload: a fresh checkout
/// session plus the rates available for it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShippingQuote {
    /// Server-side checkout context; consumed once by `/v1/checkout`.
    pub session_id: SessionId,
    /// May legitimately be empty (no options for this destination).
    #[serde(default)]
    pub shipping_rates: Vec<ShippingRate>,
}

/// Successful `/v1/checkout` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutLink {
    /// Full-page payment redirect target.
    pub checkout_link: String,
}

/// One line item of a shipping-rate request. Borrowed view so the workflow
/// does not clone file bytes just to describe the request.
#[derive(Debug, Clone, Copy)]
pub struct RateLineItem<'a> {
    pub quantity: u32,
    pub material: Material,
    pub color: Color,
    pub file: &'a DesignFile,
}
