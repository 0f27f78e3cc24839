//! Reqwest-backed client for the quote service.

use printforge_core::{Material, RateId, SessionId};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{ApiError, CheckoutLink, Estimate, RateLineItem, ShippingQuote};
use crate::config::CheckoutConfig;
use crate::destination::ShippingDestination;
use crate::file::DesignFile;

/// Quote service API client.
///
/// Cheap to clone; holds a connection-pooling `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct QuoteApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl QuoteApiClient {
    /// Create a new client for the configured quote service.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CheckoutConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Request a price estimate for one file.
    ///
    /// # Errors
    ///
    /// Returns error per the module-level error contract.
    pub async fn estimate(
        &self,
        quantity: u32,
        material: Material,
        file: &DesignFile,
    ) -> Result<Estimate, ApiError> {
        tracing::debug!(quantity, %material, file = file.name(), "requesting estimate");

        let form = Form::new()
            .text("quantity", quantity.to_string())
            .text("material", material.as_str())
            .part("file", file_part(file));

        self.post_form("v1/estimate", form).await
    }

    /// Open a checkout session and fetch shipping rates for a destination
    /// and set of line items.
    ///
    /// Every line item is sent, including ones whose estimate failed; the
    /// server decides what it will ship.
    ///
    /// # Errors
    ///
    /// Returns error per the module-level error contract.
    pub async fn shipping_rates(
        &self,
        destination: &ShippingDestination,
        items: &[RateLineItem<'_>],
    ) -> Result<ShippingQuote, ApiError> {
        tracing::debug!(
            zipcode = %destination.zipcode,
            items = items.len(),
            "requesting shipping rates"
        );

        let mut form = Form::new()
            .text("company", destination.company.clone().unwrap_or_default())
            .text("firstname", destination.firstname.clone())
            .text("lastname", destination.lastname.clone())
            .text("street", destination.street.clone())
            .text("city", destination.city.clone())
            .text("state", destination.state.clone())
            .text("zipcode", destination.zipcode.clone());

        for item in items {
            form = form
                .text("quantity", item.quantity.to_string())
                .text("material", item.material.as_str())
                .text("color", item.color.as_str())
                .part("file", file_part(item.file));
        }

        self.post_form("v1/checkout/shipping/rate", form).await
    }

    /// Finalize a checkout session into a payment redirect link.
    ///
    /// # Errors
    ///
    /// Returns error per the module-level error contract, or
    /// [`ApiError::Parse`] if the returned link is not a valid URL.
    pub async fn create_checkout(
        &self,
        session_id: &SessionId,
        selected_rate: &RateId,
    ) -> Result<Url, ApiError> {
        tracing::debug!(%session_id, rate = %selected_rate, "creating payment session");

        let form = Form::new()
            .text("session_id", session_id.as_str().to_string())
            .text("selected_shipping_rate", selected_rate.as_str().to_string());

        let link: CheckoutLink = self.post_form("v1/checkout", form).await?;
        Url::parse(&link.checkout_link)
            .map_err(|e| ApiError::Parse(format!("invalid checkout link: {e}")))
    }

    /// Send one multipart POST and decode the response per the error
    /// contract: 200 parses the payload, 400 carries the body verbatim,
    /// anything else is an opaque status failure.
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();

        if status == StatusCode::BAD_REQUEST {
            // Failing to read the body is a transport error, not a rejection.
            let text = response.text().await?;
            let payload =
                serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text));
            return Err(ApiError::Rejected { payload });
        }

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "quote service request failed");
            return Err(ApiError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

fn file_part(file: &DesignFile) -> Part {
    Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string())
}
