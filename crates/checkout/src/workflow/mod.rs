//! The quote-and-checkout workflow controller.
//!
//! Three steps, linear with backward navigation:
//!
//! 1. [`Step::Upload`] - collect design files and per-file estimates
//! 2. [`Step::ShippingInfo`] - collect and validate the destination
//! 3. [`Step::Summary`] - pick a shipping rate and create the payment session
//!
//! All state lives on [`CheckoutWorkflow`] and is mutated only through its
//! operations. Nothing persists; dropping the workflow loses the session.

mod line_items;

pub use line_items::{
    ESTIMATE_FAILED_MESSAGE, EstimateFailure, LineItem, LineItemPatch,
};

use printforge_core::{Money, QuoteId, RateId, SessionId};
use tracing::instrument;
use url::Url;

use crate::api::{QuoteApiClient, RateLineItem, ShippingRate};
use crate::config::CheckoutConfig;
use crate::destination::ShippingDestination;
use crate::error::WorkflowError;
use crate::file::DesignFile;
use line_items::LineItems;

/// Shipping amount placeholder shown before a rate is selected.
const SHIPPING_PENDING: &str = "Calculated later";

/// Workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Uploading design files and collecting estimates.
    Upload,
    /// Entering the shipping destination.
    ShippingInfo,
    /// Reviewing rates and totals; checkout happens here.
    Summary,
}

/// Controller for one checkout session.
///
/// Owns every piece of flow state; operations run to completion one at a
/// time (`&mut self`), so there is no shared-state reentrancy to guard
/// against. Superseded estimate responses are still discarded by revision
/// so a driver replaying buffered outcomes cannot write stale data.
#[derive(Debug)]
pub struct CheckoutWorkflow {
    api: QuoteApiClient,
    step: Step,
    items: LineItems,
    destination: Option<ShippingDestination>,
    rates: Vec<ShippingRate>,
    session_id: Option<SessionId>,
    selected_rate_id: Option<RateId>,
    requesting_rates: bool,
    creating_session: bool,
}

impl CheckoutWorkflow {
    /// Create a workflow at the upload step.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CheckoutConfig) -> Result<Self, WorkflowError> {
        Ok(Self::with_client(QuoteApiClient::new(config)?))
    }

    /// Create a workflow around an existing client.
    #[must_use]
    pub fn with_client(api: QuoteApiClient) -> Self {
        Self {
            api,
            step: Step::Upload,
            items: LineItems::default(),
            destination: None,
            rates: Vec::new(),
            session_id: None,
            selected_rate_id: None,
            requesting_rates: false,
            creating_session: false,
        }
    }

    // =========================================================================
    // Step 1: line items
    // =========================================================================

    /// Upload one design file and estimate it at quantity 1 with the
    /// default material.
    ///
    /// Always appends exactly one line item and never rejects the file: a
    /// failed estimate attaches its error payload to the new item instead.
    #[instrument(skip(self, file), fields(file = file.name()))]
    pub async fn add_line_item(&mut self, file: DesignFile) -> QuoteId {
        let (id, pending) = self.items.append(file);

        let outcome = self
            .api
            .estimate(pending.quantity, pending.material, &pending.file)
            .await;
        self.items.apply_estimate(pending.ticket, &outcome);

        id
    }

    /// Update a line item and re-estimate it, or remove it when `patch`
    /// is `None`.
    ///
    /// An estimate already in flight for the same item is superseded; its
    /// response will be discarded when it arrives.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownLineItem`] for a missing ID and
    /// [`WorkflowError::InvalidQuantity`] for a zero quantity.
    #[instrument(skip(self, patch))]
    pub async fn update_line_item(
        &mut self,
        id: QuoteId,
        patch: Option<LineItemPatch>,
    ) -> Result<(), WorkflowError> {
        let Some(patch) = patch else {
            self.items
                .remove(id)
                .ok_or(WorkflowError::UnknownLineItem(id))?;
            return Ok(());
        };

        if patch.quantity == Some(0) {
            return Err(WorkflowError::InvalidQuantity);
        }

        let pending = self
            .items
            .begin_update(id, patch)
            .ok_or(WorkflowError::UnknownLineItem(id))?;

        let outcome = self
            .api
            .estimate(pending.quantity, pending.material, &pending.file)
            .await;
        self.items.apply_estimate(pending.ticket, &outcome);

        Ok(())
    }

    /// True iff at least one line item has a successful estimate.
    #[must_use]
    pub fn can_proceed_to_shipping(&self) -> bool {
        self.items
            .as_slice()
            .iter()
            .any(LineItem::is_checkout_eligible)
    }

    /// Advance Upload -> `ShippingInfo`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NoEligibleLineItems`] when every item
    /// failed (or none exist), or [`WorkflowError::WrongStep`] elsewhere.
    pub fn proceed_to_shipping(&mut self) -> Result<(), WorkflowError> {
        self.ensure_step(Step::Upload, "proceed_to_shipping")?;
        if !self.can_proceed_to_shipping() {
            return Err(WorkflowError::NoEligibleLineItems);
        }
        self.step = Step::ShippingInfo;
        Ok(())
    }

    // =========================================================================
    // Step 2: shipping destination and rates
    // =========================================================================

    /// Go back `ShippingInfo` -> Upload. Unconditional.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::WrongStep`] outside `ShippingInfo`.
    pub fn back_to_quotes(&mut self) -> Result<(), WorkflowError> {
        self.ensure_step(Step::ShippingInfo, "back_to_quotes")?;
        self.step = Step::Upload;
        Ok(())
    }

    /// Validate the destination, open a checkout session, and fetch
    /// shipping rates for the full line-item list (failed estimates
    /// included; the server has the final word).
    ///
    /// On success the rate set is replaced wholesale - possibly with an
    /// empty list - any previous selection is cleared, and the workflow
    /// advances to [`Step::Summary`]. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] before any network call,
    /// [`WorkflowError::NoLineItems`] for an empty list, and
    /// [`WorkflowError::RatesUnavailable`] if the request fails.
    #[instrument(skip(self, destination), fields(zipcode = %destination.zipcode))]
    pub async fn request_shipping_rates(
        &mut self,
        destination: ShippingDestination,
    ) -> Result<(), WorkflowError> {
        self.ensure_step(Step::ShippingInfo, "request_shipping_rates")?;
        destination.validate()?;
        if self.items.is_empty() {
            return Err(WorkflowError::NoLineItems);
        }

        let request_items: Vec<RateLineItem<'_>> = self
            .items
            .as_slice()
            .iter()
            .map(|item| RateLineItem {
                quantity: item.quantity(),
                material: item.material(),
                color: item.color(),
                file: item.file(),
            })
            .collect();

        self.requesting_rates = true;
        let result = self.api.shipping_rates(&destination, &request_items).await;
        self.requesting_rates = false;

        match result {
            Ok(quote) => {
                tracing::info!(
                    session = %quote.session_id,
                    rates = quote.shipping_rates.len(),
                    "checkout session opened"
                );
                self.session_id = Some(quote.session_id);
                self.rates = quote.shipping_rates;
                self.selected_rate_id = None;
                self.destination = Some(destination);
                self.step = Step::Summary;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "shipping rate request failed");
                Err(WorkflowError::RatesUnavailable(err))
            }
        }
    }

    // =========================================================================
    // Step 3: summary and payment
    // =========================================================================

    /// Go back Summary -> `ShippingInfo` to edit the destination.
    /// Unconditional; the session and rates are discarded on resubmit.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::WrongStep`] outside Summary.
    pub fn edit_destination(&mut self) -> Result<(), WorkflowError> {
        self.ensure_step(Step::Summary, "edit_destination")?;
        self.step = Step::ShippingInfo;
        Ok(())
    }

    /// Select one of the offered shipping rates. Purely local.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownRate`] if the ID is not in the
    /// offered set, or [`WorkflowError::WrongStep`] outside Summary.
    pub fn select_rate(&mut self, rate_id: RateId) -> Result<(), WorkflowError> {
        self.ensure_step(Step::Summary, "select_rate")?;
        if !self.rates.iter().any(|r| r.object_id == rate_id) {
            return Err(WorkflowError::UnknownRate(rate_id));
        }
        self.selected_rate_id = Some(rate_id);
        Ok(())
    }

    /// Create the payment session and return the redirect link.
    ///
    /// The caller performs the actual navigation; it is a full-page
    /// redirect and not reversible within the workflow. On failure the
    /// session and selection stay usable for a retry.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NoSession`] / [`WorkflowError::NoRateSelected`]
    /// when preconditions are missing, or [`WorkflowError::Api`] if the
    /// call fails.
    #[instrument(skip(self))]
    pub async fn checkout(&mut self) -> Result<Url, WorkflowError> {
        self.ensure_step(Step::Summary, "checkout")?;
        let session_id = self.session_id.clone().ok_or(WorkflowError::NoSession)?;
        let rate_id = self
            .selected_rate_id
            .clone()
            .ok_or(WorkflowError::NoRateSelected)?;

        self.creating_session = true;
        let result = self.api.create_checkout(&session_id, &rate_id).await;
        self.creating_session = false;

        match result {
            Ok(link) => {
                tracing::info!(session = %session_id, "payment session created");
                Ok(link)
            }
            Err(err) => {
                tracing::error!(error = %err, "checkout failed");
                Err(err.into())
            }
        }
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Sum of `price_total` over all line items; unpriced items count as
    /// zero. Failed items carry no price, so this equals the sum over
    /// eligible items.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items
            .as_slice()
            .iter()
            .filter_map(LineItem::price_total)
            .sum()
    }

    /// Subtotal plus the selected rate's amount once a rate is selected at
    /// the summary step; just the subtotal before that.
    #[must_use]
    pub fn total(&self) -> Money {
        match self.selected_rate() {
            Some(rate) if self.step == Step::Summary => self.subtotal() + rate.amount,
            _ => self.subtotal(),
        }
    }

    /// Formatted selected rate amount at the summary step (e.g. `"$7.50"`),
    /// otherwise the literal placeholder `"Calculated later"`.
    #[must_use]
    pub fn displayed_shipping_amount(&self) -> String {
        match self.selected_rate() {
            Some(rate) if self.step == Step::Summary => rate.amount.to_string(),
            _ => SHIPPING_PENDING.to_string(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current workflow phase.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// Line items, in upload order.
    #[must_use]
    pub fn line_items(&self) -> &[LineItem] {
        self.items.as_slice()
    }

    /// One line item by ID.
    #[must_use]
    pub fn line_item(&self, id: QuoteId) -> Option<&LineItem> {
        self.items.get(id)
    }

    /// Rates from the most recent successful shipping-rate request.
    #[must_use]
    pub fn rates(&self) -> &[ShippingRate] {
        &self.rates
    }

    /// The currently selected rate, if any.
    #[must_use]
    pub fn selected_rate(&self) -> Option<&ShippingRate> {
        let selected = self.selected_rate_id.as_ref()?;
        self.rates.iter().find(|r| &r.object_id == selected)
    }

    /// Destination from the most recent successful shipping-rate request.
    #[must_use]
    pub const fn destination(&self) -> Option<&ShippingDestination> {
        self.destination.as_ref()
    }

    /// Session ID from the most recent successful shipping-rate request.
    #[must_use]
    pub const fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// True while a shipping-rate request is in flight.
    #[must_use]
    pub const fn is_requesting_rates(&self) -> bool {
        self.requesting_rates
    }

    /// True while a checkout call is in flight.
    #[must_use]
    pub const fn is_creating_session(&self) -> bool {
        self.creating_session
    }

    fn ensure_step(&self, expected: Step, operation: &'static str) -> Result<(), WorkflowError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WorkflowError::WrongStep {
                operation,
                step: self.step,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Estimate};
    use serde_json::json;

    fn workflow() -> CheckoutWorkflow {
        let config = CheckoutConfig::for_base_url("http://localhost:9").unwrap();
        CheckoutWorkflow::new(&config).unwrap()
    }

    fn file(name: &str) -> DesignFile {
        DesignFile::new(name, b"solid model".to_vec())
    }

    fn estimate(total: &str) -> Estimate {
        Estimate {
            price_each: Money::new(total.parse().unwrap()),
            price_total: Money::new(total.parse().unwrap()),
            width: "40".parse().unwrap(),
            length: "30".parse().unwrap(),
            height: "20".parse().unwrap(),
        }
    }

    fn rate(id: &str, amount: &str) -> ShippingRate {
        ShippingRate {
            object_id: RateId::new(id),
            provider: "USPS".to_string(),
            service_level: "Ground Advantage".to_string(),
            amount: Money::new(amount.parse().unwrap()),
            delivery_estimate_min: 5,
        }
    }

    /// Append an item and settle its estimate without the network.
    fn push_priced(flow: &mut CheckoutWorkflow, name: &str, total: &str) -> QuoteId {
        let (id, pending) = flow.items.append(file(name));
        flow.items.apply_estimate(pending.ticket, &Ok(estimate(total)));
        id
    }

    fn push_failed(flow: &mut CheckoutWorkflow, name: &str) -> QuoteId {
        let (id, pending) = flow.items.append(file(name));
        let err = ApiError::Rejected {
            payload: json!({"message": "unsupported format"}),
        };
        flow.items.apply_estimate(pending.ticket, &Err(err));
        id
    }

    /// Put the workflow at the summary step with a session and rates, the
    /// way a successful rate request would.
    fn at_summary(flow: &mut CheckoutWorkflow, rates: Vec<ShippingRate>) {
        flow.session_id = Some(SessionId::new("sess_1"));
        flow.rates = rates;
        flow.selected_rate_id = None;
        flow.step = Step::Summary;
    }

    #[test]
    fn test_starts_at_upload_step() {
        let flow = workflow();
        assert_eq!(flow.step(), Step::Upload);
        assert!(flow.line_items().is_empty());
        assert!(flow.session_id().is_none());
    }

    #[test]
    fn test_subtotal_sums_priced_items_only() {
        let mut flow = workflow();
        push_priced(&mut flow, "a.stl", "10");
        push_priced(&mut flow, "b.stl", "5");
        push_failed(&mut flow, "c.xyz");

        assert_eq!(flow.subtotal().to_amount_string(), "15.00");
    }

    #[test]
    fn test_subtotal_of_empty_list_is_zero() {
        assert_eq!(workflow().subtotal(), Money::ZERO);
    }

    #[test]
    fn test_can_proceed_requires_one_eligible_item() {
        let mut flow = workflow();
        assert!(!flow.can_proceed_to_shipping());

        push_failed(&mut flow, "c.xyz");
        assert!(!flow.can_proceed_to_shipping());

        push_priced(&mut flow, "a.stl", "10");
        assert!(flow.can_proceed_to_shipping());
    }

    #[test]
    fn test_proceed_to_shipping_blocked_without_eligible_items() {
        let mut flow = workflow();
        push_failed(&mut flow, "c.xyz");

        let err = flow.proceed_to_shipping().unwrap_err();
        assert!(matches!(err, WorkflowError::NoEligibleLineItems));
        assert_eq!(flow.step(), Step::Upload);
    }

    #[test]
    fn test_step_transitions_forward_and_back() {
        let mut flow = workflow();
        push_priced(&mut flow, "a.stl", "10");

        flow.proceed_to_shipping().unwrap();
        assert_eq!(flow.step(), Step::ShippingInfo);

        flow.back_to_quotes().unwrap();
        assert_eq!(flow.step(), Step::Upload);

        flow.proceed_to_shipping().unwrap();
        at_summary(&mut flow, vec![rate("rate_1", "7.5")]);

        flow.edit_destination().unwrap();
        assert_eq!(flow.step(), Step::ShippingInfo);
    }

    #[test]
    fn test_operations_reject_wrong_step() {
        let mut flow = workflow();
        assert!(matches!(
            flow.back_to_quotes(),
            Err(WorkflowError::WrongStep { .. })
        ));
        assert!(matches!(
            flow.select_rate(RateId::new("rate_1")),
            Err(WorkflowError::WrongStep { .. })
        ));
        assert!(matches!(
            flow.edit_destination(),
            Err(WorkflowError::WrongStep { .. })
        ));
    }

    #[test]
    fn test_remove_shrinks_list_by_one() {
        let mut flow = workflow();
        let first = push_priced(&mut flow, "a.stl", "10");
        push_priced(&mut flow, "b.stl", "5");

        flow.items.remove(first).unwrap();
        assert_eq!(flow.line_items().len(), 1);
        assert!(flow.line_item(first).is_none());
        assert_eq!(flow.subtotal().to_amount_string(), "5.00");
    }

    #[test]
    fn test_total_without_selected_rate_equals_subtotal() {
        let mut flow = workflow();
        push_priced(&mut flow, "a.stl", "10");

        assert_eq!(flow.total().to_amount_string(), "10.00");
        assert_eq!(flow.displayed_shipping_amount(), "Calculated later");
    }

    #[test]
    fn test_total_with_selected_rate_adds_shipping() {
        let mut flow = workflow();
        push_priced(&mut flow, "a.stl", "10");
        push_priced(&mut flow, "b.stl", "5");
        at_summary(
            &mut flow,
            vec![rate("rate_1", "7.5"), rate("rate_2", "19.99")],
        );

        flow.select_rate(RateId::new("rate_1")).unwrap();
        assert_eq!(flow.displayed_shipping_amount(), "$7.50");
        assert_eq!(flow.total().to_amount_string(), "22.50");

        flow.select_rate(RateId::new("rate_2")).unwrap();
        assert_eq!(flow.total().to_amount_string(), "34.99");
    }

    #[test]
    fn test_select_rate_rejects_unknown_id() {
        let mut flow = workflow();
        push_priced(&mut flow, "a.stl", "10");
        at_summary(&mut flow, vec![rate("rate_1", "7.5")]);

        let err = flow.select_rate(RateId::new("rate_9")).unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownRate(_)));
        assert!(flow.selected_rate().is_none());
    }

    #[test]
    fn test_shipping_placeholder_after_going_back() {
        let mut flow = workflow();
        push_priced(&mut flow, "a.stl", "10");
        at_summary(&mut flow, vec![rate("rate_1", "7.5")]);
        flow.select_rate(RateId::new("rate_1")).unwrap();

        flow.edit_destination().unwrap();
        // Off the summary step, shipping is no longer counted or shown.
        assert_eq!(flow.displayed_shipping_amount(), "Calculated later");
        assert_eq!(flow.total().to_amount_string(), "10.00");
    }

    #[tokio::test]
    async fn test_update_unknown_item_errors() {
        let mut flow = workflow();
        let err = flow
            .update_line_item(QuoteId::new(42), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownLineItem(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_zero_quantity_before_network() {
        let mut flow = workflow();
        let id = push_priced(&mut flow, "a.stl", "10");

        let patch = LineItemPatch {
            quantity: Some(0),
            ..LineItemPatch::default()
        };
        // Client points at a closed port; an attempted request would fail,
        // not return InvalidQuantity.
        let err = flow.update_line_item(id, Some(patch)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidQuantity));
        let total = flow.line_item(id).unwrap().price_total().unwrap();
        assert_eq!(total.to_amount_string(), "10.00");
    }

    #[tokio::test]
    async fn test_checkout_requires_session_and_rate() {
        let mut flow = workflow();
        push_priced(&mut flow, "a.stl", "10");
        at_summary(&mut flow, vec![rate("rate_1", "7.5")]);

        flow.session_id = None;
        assert!(matches!(
            flow.checkout().await.unwrap_err(),
            WorkflowError::NoSession
        ));

        flow.session_id = Some(SessionId::new("sess_1"));
        assert!(matches!(
            flow.checkout().await.unwrap_err(),
            WorkflowError::NoRateSelected
        ));
    }

    #[tokio::test]
    async fn test_rate_request_validation_failure_is_local() {
        let mut flow = workflow();
        push_priced(&mut flow, "a.stl", "10");
        flow.proceed_to_shipping().unwrap();

        let destination = ShippingDestination {
            zipcode: "123".to_string(),
            ..ShippingDestination::default()
        };
        // Bad form data never reaches the (unreachable) server.
        let err = flow.request_shipping_rates(destination).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(flow.step(), Step::ShippingInfo);
        assert!(flow.session_id().is_none());
    }
}
