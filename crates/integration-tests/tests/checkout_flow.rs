//! End-to-end tests for the checkout workflow against the mock quote
//! service.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use printforge_checkout::config::CheckoutConfig;
use printforge_checkout::error::{TRY_AGAIN_MESSAGE, WorkflowError};
use printforge_checkout::workflow::{
    CheckoutWorkflow, ESTIMATE_FAILED_MESSAGE, LineItemPatch,
};
use printforge_checkout::{DesignFile, ShippingDestination, Step};
use printforge_core::RateId;
use printforge_integration_tests::{MockQuoteService, spawn};
use serde_json::json;

fn flow_for(mock: &MockQuoteService) -> CheckoutWorkflow {
    let config = CheckoutConfig::for_base_url(&mock.base_url).unwrap();
    CheckoutWorkflow::new(&config).unwrap()
}

fn stl(name: &str) -> DesignFile {
    DesignFile::new(name, b"solid model\nendsolid model\n".to_vec())
}

fn destination() -> ShippingDestination {
    ShippingDestination {
        company: None,
        firstname: "Ada".to_string(),
        lastname: "Lovelace".to_string(),
        street: "1 Analytical Way".to_string(),
        city: "Minneapolis".to_string(),
        state: "MN".to_string(),
        zipcode: "55401".to_string(),
    }
}

#[tokio::test]
async fn test_estimates_accumulate_into_subtotal() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("gear.stl")).await;
    assert_eq!(flow.subtotal().to_amount_string(), "10.00");

    flow.add_line_item(stl("small_pin.stl")).await;
    assert_eq!(flow.subtotal().to_amount_string(), "15.00");

    let items = flow.line_items();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.dimensions().is_some()));
    assert!(items.iter().all(|i| !i.is_busy()));
}

#[tokio::test]
async fn test_rejected_file_carries_payload_and_is_excluded() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("gear.stl")).await;
    let id = flow.add_line_item(stl("holder.xyz")).await;

    let item = flow.line_item(id).unwrap();
    let failure = item.error().unwrap();
    assert_eq!(failure.payload(), &json!({"message": "unsupported format"}));
    assert_eq!(failure.message(), "unsupported format");
    assert!(item.price_total().is_none());

    // The failed item never counts toward the subtotal.
    assert_eq!(flow.subtotal().to_amount_string(), "10.00");

    // But the good item still lets the flow continue.
    assert!(flow.can_proceed_to_shipping());
}

#[tokio::test]
async fn test_non_json_rejection_body_is_kept_verbatim() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    let id = flow.add_line_item(stl("toolpath.gcode")).await;

    let failure = flow.line_item(id).unwrap().error().unwrap();
    assert_eq!(
        failure.payload(),
        &serde_json::Value::String("sliced output is not printable".to_string())
    );
    // No "message" key to show, so the fixed fallback text is used.
    assert_eq!(failure.message(), ESTIMATE_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_only_failed_items_blocks_progress() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("holder.xyz")).await;
    assert!(!flow.can_proceed_to_shipping());
    assert!(matches!(
        flow.proceed_to_shipping(),
        Err(WorkflowError::NoEligibleLineItems)
    ));
}

#[tokio::test]
async fn test_quantity_update_reprices_item() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    let id = flow.add_line_item(stl("gear.stl")).await;
    let patch = LineItemPatch {
        quantity: Some(3),
        ..LineItemPatch::default()
    };
    flow.update_line_item(id, Some(patch)).await.unwrap();

    let item = flow.line_item(id).unwrap();
    assert_eq!(item.quantity(), 3);
    assert_eq!(item.price_total().unwrap().to_amount_string(), "30.00");
    assert_eq!(item.price_each().unwrap().to_amount_string(), "10.00");
}

#[tokio::test]
async fn test_removal_shrinks_list_and_subtotal() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    let first = flow.add_line_item(stl("gear.stl")).await;
    let second = flow.add_line_item(stl("small_pin.stl")).await;

    flow.update_line_item(first, None).await.unwrap();

    assert_eq!(flow.line_items().len(), 1);
    assert_eq!(flow.line_items()[0].id(), second);
    assert_eq!(flow.subtotal().to_amount_string(), "5.00");
}

#[tokio::test]
async fn test_invalid_zipcode_never_reaches_the_server() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("gear.stl")).await;
    flow.proceed_to_shipping().unwrap();

    let mut bad = destination();
    bad.zipcode = "123".to_string();

    let err = flow.request_shipping_rates(bad).await.unwrap_err();
    let WorkflowError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(
        errors.field("zipcode").unwrap().message,
        "Zipcode must be 5 digits"
    );
    assert_eq!(mock.state.rate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(flow.step(), Step::ShippingInfo);
}

#[tokio::test]
async fn test_full_flow_ends_in_payment_link() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("gear.stl")).await;
    flow.proceed_to_shipping().unwrap();
    flow.request_shipping_rates(destination()).await.unwrap();

    assert_eq!(flow.step(), Step::Summary);
    assert_eq!(flow.session_id().unwrap().as_str(), "sess_1");
    assert_eq!(flow.rates().len(), 2);
    assert_eq!(flow.destination().unwrap().zipcode, "55401");

    // Nothing selected yet: shipping is a placeholder, total is subtotal.
    assert_eq!(flow.displayed_shipping_amount(), "Calculated later");
    assert_eq!(flow.total().to_amount_string(), "10.00");

    flow.select_rate(RateId::new("rate_1")).unwrap();
    assert_eq!(flow.displayed_shipping_amount(), "$7.50");
    assert_eq!(flow.total().to_amount_string(), "17.50");

    let link = flow.checkout().await.unwrap();
    assert_eq!(link.as_str(), "https://pay.example.com/cs_test_123");
}

#[tokio::test]
async fn test_failed_items_are_still_sent_for_rating() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("gear.stl")).await;
    flow.add_line_item(stl("holder.xyz")).await;
    flow.proceed_to_shipping().unwrap();
    flow.request_shipping_rates(destination()).await.unwrap();

    // Both items went into the rate request, error or not.
    assert_eq!(flow.step(), Step::Summary);
    assert_eq!(mock.state.rate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_rate_list_still_advances() {
    let mock = spawn().await;
    mock.state.offer_no_rates.store(true, Ordering::SeqCst);
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("gear.stl")).await;
    flow.proceed_to_shipping().unwrap();
    flow.request_shipping_rates(destination()).await.unwrap();

    assert_eq!(flow.step(), Step::Summary);
    assert!(flow.rates().is_empty());
    assert_eq!(flow.displayed_shipping_amount(), "Calculated later");
}

#[tokio::test]
async fn test_rate_failure_surfaces_error_and_keeps_state() {
    let mock = spawn().await;
    mock.state.fail_rates.store(true, Ordering::SeqCst);
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("gear.stl")).await;
    flow.proceed_to_shipping().unwrap();

    let err = flow.request_shipping_rates(destination()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::RatesUnavailable(_)));
    assert_eq!(err.to_string(), TRY_AGAIN_MESSAGE);

    assert_eq!(flow.step(), Step::ShippingInfo);
    assert!(flow.session_id().is_none());
    assert!(flow.rates().is_empty());
    assert!(!flow.is_requesting_rates());

    // User-initiated retry succeeds once the service recovers.
    mock.state.fail_rates.store(false, Ordering::SeqCst);
    flow.request_shipping_rates(destination()).await.unwrap();
    assert_eq!(flow.step(), Step::Summary);
}

#[tokio::test]
async fn test_checkout_failure_keeps_session_for_retry() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("gear.stl")).await;
    flow.proceed_to_shipping().unwrap();
    flow.request_shipping_rates(destination()).await.unwrap();
    flow.select_rate(RateId::new("rate_2")).unwrap();

    mock.state.fail_checkout.store(true, Ordering::SeqCst);
    let err = flow.checkout().await.unwrap_err();
    assert!(matches!(err, WorkflowError::Api(_)));

    // Still on the summary with everything intact.
    assert_eq!(flow.step(), Step::Summary);
    assert!(flow.session_id().is_some());
    assert_eq!(flow.selected_rate().unwrap().object_id, RateId::new("rate_2"));
    assert!(!flow.is_creating_session());

    mock.state.fail_checkout.store(false, Ordering::SeqCst);
    let link = flow.checkout().await.unwrap();
    assert_eq!(link.host_str(), Some("pay.example.com"));
}

#[tokio::test]
async fn test_editing_destination_resubmits_a_fresh_session() {
    let mock = spawn().await;
    let mut flow = flow_for(&mock);

    flow.add_line_item(stl("gear.stl")).await;
    flow.proceed_to_shipping().unwrap();
    flow.request_shipping_rates(destination()).await.unwrap();
    flow.select_rate(RateId::new("rate_1")).unwrap();

    flow.edit_destination().unwrap();
    let mut updated = destination();
    updated.city = "Saint Paul".to_string();
    updated.zipcode = "55101".to_string();
    flow.request_shipping_rates(updated).await.unwrap();

    // Rates were replaced wholesale; the old selection is gone.
    assert_eq!(flow.step(), Step::Summary);
    assert!(flow.selected_rate().is_none());
    assert_eq!(flow.displayed_shipping_amount(), "Calculated later");
    assert_eq!(mock.state.rate_calls.load(Ordering::SeqCst), 2);
    assert_eq!(flow.destination().unwrap().city, "Saint Paul");
}
