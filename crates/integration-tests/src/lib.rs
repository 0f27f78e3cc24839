//! Integration test support for PrintForge.
//!
//! Provides [`MockQuoteService`], an in-process axum server implementing
//! the three quote-service endpoints with deterministic behavior:
//!
//! - `/v1/estimate` - $10.00/unit, or $5.00/unit for files whose name
//!   starts with `small`; file names ending in `.xyz` are rejected with a
//!   400 and `{"message": "unsupported format"}`, and ones ending in
//!   `.gcode` with a 400 and a plain-text body
//! - `/v1/checkout/shipping/rate` - session `sess_1` with two rates
//!   (`rate_1` $7.50 / 5 days, `rate_2` $19.99 / 2 days)
//! - `/v1/checkout` - `https://pay.example.com/cs_test_123`
//!
//! Failure modes are toggled per test via [`MockState`] flags; per-endpoint
//! hit counters let tests assert that no request went out.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

/// Shared, test-controlled behavior of the mock service.
#[derive(Debug, Default)]
pub struct MockState {
    /// Per-endpoint hit counters.
    pub estimate_calls: AtomicUsize,
    pub rate_calls: AtomicUsize,
    pub checkout_calls: AtomicUsize,

    /// When set, `/v1/checkout/shipping/rate` answers 500.
    pub fail_rates: AtomicBool,
    /// When set, `/v1/checkout/shipping/rate` answers with no rates.
    pub offer_no_rates: AtomicBool,
    /// When set, `/v1/checkout` answers 500.
    pub fail_checkout: AtomicBool,
}

/// A running mock quote service bound to an ephemeral port.
pub struct MockQuoteService {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Start the mock service on an ephemeral local port.
pub async fn spawn() -> MockQuoteService {
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route("/v1/estimate", post(estimate))
        .route("/v1/checkout/shipping/rate", post(shipping_rate))
        .route("/v1/checkout", post(checkout))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock quote service");
    let addr = listener.local_addr().expect("mock local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock quote service");
    });

    MockQuoteService {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// Per-unit price for a file name, mirroring nothing real - just enough
/// shape for totals to be interesting.
fn unit_price(file_name: &str) -> f64 {
    if file_name.starts_with("small") { 5.0 } else { 10.0 }
}

async fn estimate(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    state.estimate_calls.fetch_add(1, Ordering::SeqCst);

    let mut quantity: u32 = 1;
    let mut file_name = String::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or_default() {
            "quantity" => quantity = field.text().await.unwrap().parse().unwrap(),
            "file" => {
                file_name = field.file_name().unwrap_or_default().to_string();
                let _ = field.bytes().await.unwrap();
            }
            _ => {
                let _ = field.text().await;
            }
        }
    }

    if file_name.ends_with(".xyz") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "unsupported format"})),
        )
            .into_response();
    }
    // A rejection whose body is not JSON at all.
    if file_name.ends_with(".gcode") {
        return (StatusCode::BAD_REQUEST, "sliced output is not printable").into_response();
    }

    let each = unit_price(&file_name);
    Json(json!({
        "price_each": each,
        "price_total": each * f64::from(quantity),
        "width": 40.0,
        "length": 30.0,
        "height": 20.0,
    }))
    .into_response()
}

async fn shipping_rate(
    State(state): State<Arc<MockState>>,
    mut multipart: Multipart,
) -> Response {
    state.rate_calls.fetch_add(1, Ordering::SeqCst);

    if state.fail_rates.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let mut zipcode = String::new();
    let mut file_count = 0_usize;

    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or_default() {
            "zipcode" => zipcode = field.text().await.unwrap(),
            "file" => {
                file_count += 1;
                let _ = field.bytes().await.unwrap();
            }
            _ => {
                let _ = field.text().await;
            }
        }
    }

    // The client validates before submitting; a malformed request here
    // means the workflow leaked one through.
    if zipcode.len() != 5 || file_count == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "invalid shipping request"})),
        )
            .into_response();
    }

    let rates = if state.offer_no_rates.load(Ordering::SeqCst) {
        json!([])
    } else {
        json!([
            {
                "object_id": "rate_1",
                "provider": "USPS",
                "service_level": "Ground Advantage",
                "amount": 7.5,
                "delivery_estimate_min": 5,
            },
            {
                "object_id": "rate_2",
                "provider": "UPS",
                "service_level": "2nd Day Air",
                "amount": 19.99,
                "delivery_estimate_min": 2,
            },
        ])
    };

    Json(json!({
        "session_id": "sess_1",
        "shipping_rates": rates,
    }))
    .into_response()
}

async fn checkout(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    state.checkout_calls.fetch_add(1, Ordering::SeqCst);

    if state.fail_checkout.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let mut session_id = String::new();
    let mut selected_rate = String::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or_default() {
            "session_id" => session_id = field.text().await.unwrap(),
            "selected_shipping_rate" => selected_rate = field.text().await.unwrap(),
            _ => {
                let _ = field.text().await;
            }
        }
    }

    if session_id != "sess_1" || !matches!(selected_rate.as_str(), "rate_1" | "rate_2") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "unknown session or shipping rate"})),
        )
            .into_response();
    }

    Json(json!({"checkout_link": "https://pay.example.com/cs_test_123"})).into_response()
}
