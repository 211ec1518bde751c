//! HTTP route handlers for the funnel API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (store probe)
//!
//! # Funnel API
//! POST /api/leads                       - Capture a lead
//! GET  /api/leads                       - List leads
//! POST /api/register-customer           - Register a customer
//! POST /api/create-payment-intent       - Create a Stripe payment intent
//! POST /api/update-customer-with-stripe - Attach Stripe ids post-payment
//! GET  /api/customers                   - List customers
//! GET  /api/payments                    - List payments
//! POST /api/record-payment              - Record a completed payment
//! ```

pub mod customers;
pub mod leads;
pub mod payments;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the funnel API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/api/leads", post(leads::create).get(leads::list))
        .route("/api/register-customer", post(customers::register))
        .route("/api/create-payment-intent", post(payments::create_intent))
        .route(
            "/api/update-customer-with-stripe",
            post(customers::link_stripe),
        )
        .route("/api/customers", get(customers::list))
        .route("/api/payments", get(payments::list))
        .route("/api/record-payment", post(payments::record))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Probes the entity store (`SELECT 1` for postgres, trivially Ok for the
/// in-memory variant). Returns 503 Service Unavailable on failure.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().health().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
