//! Customer registration and Stripe linkage route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use crate::error::{AppError, AppJson, Result};
use crate::models::Customer;
use crate::state::AppState;
use crate::validation::{RegisterCustomerRequest, StripeLinkRequest};

/// Register a customer when the funnel reaches the payment step.
///
/// POST /api/register-customer
///
/// Never contacts Stripe; a later failed payment-intent creation leaves an
/// orphaned customer record by design.
#[instrument(skip(state, req))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterCustomerRequest>,
) -> Result<(StatusCode, AppJson<Customer>)> {
    let new = req.validate()?;
    let customer = state
        .store()
        .create_customer(new)
        .await
        .map_err(|e| AppError::store("An error occurred while registering the customer", e))?;
    tracing::info!(customer_id = %customer.id, plan = %customer.plan, "Customer registered");
    Ok((StatusCode::CREATED, AppJson(customer)))
}

/// Attach Stripe identifiers to a customer after successful checkout.
///
/// POST /api/update-customer-with-stripe
///
/// Responds 404 when the customer id does not exist.
#[instrument(skip(state, req))]
pub async fn link_stripe(
    State(state): State<AppState>,
    AppJson(req): AppJson<StripeLinkRequest>,
) -> Result<AppJson<Customer>> {
    let link = req.validate()?;
    let customer = state
        .store()
        .update_customer_with_stripe(link)
        .await
        .map_err(|e| AppError::store("An error occurred while updating the customer", e))?;
    tracing::info!(customer_id = %customer.id, "Customer linked to Stripe");
    Ok(AppJson(customer))
}

/// List all customers in ascending creation order.
///
/// GET /api/customers
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<AppJson<Vec<Customer>>> {
    let customers = state
        .store()
        .get_all_customers()
        .await
        .map_err(|e| AppError::store("An error occurred while fetching customers", e))?;
    Ok(AppJson(customers))
}
