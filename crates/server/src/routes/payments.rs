//! Payment-intent creation and payment recording route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, AppJson, Result};
use crate::models::{NewPayment, Payment};
use crate::services::stripe::dollars_to_cents;
use crate::state::AppState;
use crate::validation::{PaymentIntentRequest, RecordPaymentRequest};

/// Recorded payments always carry these; the funnel only records charges it
/// has already seen succeed.
const PAYMENT_CURRENCY: &str = "usd";
const PAYMENT_STATUS: &str = "succeeded";

/// Response for a created payment intent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    /// Stripe's client-held confirmation secret (nullable passthrough).
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
}

/// Create a Stripe payment intent for the selected plan.
///
/// POST /api/create-payment-intent
///
/// The configuration check comes before validation, matching the original
/// service's ordering.
#[instrument(skip(state, req))]
pub async fn create_intent(
    State(state): State<AppState>,
    AppJson(req): AppJson<PaymentIntentRequest>,
) -> Result<AppJson<PaymentIntentResponse>> {
    let Some(stripe) = state.stripe() else {
        return Err(AppError::StripeNotConfigured);
    };
    let input = req.validate()?;

    let intent = stripe
        .create_payment_intent(dollars_to_cents(input.amount), input.plan)
        .await?;

    Ok(AppJson(PaymentIntentResponse {
        client_secret: intent.client_secret,
        payment_intent_id: intent.id,
    }))
}

/// Record a completed payment.
///
/// POST /api/record-payment
///
/// `customerId` is not checked against existing customers (preserved
/// upstream behavior).
#[instrument(skip(state, req))]
pub async fn record(
    State(state): State<AppState>,
    AppJson(req): AppJson<RecordPaymentRequest>,
) -> Result<(StatusCode, AppJson<Payment>)> {
    let input = req.validate()?;
    let payment = state
        .store()
        .create_payment(NewPayment {
            customer_id: input.customer_id,
            amount: input.amount,
            currency: PAYMENT_CURRENCY.to_string(),
            status: PAYMENT_STATUS.to_string(),
            payment_intent_id: input.payment_intent_id,
        })
        .await
        .map_err(|e| AppError::store("An error occurred while recording the payment", e))?;
    tracing::info!(payment_id = %payment.id, customer_id = %payment.customer_id, "Payment recorded");
    Ok((StatusCode::CREATED, AppJson(payment)))
}

/// List all payments in ascending creation order.
///
/// GET /api/payments
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<AppJson<Vec<Payment>>> {
    let payments = state
        .store()
        .get_all_payments()
        .await
        .map_err(|e| AppError::store("An error occurred while fetching payments", e))?;
    Ok(AppJson(payments))
}
