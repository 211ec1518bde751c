//! Stripe API client for payment-intent creation.
//!
//! Talks to Stripe's public REST API with a pinned API version. The client
//! is built without a request timeout: a hung Stripe call blocks that one
//! request, which reproduces the original service's behavior.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use growthpro_core::Plan;

/// Stripe API base URL.
const BASE_URL: &str = "https://api.stripe.com";

/// Pinned Stripe API version.
const STRIPE_VERSION: &str = "2025-04-30.basil";

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response; the message is Stripe's own.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Failed to build the client or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A created payment intent, as the funnel needs it.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Client-held secret for confirming the payment browser-side.
    /// Nullable in Stripe's schema; passed through as-is.
    pub client_secret: Option<String>,
}

/// Shape of Stripe's error body: `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    base_url: String,
}

impl StripeClient {
    /// Create a new Stripe client against the production API.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(secret_key: &SecretString) -> Result<Self, StripeError> {
        Self::with_base_url(secret_key, BASE_URL)
    }

    /// Create a client against an alternate base URL (stripe-mock or an
    /// in-process stub in tests).
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_base_url(secret_key: &SecretString, base_url: &str) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| StripeError::Parse(format!("Invalid secret key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        headers.insert("Stripe-Version", HeaderValue::from_static(STRIPE_VERSION));

        // No request timeout: a hung collaborator call blocks that request
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a payment intent for the given amount and plan.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Api`] with Stripe's own message on a
    /// non-success response, [`StripeError::Http`] on transport failure.
    pub async fn create_payment_intent(
        &self,
        amount_cents: i64,
        plan: Plan,
    ) -> Result<PaymentIntent, StripeError> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        let params = payment_intent_params(amount_cents, plan);

        let response = self.client.post(&url).form(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), "Stripe payment intent failed");
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .map_err(|e| StripeError::Parse(e.to_string()))?;
        tracing::info!(payment_intent_id = %intent.id, "Stripe payment intent created");
        Ok(intent)
    }
}

/// Form parameters for `POST /v1/payment_intents`.
fn payment_intent_params(amount_cents: i64, plan: Plan) -> Vec<(&'static str, String)> {
    vec![
        ("amount", amount_cents.to_string()),
        ("currency", "usd".to_string()),
        ("metadata[plan]", plan.as_str().to_string()),
    ]
}

/// Convert a dollar amount to integer cents the way the original did.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // funnel amounts are far below i64 range
pub fn dollars_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_intent_params() {
        let params = payment_intent_params(199_700, Plan::Growth);
        assert_eq!(
            params,
            vec![
                ("amount", "199700".to_string()),
                ("currency", "usd".to_string()),
                ("metadata[plan]", "growth".to_string()),
            ]
        );
    }

    #[test]
    fn test_dollars_to_cents() {
        assert_eq!(dollars_to_cents(1997.0), 199_700);
        assert_eq!(dollars_to_cents(997.0), 99_700);
        assert_eq!(dollars_to_cents(10.5), 1050);
        assert_eq!(dollars_to_cents(0.01), 1);
    }

    #[test]
    fn test_api_error_body_parsing() {
        let body = r#"{"error": {"message": "Amount must be at least 50 cents"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.error.message.as_deref(),
            Some("Amount must be at least 50 cents")
        );
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let client =
            StripeClient::with_base_url(&SecretString::from("sk_test_abc"), "http://localhost:1/")
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:1");
    }
}
