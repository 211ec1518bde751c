//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`. Every error body on the wire is
//! `{"message": "..."}`, matching what the funnel client expects.

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::services::stripe::StripeError;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// Application-level error type for the funnel API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed schema validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Request body could not be read as JSON at all.
    #[error("{0}")]
    BadRequest(String),

    /// Entity store operation failed. The context string is the public
    /// message; the source never reaches the client.
    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// Payment-intent creation was requested without a configured key.
    #[error("Stripe is not configured")]
    StripeNotConfigured,

    /// Stripe API call failed.
    #[error("Error creating payment intent: {0}")]
    Stripe(#[from] StripeError),
}

impl AppError {
    /// Wrap a store failure with the endpoint's public message.
    pub const fn store(context: &'static str, source: StoreError) -> Self {
        Self::Store { context, source }
    }
}

/// Error body on the wire: `{"message": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store {
                source: StoreError::CustomerNotFound(_),
                ..
            } => StatusCode::NOT_FOUND,
            Self::Store { .. } | Self::StripeNotConfigured | Self::Stripe(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Capture server errors to Sentry (no-op when no DSN is configured)
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store {
                source: StoreError::CustomerNotFound(_),
                ..
            } => "Customer not found".to_string(),
            _ => self.to_string(),
        };

        (status, axum::Json(ErrorBody { message })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON extractor whose rejection is an [`AppError`].
///
/// Malformed, missing, or mistyped request bodies respond 400 with the
/// standard `{"message": ...}` body instead of axum's plain-text 415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
