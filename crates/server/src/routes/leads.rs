//! Lead capture route handlers.
//!
//! Leads come from the funnel's first step and the homepage form. They are
//! immutable once captured and never deleted.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use crate::error::{AppError, AppJson, Result};
use crate::models::Lead;
use crate::state::AppState;
use crate::validation::LeadRequest;

/// Capture a lead.
///
/// POST /api/leads
#[instrument(skip(state, req))]
pub async fn create(
    State(state): State<AppState>,
    AppJson(req): AppJson<LeadRequest>,
) -> Result<(StatusCode, AppJson<Lead>)> {
    let new = req.validate()?;
    let lead = state
        .store()
        .create_lead(new)
        .await
        .map_err(|e| AppError::store("An error occurred while creating the lead", e))?;
    tracing::info!(lead_id = %lead.id, "Lead captured");
    Ok((StatusCode::CREATED, AppJson(lead)))
}

/// List all leads in ascending creation order.
///
/// GET /api/leads
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<AppJson<Vec<Lead>>> {
    let leads = state
        .store()
        .get_all_leads()
        .await
        .map_err(|e| AppError::store("An error occurred while fetching leads", e))?;
    Ok(AppJson(leads))
}
