//! Lead records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use growthpro_core::{Email, LeadId};

/// A prospective customer's initial contact submission.
///
/// Immutable once created; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub email: Email,
    pub business_name: String,
    /// `null` when the form omitted it or submitted an empty string.
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated lead-capture input; the store assigns id and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub email: Email,
    pub business_name: String,
    pub website: Option<String>,
}
