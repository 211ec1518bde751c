//! Customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use growthpro_core::{CustomerId, Email, Plan, UserId};

/// Placeholder owning-user id stamped on every customer.
///
/// Authentication is unimplemented; there is no backing user row, and the
/// `customers.user_id` column carries no foreign-key constraint for exactly
/// that reason.
pub const DEFAULT_USER_ID: UserId = UserId::new(1);

/// A registered customer from the funnel's payment step.
///
/// Both Stripe fields are null at creation and set exactly once by the
/// post-payment linkage operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: UserId,
    pub business_name: String,
    pub business_website: Option<String>,
    pub industry: String,
    pub contact_name: String,
    pub email: Email,
    pub plan: Plan,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated registration input; the store stamps [`DEFAULT_USER_ID`],
/// nulls both Stripe fields, and assigns id and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub business_name: String,
    pub business_website: Option<String>,
    pub industry: String,
    pub contact_name: String,
    pub email: Email,
    pub plan: Plan,
}

/// Validated post-payment linkage input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeLink {
    pub customer_id: CustomerId,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: Option<String>,
}
