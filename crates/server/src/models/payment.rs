//! Payment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use growthpro_core::{CustomerId, PaymentId};

/// A recorded charge against a customer.
///
/// Immutable once created. `customer_id` is not referentially checked:
/// the funnel client records the payment it just completed, and the
/// original service trusted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub customer_id: CustomerId,
    /// Amount as the client submitted it (dollars in practice); echoed
    /// back exactly as recorded.
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub payment_intent_id: String,
    pub created_at: DateTime<Utc>,
}

/// Validated payment-recording input; the store assigns id and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub customer_id: CustomerId,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub payment_intent_id: String,
}
