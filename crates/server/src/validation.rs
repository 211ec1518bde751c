//! Request body validation.
//!
//! Each endpoint has a permissive request DTO (every field optional, unknown
//! fields ignored — the funnel client sends an extra `billingInfo` object
//! that must be accepted and dropped) and a pure, synchronous `validate()`
//! that either produces the normalized store input or a structured list of
//! field-level violations. Validation never touches the store.

use core::fmt;

use serde::Deserialize;

use growthpro_core::{CustomerId, Email, Plan};

use crate::models::{NewCustomer, NewLead, StripeLink};

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Wire-format (camelCase) field name.
    pub field: &'static str,
    pub message: String,
}

/// A non-empty list of violations.
///
/// `Display` aggregates to one human-readable line in the shape the funnel
/// client already parses:
/// `Validation error: Required at "businessName"; Invalid email at "email"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error: ")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} at \"{}\"", v.message, v.field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates violations while individual checks run.
#[derive(Debug, Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(Violation {
            field,
            message: message.into(),
        });
    }

    /// Required string: present and non-empty after trimming. The stored
    /// value keeps its original whitespace.
    fn required(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        match value {
            None => {
                self.push(field, "Required");
                None
            }
            Some(v) if v.trim().is_empty() => {
                self.push(field, "String must contain at least 1 character(s)");
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Optional string: absent or empty normalizes to `None`.
    fn optional(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.is_empty())
    }

    fn email(&mut self, field: &'static str, value: Option<String>) -> Option<Email> {
        let raw = self.required(field, value)?;
        match Email::parse(&raw) {
            Ok(email) => Some(email),
            Err(_) => {
                self.push(field, "Invalid email");
                None
            }
        }
    }

    fn plan(&mut self, field: &'static str, value: Option<String>) -> Option<Plan> {
        let raw = self.required(field, value)?;
        match raw.parse::<Plan>() {
            Ok(plan) => Some(plan),
            Err(_) => {
                self.push(
                    field,
                    format!(
                        "Invalid enum value. Expected 'starter' | 'growth' | 'enterprise', received '{raw}'"
                    ),
                );
                None
            }
        }
    }

    /// Positive amount: present, finite, strictly greater than zero.
    fn positive_amount(&mut self, field: &'static str, value: Option<f64>) -> Option<f64> {
        match value {
            None => {
                self.push(field, "Required");
                None
            }
            Some(v) if !v.is_finite() || v <= 0.0 => {
                self.push(field, "Number must be greater than 0");
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Required integer id. Deliberately no positivity or existence check:
    /// the original accepted any integer here.
    fn required_id(&mut self, field: &'static str, value: Option<i32>) -> Option<i32> {
        if value.is_none() {
            self.push(field, "Required");
        }
        value
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(v) if self.violations.is_empty() => Ok(v),
            _ => Err(ValidationErrors(self.violations)),
        }
    }
}

/// POST /api/leads request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    pub email: Option<String>,
    pub business_name: Option<String>,
    pub website: Option<String>,
}

impl LeadRequest {
    /// # Errors
    ///
    /// Returns the aggregated field violations when any check fails.
    pub fn validate(self) -> Result<NewLead, ValidationErrors> {
        let mut check = Checker::default();
        let email = check.email("email", self.email);
        let business_name = check.required("businessName", self.business_name);
        let website = Checker::optional(self.website);

        let lead = email.zip(business_name).map(|(email, business_name)| NewLead {
            email,
            business_name,
            website,
        });
        check.finish(lead)
    }
}

/// POST /api/register-customer request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerRequest {
    pub business_name: Option<String>,
    pub business_website: Option<String>,
    pub industry: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub plan: Option<String>,
}

impl RegisterCustomerRequest {
    /// # Errors
    ///
    /// Returns the aggregated field violations when any check fails.
    pub fn validate(self) -> Result<NewCustomer, ValidationErrors> {
        let mut check = Checker::default();
        let business_name = check.required("businessName", self.business_name);
        let business_website = Checker::optional(self.business_website);
        let industry = check.required("industry", self.industry);
        let contact_name = check.required("contactName", self.contact_name);
        let email = check.email("email", self.email);
        let plan = check.plan("plan", self.plan);

        let customer = match (business_name, industry, contact_name, email, plan) {
            (Some(business_name), Some(industry), Some(contact_name), Some(email), Some(plan)) => {
                Some(NewCustomer {
                    business_name,
                    business_website,
                    industry,
                    contact_name,
                    email,
                    plan,
                })
            }
            _ => None,
        };
        check.finish(customer)
    }
}

/// POST /api/create-payment-intent request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    pub amount: Option<f64>,
    pub plan: Option<String>,
}

/// Validated payment-intent input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentIntentInput {
    /// Amount in dollars, as submitted.
    pub amount: f64,
    pub plan: Plan,
}

impl PaymentIntentRequest {
    /// # Errors
    ///
    /// Returns the aggregated field violations when any check fails.
    pub fn validate(self) -> Result<PaymentIntentInput, ValidationErrors> {
        let mut check = Checker::default();
        let amount = check.positive_amount("amount", self.amount);
        let plan = check.plan("plan", self.plan);

        let input = amount.zip(plan).map(|(amount, plan)| PaymentIntentInput { amount, plan });
        check.finish(input)
    }
}

/// POST /api/update-customer-with-stripe request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeLinkRequest {
    pub customer_id: Option<i32>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
}

impl StripeLinkRequest {
    /// # Errors
    ///
    /// Returns the aggregated field violations when any check fails.
    pub fn validate(self) -> Result<StripeLink, ValidationErrors> {
        let mut check = Checker::default();
        let customer_id = check.required_id("customerId", self.customer_id);
        let stripe_customer_id = check.required("stripeCustomerId", self.stripe_customer_id);
        let stripe_subscription_id = Checker::optional(self.stripe_subscription_id);

        let link = customer_id
            .zip(stripe_customer_id)
            .map(|(customer_id, stripe_customer_id)| StripeLink {
                customer_id: CustomerId::new(customer_id),
                stripe_customer_id,
                stripe_subscription_id,
            });
        check.finish(link)
    }
}

/// POST /api/record-payment request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub customer_id: Option<i32>,
    pub amount: Option<f64>,
    pub payment_intent_id: Option<String>,
}

/// Validated payment-recording input. The handler supplies the fixed
/// currency and status.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPaymentInput {
    pub customer_id: CustomerId,
    pub amount: f64,
    pub payment_intent_id: String,
}

impl RecordPaymentRequest {
    /// # Errors
    ///
    /// Returns the aggregated field violations when any check fails.
    pub fn validate(self) -> Result<RecordPaymentInput, ValidationErrors> {
        let mut check = Checker::default();
        let customer_id = check.required_id("customerId", self.customer_id);
        let amount = check.positive_amount("amount", self.amount);
        let payment_intent_id = check.required("paymentIntentId", self.payment_intent_id);

        let input = match (customer_id, amount, payment_intent_id) {
            (Some(customer_id), Some(amount), Some(payment_intent_id)) => Some(RecordPaymentInput {
                customer_id: CustomerId::new(customer_id),
                amount,
                payment_intent_id,
            }),
            _ => None,
        };
        check.finish(input)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_valid_with_website_omitted() {
        let req = LeadRequest {
            email: Some("a@b.com".to_string()),
            business_name: Some("Acme".to_string()),
            website: None,
        };
        let lead = req.validate().unwrap();
        assert_eq!(lead.email.as_str(), "a@b.com");
        assert_eq!(lead.business_name, "Acme");
        assert_eq!(lead.website, None);
    }

    #[test]
    fn test_lead_empty_website_normalizes_to_none() {
        let req = LeadRequest {
            email: Some("a@b.com".to_string()),
            business_name: Some("Acme".to_string()),
            website: Some(String::new()),
        };
        assert_eq!(req.validate().unwrap().website, None);
    }

    #[test]
    fn test_lead_rejects_empty_business_name() {
        let req = LeadRequest {
            email: Some("a@b.com".to_string()),
            business_name: Some("   ".to_string()),
            website: None,
        };
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.violations().len(), 1);
        assert_eq!(errs.violations()[0].field, "businessName");
    }

    #[test]
    fn test_lead_rejects_malformed_email() {
        let req = LeadRequest {
            email: Some("not-an-email".to_string()),
            business_name: Some("Acme".to_string()),
            website: None,
        };
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.violations()[0].field, "email");
        assert_eq!(errs.violations()[0].message, "Invalid email");
    }

    #[test]
    fn test_lead_aggregates_all_violations() {
        let req = LeadRequest {
            email: None,
            business_name: None,
            website: None,
        };
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.violations().len(), 2);
        assert_eq!(
            errs.to_string(),
            "Validation error: Required at \"email\"; Required at \"businessName\""
        );
    }

    #[test]
    fn test_register_customer_valid() {
        let req = RegisterCustomerRequest {
            business_name: Some("Acme".to_string()),
            business_website: Some("https://acme.com".to_string()),
            industry: Some("retail".to_string()),
            contact_name: Some("Jo Smith".to_string()),
            email: Some("jo@acme.com".to_string()),
            plan: Some("growth".to_string()),
        };
        let customer = req.validate().unwrap();
        assert_eq!(customer.plan, Plan::Growth);
        assert_eq!(customer.business_website.as_deref(), Some("https://acme.com"));
    }

    #[test]
    fn test_register_customer_rejects_unknown_plan() {
        let req = RegisterCustomerRequest {
            business_name: Some("Acme".to_string()),
            business_website: None,
            industry: Some("retail".to_string()),
            contact_name: Some("Jo Smith".to_string()),
            email: Some("jo@acme.com".to_string()),
            plan: Some("gold".to_string()),
        };
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.violations()[0].field, "plan");
        assert!(errs.violations()[0].message.contains("received 'gold'"));
    }

    #[test]
    fn test_payment_intent_rejects_non_positive_amount() {
        for amount in [0.0, -5.0] {
            let req = PaymentIntentRequest {
                amount: Some(amount),
                plan: Some("starter".to_string()),
            };
            let errs = req.validate().unwrap_err();
            assert_eq!(errs.violations()[0].field, "amount");
            assert_eq!(errs.violations()[0].message, "Number must be greater than 0");
        }
    }

    #[test]
    fn test_payment_intent_valid() {
        let req = PaymentIntentRequest {
            amount: Some(1997.0),
            plan: Some("growth".to_string()),
        };
        let input = req.validate().unwrap();
        assert!((input.amount - 1997.0).abs() < f64::EPSILON);
        assert_eq!(input.plan, Plan::Growth);
    }

    #[test]
    fn test_stripe_link_requires_customer_id() {
        let req = StripeLinkRequest {
            customer_id: None,
            stripe_customer_id: Some("cus_123".to_string()),
            stripe_subscription_id: None,
        };
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.violations()[0].field, "customerId");
    }

    #[test]
    fn test_stripe_link_subscription_optional() {
        let req = StripeLinkRequest {
            customer_id: Some(3),
            stripe_customer_id: Some("cus_123".to_string()),
            stripe_subscription_id: None,
        };
        let link = req.validate().unwrap();
        assert_eq!(link.customer_id, CustomerId::new(3));
        assert_eq!(link.stripe_subscription_id, None);
    }

    #[test]
    fn test_record_payment_allows_any_customer_id() {
        // No existence or positivity check on customerId (preserved behavior)
        let req = RecordPaymentRequest {
            customer_id: Some(-42),
            amount: Some(997.0),
            payment_intent_id: Some("pi_123".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_record_payment_requires_intent_id() {
        let req = RecordPaymentRequest {
            customer_id: Some(1),
            amount: Some(997.0),
            payment_intent_id: None,
        };
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.violations()[0].field, "paymentIntentId");
    }
}
