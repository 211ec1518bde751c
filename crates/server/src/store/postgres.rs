//! `PostgreSQL` entity store.
//!
//! Id generation (`SERIAL`), `created_at` stamping (`DEFAULT now()`), and
//! durability are delegated to `PostgreSQL`. Queries are runtime-checked
//! `query_as` over plain row structs, which are then mapped into the domain
//! models; rows whose `email` or `plan` text no longer parses surface as
//! [`StoreError::DataCorruption`].
//!
//! `get_all_*` orders by `created_at ASC, id ASC` — the id tiebreak keeps
//! the ordering deterministic when two rows share a timestamp.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use growthpro_core::{CustomerId, Email, LeadId, PaymentId, Plan, UserId};

use super::{EntityStore, StoreError};
use crate::models::{
    Customer, DEFAULT_USER_ID, Lead, NewCustomer, NewLead, NewPayment, NewUser, Payment,
    StripeLink, User,
};

/// Store variant backed by a `PostgreSQL` pool; selected when
/// `DATABASE_URL` is configured.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i32,
    username: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            password: row.password,
        }
    }
}

#[derive(FromRow)]
struct LeadRow {
    id: i32,
    email: String,
    business_name: String,
    website: Option<String>,
    created_at: DateTime<Utc>,
}

impl LeadRow {
    fn into_lead(self) -> Result<Lead, StoreError> {
        let email = Email::parse(&self.email)
            .map_err(|e| StoreError::DataCorruption(format!("invalid email in leads row: {e}")))?;
        Ok(Lead {
            id: LeadId::new(self.id),
            email,
            business_name: self.business_name,
            website: self.website,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct CustomerRow {
    id: i32,
    user_id: i32,
    business_name: String,
    business_website: Option<String>,
    industry: String,
    contact_name: String,
    email: String,
    plan: String,
    stripe_customer_id: Option<String>,
    stripe_subscription_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self) -> Result<Customer, StoreError> {
        let email = Email::parse(&self.email).map_err(|e| {
            StoreError::DataCorruption(format!("invalid email in customers row: {e}"))
        })?;
        let plan = self.plan.parse::<Plan>().map_err(|e| {
            StoreError::DataCorruption(format!("invalid plan in customers row: {e}"))
        })?;
        Ok(Customer {
            id: CustomerId::new(self.id),
            user_id: UserId::new(self.user_id),
            business_name: self.business_name,
            business_website: self.business_website,
            industry: self.industry,
            contact_name: self.contact_name,
            email,
            plan,
            stripe_customer_id: self.stripe_customer_id,
            stripe_subscription_id: self.stripe_subscription_id,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct PaymentRow {
    id: i32,
    customer_id: i32,
    amount: f64,
    currency: String,
    status: String,
    payment_intent_id: String,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: PaymentId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            amount: row.amount,
            currency: row.currency,
            status: row.status,
            payment_intent_id: row.payment_intent_id,
            created_at: row.created_at,
        }
    }
}

const CUSTOMER_COLUMNS: &str = "id, user_id, business_name, business_website, industry, \
     contact_name, email, plan, stripe_customer_id, stripe_subscription_id, created_at";

#[async_trait]
impl EntityStore for PostgresStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, password) VALUES ($1, $2) \
             RETURNING id, username, password",
        )
        .bind(&new.username)
        .bind(&new.password)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_unique_violation)?;
        Ok(row.into())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn create_lead(&self, new: NewLead) -> Result<Lead, StoreError> {
        let row = sqlx::query_as::<_, LeadRow>(
            "INSERT INTO leads (email, business_name, website) VALUES ($1, $2, $3) \
             RETURNING id, email, business_name, website, created_at",
        )
        .bind(new.email.as_str())
        .bind(&new.business_name)
        .bind(&new.website)
        .fetch_one(&self.pool)
        .await?;
        row.into_lead()
    }

    async fn get_all_leads(&self) -> Result<Vec<Lead>, StoreError> {
        let rows = sqlx::query_as::<_, LeadRow>(
            "SELECT id, email, business_name, website, created_at FROM leads \
             ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(LeadRow::into_lead).collect()
    }

    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO customers \
             (user_id, business_name, business_website, industry, contact_name, email, plan) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(DEFAULT_USER_ID)
        .bind(&new.business_name)
        .bind(&new.business_website)
        .bind(&new.industry)
        .bind(&new.contact_name)
        .bind(new.email.as_str())
        .bind(new.plan)
        .fetch_one(&self.pool)
        .await?;
        row.into_customer()
    }

    async fn update_customer_with_stripe(&self, link: StripeLink) -> Result<Customer, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customers SET stripe_customer_id = $2, stripe_subscription_id = $3 \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(link.customer_id)
        .bind(&link.stripe_customer_id)
        .bind(&link.stripe_subscription_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::CustomerNotFound(link.customer_id))?;
        row.into_customer()
    }

    async fn get_all_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(CustomerRow::into_customer).collect()
    }

    async fn create_payment(&self, new: NewPayment) -> Result<Payment, StoreError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            "INSERT INTO payments (customer_id, amount, currency, status, payment_intent_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, customer_id, amount, currency, status, payment_intent_id, created_at",
        )
        .bind(new.customer_id)
        .bind(new.amount)
        .bind(&new.currency)
        .bind(&new.status)
        .bind(&new.payment_intent_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_all_payments(&self) -> Result<Vec<Payment>, StoreError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT id, customer_id, amount, currency, status, payment_intent_id, created_at \
             FROM payments ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map a unique violation to [`StoreError::Conflict`].
fn conflict_on_unique_violation(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.message().to_string())
        }
        _ => StoreError::Database(e),
    }
}
