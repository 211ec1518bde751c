//! The entity store: Lead/Customer/Payment/User persistence.
//!
//! Two interchangeable variants sit behind the [`EntityStore`] trait: an
//! in-memory map-backed store ([`MemoryStore`]) and a `PostgreSQL` store
//! ([`PostgresStore`]). Selection happens once at startup in
//! [`create_store`], based on whether `DATABASE_URL` is configured, and is
//! never switched at runtime.

pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use growthpro_core::{CustomerId, UserId};

use crate::models::{
    Customer, Lead, NewCustomer, NewLead, NewPayment, NewUser, Payment, StripeLink, User,
};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Errors surfaced by either store variant.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referenced customer id does not exist.
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    /// Uniqueness constraint violated (username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored row could not be mapped back into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// The uniform store contract both variants satisfy.
///
/// Object-safe; held as `Arc<dyn EntityStore>` in application state.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Assigns the next id and stores the user.
    ///
    /// The `PostgreSQL` variant maps a username unique violation to
    /// [`StoreError::Conflict`]; the in-memory variant performs no
    /// uniqueness check.
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Assigns the next id, stamps `created_at`, and stores the lead.
    async fn create_lead(&self, new: NewLead) -> Result<Lead, StoreError>;

    /// All leads in ascending creation order.
    async fn get_all_leads(&self) -> Result<Vec<Lead>, StoreError>;

    /// Assigns the next id, stamps the placeholder owning-user id and
    /// `created_at`, nulls both Stripe fields, and stores the customer.
    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, StoreError>;

    /// Overwrites only the two Stripe fields of an existing customer.
    ///
    /// Fails with [`StoreError::CustomerNotFound`] when the id is absent,
    /// leaving the store unchanged.
    async fn update_customer_with_stripe(&self, link: StripeLink) -> Result<Customer, StoreError>;

    /// All customers in ascending creation order.
    async fn get_all_customers(&self) -> Result<Vec<Customer>, StoreError>;

    /// Assigns the next id, stamps `created_at`, and stores the payment.
    /// No referential check on `customer_id`.
    async fn create_payment(&self, new: NewPayment) -> Result<Payment, StoreError>;

    /// All payments in ascending creation order.
    async fn get_all_payments(&self) -> Result<Vec<Payment>, StoreError>;

    /// Readiness probe: trivially Ok for the in-memory variant, `SELECT 1`
    /// for `PostgreSQL`.
    async fn health(&self) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Select and construct the store variant from configuration.
///
/// Called once at startup; the choice is process-wide for the lifetime of
/// the server.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the `PostgreSQL` pool cannot be
/// created.
pub async fn create_store(
    database_url: Option<&SecretString>,
) -> Result<Arc<dyn EntityStore>, StoreError> {
    match database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            tracing::info!("entity store: postgres");
            Ok(Arc::new(PostgresStore::new(pool)))
        }
        None => {
            tracing::info!("entity store: in-memory (DATABASE_URL not set)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
