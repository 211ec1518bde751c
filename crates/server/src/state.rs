//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::StripeClient;
use crate::services::stripe::StripeError;
use crate::store::EntityStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; owns the configuration, the entity store
/// selected at startup, and the Stripe client when a key is configured.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn EntityStore>,
    stripe: Option<StripeClient>,
}

impl AppState {
    /// Create application state, building the Stripe client when a secret
    /// key is configured. Logs a single startup warning when it is not.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe client fails to build.
    pub fn new(config: ServerConfig, store: Arc<dyn EntityStore>) -> Result<Self, StripeError> {
        let stripe = match config.stripe_secret_key.as_ref() {
            Some(key) => Some(StripeClient::new(key)?),
            None => {
                tracing::warn!(
                    "STRIPE_SECRET_KEY not set; payment intent creation will fail until it is"
                );
                None
            }
        };
        Ok(Self::with_stripe(config, store, stripe))
    }

    /// Assemble state from already-built parts (used by tests to inject a
    /// stub-targeted Stripe client).
    #[must_use]
    pub fn with_stripe(
        config: ServerConfig,
        store: Arc<dyn EntityStore>,
        stripe: Option<StripeClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                stripe,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the entity store.
    #[must_use]
    pub fn store(&self) -> &dyn EntityStore {
        self.inner.store.as_ref()
    }

    /// Get the Stripe client, if configured.
    #[must_use]
    pub fn stripe(&self) -> Option<&StripeClient> {
        self.inner.stripe.as_ref()
    }
}
