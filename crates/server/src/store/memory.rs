//! In-memory entity store.
//!
//! Process-lifetime storage: one locked table per entity type, each holding
//! a next-id counter (starting at 1) and an id-ordered map of rows. Id
//! assignment and insertion happen inside a single write-lock section, so
//! concurrent creates cannot observe the same id. Everything is lost on
//! restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use growthpro_core::{CustomerId, LeadId, PaymentId, UserId};

use super::{EntityStore, StoreError};
use crate::models::{
    Customer, DEFAULT_USER_ID, Lead, NewCustomer, NewLead, NewPayment, NewUser, Payment,
    StripeLink, User,
};

/// One entity collection: serial id counter plus id-keyed rows.
///
/// `BTreeMap` iteration ascends by id, which equals insertion order under
/// the monotonic counter.
#[derive(Debug)]
struct Table<T> {
    next_id: i32,
    rows: BTreeMap<i32, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    /// Assign the next id, build the row from it, and insert.
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

/// Map-backed store variant; selected when `DATABASE_URL` is absent.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Table<User>>,
    leads: RwLock<Table<Lead>>,
    customers: RwLock<Table<Customer>>,
    payments: RwLock<Table<Payment>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let user = self.users.write().await.insert_with(|id| User {
            id: UserId::new(id),
            username: new.username,
            password: new.password,
        });
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.rows.get(&id.as_i32()).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.rows.values().find(|u| u.username == username).cloned())
    }

    async fn create_lead(&self, new: NewLead) -> Result<Lead, StoreError> {
        let lead = self.leads.write().await.insert_with(|id| Lead {
            id: LeadId::new(id),
            email: new.email,
            business_name: new.business_name,
            website: new.website,
            created_at: Utc::now(),
        });
        Ok(lead)
    }

    async fn get_all_leads(&self) -> Result<Vec<Lead>, StoreError> {
        Ok(self.leads.read().await.all())
    }

    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let customer = self.customers.write().await.insert_with(|id| Customer {
            id: CustomerId::new(id),
            user_id: DEFAULT_USER_ID,
            business_name: new.business_name,
            business_website: new.business_website,
            industry: new.industry,
            contact_name: new.contact_name,
            email: new.email,
            plan: new.plan,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            created_at: Utc::now(),
        });
        Ok(customer)
    }

    async fn update_customer_with_stripe(&self, link: StripeLink) -> Result<Customer, StoreError> {
        let mut customers = self.customers.write().await;
        let customer = customers
            .rows
            .get_mut(&link.customer_id.as_i32())
            .ok_or(StoreError::CustomerNotFound(link.customer_id))?;
        customer.stripe_customer_id = Some(link.stripe_customer_id);
        customer.stripe_subscription_id = link.stripe_subscription_id;
        Ok(customer.clone())
    }

    async fn get_all_customers(&self) -> Result<Vec<Customer>, StoreError> {
        Ok(self.customers.read().await.all())
    }

    async fn create_payment(&self, new: NewPayment) -> Result<Payment, StoreError> {
        let payment = self.payments.write().await.insert_with(|id| Payment {
            id: PaymentId::new(id),
            customer_id: new.customer_id,
            amount: new.amount,
            currency: new.currency,
            status: new.status,
            payment_intent_id: new.payment_intent_id,
            created_at: Utc::now(),
        });
        Ok(payment)
    }

    async fn get_all_payments(&self) -> Result<Vec<Payment>, StoreError> {
        Ok(self.payments.read().await.all())
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use growthpro_core::{Email, Plan};

    use super::*;

    fn new_lead(email: &str) -> NewLead {
        NewLead {
            email: Email::parse(email).unwrap(),
            business_name: "Acme".to_string(),
            website: None,
        }
    }

    fn new_customer() -> NewCustomer {
        NewCustomer {
            business_name: "Acme".to_string(),
            business_website: None,
            industry: "retail".to_string(),
            contact_name: "Jo Smith".to_string(),
            email: Email::parse("jo@acme.com").unwrap(),
            plan: Plan::Growth,
        }
    }

    #[tokio::test]
    async fn test_lead_ids_strictly_increase() {
        let store = MemoryStore::new();
        let mut last = 0;
        for i in 0..5 {
            let lead = store
                .create_lead(new_lead(&format!("a{i}@b.com")))
                .await
                .unwrap();
            assert!(lead.id.as_i32() > last);
            last = lead.id.as_i32();
        }
    }

    #[tokio::test]
    async fn test_lead_website_null_when_omitted() {
        let store = MemoryStore::new();
        let lead = store.create_lead(new_lead("a@b.com")).await.unwrap();
        assert_eq!(lead.id, LeadId::new(1));
        assert_eq!(lead.website, None);
    }

    #[tokio::test]
    async fn test_customer_stripe_fields_null_until_linked() {
        let store = MemoryStore::new();
        let customer = store.create_customer(new_customer()).await.unwrap();
        assert_eq!(customer.user_id, DEFAULT_USER_ID);
        assert_eq!(customer.stripe_customer_id, None);
        assert_eq!(customer.stripe_subscription_id, None);

        let updated = store
            .update_customer_with_stripe(StripeLink {
                customer_id: customer.id,
                stripe_customer_id: "cus_123".to_string(),
                stripe_subscription_id: Some("sub_456".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(updated.stripe_customer_id.as_deref(), Some("cus_123"));
        assert_eq!(updated.stripe_subscription_id.as_deref(), Some("sub_456"));
        // Everything else preserved
        assert_eq!(updated.business_name, customer.business_name);
        assert_eq!(updated.created_at, customer.created_at);
    }

    #[tokio::test]
    async fn test_link_unknown_customer_leaves_store_unchanged() {
        let store = MemoryStore::new();
        let customer = store.create_customer(new_customer()).await.unwrap();

        let err = store
            .update_customer_with_stripe(StripeLink {
                customer_id: CustomerId::new(99),
                stripe_customer_id: "cus_123".to_string(),
                stripe_subscription_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CustomerNotFound(id) if id == CustomerId::new(99)));

        let all = store.get_all_customers().await.unwrap();
        assert_eq!(all, vec![customer]);
    }

    #[tokio::test]
    async fn test_get_all_returns_insertion_order() {
        let store = MemoryStore::new();
        for i in 0..4 {
            store
                .create_lead(new_lead(&format!("a{i}@b.com")))
                .await
                .unwrap();
        }
        let leads = store.get_all_leads().await.unwrap();
        let ids: Vec<i32> = leads.iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_payment_with_unknown_customer_id_is_accepted() {
        let store = MemoryStore::new();
        let payment = store
            .create_payment(NewPayment {
                customer_id: CustomerId::new(999),
                amount: 1997.0,
                currency: "usd".to_string(),
                status: "succeeded".to_string(),
                payment_intent_id: "pi_123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(payment.id, PaymentId::new(1));
        assert_eq!(payment.customer_id, CustomerId::new(999));
    }

    #[tokio::test]
    async fn test_user_lookup_by_username() {
        let store = MemoryStore::new();
        store
            .create_user(NewUser {
                username: "owner".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();

        let found = store.get_user_by_username("owner").await.unwrap();
        assert_eq!(found.unwrap().id, UserId::new(1));
        assert!(store.get_user_by_username("nobody").await.unwrap().is_none());
        assert!(store.get_user(UserId::new(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_assign_distinct_ids() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create_lead(new_lead(&format!("a{i}@b.com"))).await
            }));
        }
        let mut ids: Vec<i32> = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id.as_i32());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<i32>>());
    }
}
