//! Entity records and insert payloads.
//!
//! Each entity has a full record type (what the store returns and the API
//! serializes) and an insert payload (what a validated request produces).
//! Wire format is camelCase JSON; optional fields serialize as explicit
//! `null`, never omitted.

pub mod customer;
pub mod lead;
pub mod payment;
pub mod user;

pub use customer::{Customer, DEFAULT_USER_ID, NewCustomer, StripeLink};
pub use lead::{Lead, NewLead};
pub use payment::{NewPayment, Payment};
pub use user::{NewUser, User};
