//! External service clients.

pub mod stripe;

pub use stripe::StripeClient;
