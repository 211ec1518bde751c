//! User records.
//!
//! Users exist only through the store contract; no HTTP surface creates,
//! updates, or deletes them. They exist so customer ownership has somewhere
//! to point once authentication is built.

use serde::{Deserialize, Serialize};

use growthpro_core::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
}

/// Insert payload for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}
