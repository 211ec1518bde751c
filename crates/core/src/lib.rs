//! GrowthPro Core - Shared domain types.
//!
//! This crate provides the types shared across GrowthPro components:
//! - `server` - The funnel API (lead capture, registration, payments)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and plan tags

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
