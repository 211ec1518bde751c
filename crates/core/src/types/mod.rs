//! Core types for GrowthPro.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod plan;

pub use email::{Email, EmailError};
pub use id::*;
pub use plan::Plan;
