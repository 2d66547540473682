//! Business logic services for storefront.
//!
//! # Services
//!
//! - `account` - Backend-facing account and payment operations
//! - `payments` - Local mirror of payments not recorded remotely

pub mod account;
pub mod payments;
