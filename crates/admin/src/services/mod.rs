//! Business logic services for admin.
//!
//! # Services
//!
//! - `email` - Transaction notifications through the mail relay

pub mod email;
