//! Elite Cards admin library.
//!
//! The operator dashboard: login, card and transaction management against
//! the remote record service with local fallbacks, and transaction
//! notifications through the mail relay.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod records;
pub mod resilient;
pub mod services;

pub use error::{AdminError, Result};
