//! Core types for Elite Cards.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod payment;
pub mod price;
pub mod product;
pub mod status;
pub mod user;

pub use cart::{CartLine, LineItem};
pub use email::{Email, EmailError};
pub use id::*;
pub use payment::Transaction;
pub use price::{CurrencyCode, Price, round_cents};
pub use product::Product;
pub use status::*;
pub use user::SessionUser;
