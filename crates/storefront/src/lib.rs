//! Elite Cards storefront library.
//!
//! Catalog, cart, currency conversion, the signed-in user, the stubbed
//! backend account service and the page fragment loader, all wired together
//! by [`state::Storefront`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod error;
pub mod pages;
pub mod services;
pub mod session;
pub mod state;

pub use error::{Result, StorefrontError};
pub use state::{HttpStorefront, Storefront};
