//! Elite Cards Core - Shared types library.
//!
//! This crate provides common types used across all Elite Cards components:
//! - `storefront` - Catalog, cart, currency conversion and page loading
//! - `admin` - Back-office dashboard, remote records and notifications
//! - `cli` - Command-line entry point wiring the services together
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no network I/O, no HTTP
//! clients. The one piece of behaviour it carries is [`MemoryStore`], an
//! in-process implementation of the [`KeyValueStore`] persistence seam.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, emails, statuses and domain records
//! - [`store`] - The synchronous key-value persistence interface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod store;
pub mod types;

pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use types::*;
