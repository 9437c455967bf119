//! Starfruit Core - Shared types library.
//!
//! This crate provides the domain types used across the Starfruit client SDK:
//! - `client` - Storage backends, cart store, and gateway HTTP client
//! - `integration-tests` - Cross-crate tests against a mock gateway
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. The cart mutation contract lives here as pure functions over
//! [`types::Cart`]; persistence is layered on top by the client crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, product records, and the cart data model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
