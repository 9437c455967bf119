//! Starfruit Client - SDK for the Starfruit shop gateway.
//!
//! This crate packages the client-side pieces of the shop as a library:
//!
//! - [`storage`] - Key-value storage backends (in-memory and JSON file), the
//!   `localStorage` analog the other components persist into
//! - [`cart`] - The client-local cart store with read-modify-write semantics
//! - [`auth`] - Bearer credential persistence and startup session verification
//! - [`gateway`] - Typed JSON HTTP client for the backend gateway
//! - [`config`] - Environment-based configuration
//!
//! # Architecture
//!
//! Nothing in this crate is a process-wide singleton: storage handles, the
//! cart store, the token store, and the gateway client are all constructed
//! explicitly and injected where needed, so their lifetimes are owned by the
//! application shell. The SDK also performs no navigation; authentication
//! failures come back as typed variants ([`gateway::ApiError::Unauthorized`],
//! [`auth::SessionVerdict::RequiresLogin`]) for the shell to interpret.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod config;
pub mod gateway;
pub mod storage;

pub use auth::{SessionVerdict, TokenStore, verify_session};
pub use cart::{CartStore, CartStoreError};
pub use config::{ClientConfig, ConfigError};
pub use gateway::{ApiError, GatewayClient};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
