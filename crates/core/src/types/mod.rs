//! Core types for the Starfruit client SDK.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::{Cart, LineItem};
pub use id::*;
pub use product::Product;
