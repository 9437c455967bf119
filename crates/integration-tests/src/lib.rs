//! Integration tests for the Starfruit client SDK.
//!
//! The tests under `tests/` exercise the gateway client against a `wiremock`
//! mock gateway and the cart store against real file-backed storage; nothing
//! here needs a running backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p starfruit-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `gateway` - Gateway HTTP client behavior (auth, catalog, orders)
//! - `session` - Startup session verification outcomes
//! - `cart_persistence` - Cart round-trips through JSON file storage

/// Initialize test logging once per process.
///
/// Honors `RUST_LOG`; repeated calls are no-ops.
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
