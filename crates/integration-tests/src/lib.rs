//! Integration tests for the Cardfolio catalog service.
//!
//! # Running Tests
//!
//! ```bash
//! # Start MongoDB
//! docker run -d -p 27017:27017 mongo:7
//!
//! # Start the server
//! CARDFOLIO_MONGODB_URL=mongodb://localhost:27017 cargo run -p cardfolio-server
//!
//! # Run integration tests against it
//! CARDFOLIO_BASE_URL=http://localhost:8080 cargo test -p cardfolio-integration-tests
//! ```
//!
//! Tests skip themselves when `CARDFOLIO_BASE_URL` is not set, so a plain
//! `cargo test` of the workspace does not require a running stack.

/// Base URL of the server under test, if configured.
#[must_use]
pub fn base_url() -> Option<String> {
    std::env::var("CARDFOLIO_BASE_URL").ok()
}
