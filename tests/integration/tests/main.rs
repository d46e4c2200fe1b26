//! End-to-End Integration Tests
//!
//! These tests drive the session layer through the `axum::http` adapters
//! against both store backends. Redis tests start an ephemeral container
//! with testcontainers and are ignored unless a Docker daemon is available:
//!
//! ```text
//! cargo test -p lidp-integration-tests -- --include-ignored
//! ```

mod pool_limits;
mod request_state_flows;
