//! Berkeley Mobile Integration Tests
//!
//! These tests run against a deployed API. Set BERKELEY_MOBILE_API_URL
//! (directly or in a `.env` file) to enable them; without it every test is
//! skipped.
//!
//! Run with: cargo test --package berkeley-mobile-integration-tests

pub mod client;
pub mod fixtures;

pub use client::BerkeleyMobileClient;
pub use fixtures::*;
