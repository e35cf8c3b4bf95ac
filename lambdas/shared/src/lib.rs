//! Berkeley Mobile Core Library
//!
//! Shared functionality for the Berkeley Mobile Lambda functions including:
//! - Domain models and error types
//! - DynamoDB operations
//! - Distance, opening-hours and name filters
//! - Token issuance and validation
//! - Request parsing and response helpers
//! - Upstream transit and weather clients

pub mod auth;
pub mod config;
pub mod dynamo;
pub mod errors;
pub mod geo;
pub mod hours;
pub mod models;
pub mod request;
pub mod response;
pub mod search;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod tokens;
pub mod upstream;

pub use config::Config;
pub use dynamo::DynamoClient;
pub use errors::{Error, Result};
pub use models::*;
pub use tokens::{Claims, TokenIssuer, TokenType};
