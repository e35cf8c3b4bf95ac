//! HTTP response helpers
//!
//! Every response carries the CORS headers so the mobile web clients can call
//! the API directly.

use lambda_http::http::response::Builder;
use lambda_http::http::StatusCode;
use lambda_http::{Body, Error as LambdaError, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::Error;
use crate::geo::SUPPORTED_UNITS;
use crate::models::ErrorResponse;

const ALLOWED_METHODS: &str = "GET,PUT,POST,DELETE,PATCH,OPTIONS";
const PREFLIGHT_MAX_AGE: &str = "3600";
const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

fn builder(status: u16) -> Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
        .header("Access-Control-Allow-Headers", "*")
}

/// Serialize `body` as a JSON response
pub fn json_response<T: Serialize>(status: u16, body: &T) -> Result<Response<Body>, LambdaError> {
    Ok(builder(status)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body)?))?)
}

/// Render an error as an `ErrorResponse`.
///
/// Server-side failures are logged in full and answered with a generic message.
pub fn error_response(e: Error) -> Result<Response<Body>, LambdaError> {
    let body = if e.is_client_error() {
        warn!(error = %e, code = e.code(), "Request rejected");
        let body = ErrorResponse::new(e.code(), e.to_string());
        match &e {
            Error::UnsupportedUnit(_) => body.with_details(serde_json::json!({ "supported_units": SUPPORTED_UNITS })),
            _ => body,
        }
    } else {
        error!(error = %e, code = e.code(), "Request failed");
        ErrorResponse::new(e.code(), GENERIC_FAILURE)
    };
    json_response(e.status_code(), &body)
}

/// Answer a CORS preflight
pub fn preflight_response() -> Result<Response<Body>, LambdaError> {
    Ok(builder(StatusCode::NO_CONTENT.as_u16())
        .header("Access-Control-Max-Age", PREFLIGHT_MAX_AGE)
        .body(Body::Empty)?)
}

pub fn not_found() -> Result<Response<Body>, LambdaError> {
    json_response(404, &ErrorResponse::new("not_found", "Endpoint not found"))
}
