//! Berkeley Mobile Auth Lambda
//!
//! Handles token issuance:
//! - POST /auth/login - Register or log in, returns refresh and access tokens
//! - POST /auth/refresh-token - Exchange a refresh token for an access token

use aws_config::BehaviorVersion;
use berkeley_mobile_core::auth::{login, refresh};
use berkeley_mobile_core::request::{json_body, route_path};
use berkeley_mobile_core::response::{error_response, json_response, not_found, preflight_response};
use berkeley_mobile_core::{Config, DynamoClient, LoginRequest, RefreshRequest, TokenIssuer};
use lambda_http::{run, service_fn, Body, Error as LambdaError, Request, Response};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct AppState {
    db: DynamoClient,
    issuer: TokenIssuer,
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Preflight,
    Login,
    Refresh,
}

fn resolve(method: &str, path: &str) -> Option<Route> {
    match (method, path.trim_end_matches('/')) {
        ("OPTIONS", _) => Some(Route::Preflight),
        ("POST", "/auth/login") => Some(Route::Login),
        ("POST", "/auth/refresh-token") => Some(Route::Refresh),
        _ => None,
    }
}

async fn handler(state: &AppState, event: Request) -> Result<Response<Body>, LambdaError> {
    let method = event.method().as_str();
    let path = route_path(&event).to_string();

    info!(method = %method, path = %path, "Processing auth request");

    match resolve(method, &path) {
        Some(Route::Preflight) => preflight_response(),

        Some(Route::Login) => {
            let result = match json_body::<LoginRequest>(&event) {
                Ok(req) => login(&state.db, &state.issuer, &req).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(tokens) => json_response(200, &tokens),
                Err(e) => error_response(e),
            }
        }

        Some(Route::Refresh) => {
            let result = match json_body::<RefreshRequest>(&event) {
                Ok(req) => refresh(&state.db, &state.issuer, &req).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(token) => json_response(200, &token),
                Err(e) => error_response(e),
            }
        }

        None => not_found(),
    }
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env();
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let state = AppState {
        db: DynamoClient::new(aws_sdk_dynamodb::Client::new(&aws), config.table_name.clone()),
        issuer: config.token_issuer()?,
    };

    run(service_fn(|event| handler(&state, event))).await
}
