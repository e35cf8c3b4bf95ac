//! Berkeley Mobile Transit Lambda
//!
//! Proxies the AC Transit API:
//! - GET /transit/routes - All routes
//! - GET /transit/routes/{route} - A single route
//! - GET /transit/stops?latitude=&longitude=&radius=&unit= - Stops near a point
//! - GET /transit/stops/{stop_id}/routes - Routes serving a stop

use berkeley_mobile_core::request::{authorize, route_path, StopQuery};
use berkeley_mobile_core::response::{error_response, json_response, not_found, preflight_response};
use berkeley_mobile_core::upstream::TransitClient;
use berkeley_mobile_core::{Config, Error, TokenIssuer};
use lambda_http::{run, service_fn, Body, Error as LambdaError, Request, Response};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct AppState {
    transit: TransitClient,
    issuer: TokenIssuer,
}

#[derive(Debug, PartialEq, Eq)]
enum Route<'a> {
    AllRoutes,
    RouteByName(&'a str),
    StopsNear,
    RoutesAtStop(&'a str),
}

fn resolve(path: &str) -> Option<Route<'_>> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        ["transit", "routes"] => Some(Route::AllRoutes),
        ["transit", "routes", name] if !name.is_empty() => Some(Route::RouteByName(*name)),
        ["transit", "stops"] => Some(Route::StopsNear),
        ["transit", "stops", stop_id, "routes"] if !stop_id.is_empty() => Some(Route::RoutesAtStop(*stop_id)),
        _ => None,
    }
}

async fn dispatch(state: &AppState, route: Route<'_>, event: &Request) -> Result<Value, Error> {
    match route {
        Route::AllRoutes => state.transit.all_routes().await,
        Route::RouteByName(name) => state.transit.route(name).await,
        Route::StopsNear => {
            let query = StopQuery::from_request(event)?;
            state.transit.stops_near(query.center, query.radius_feet()).await
        }
        Route::RoutesAtStop(stop_id) => state.transit.routes_at_stop(stop_id).await,
    }
}

async fn handler(state: &AppState, event: Request) -> Result<Response<Body>, LambdaError> {
    let method = event.method().as_str();
    let path = route_path(&event).to_string();

    info!(method = %method, path = %path, "Processing transit request");

    if method == "OPTIONS" {
        return preflight_response();
    }

    let Some(route) = resolve(&path).filter(|_| method == "GET") else {
        return not_found();
    };

    if let Err(e) = authorize(&event, &state.issuer) {
        return error_response(e);
    }

    match dispatch(state, route, &event).await {
        Ok(body) => json_response(200, &body),
        Err(e) => error_response(e),
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
    let state = AppState {
        transit: TransitClient::new(
            reqwest::Client::new(),
            &config.transit_api_url,
            config.transit_api_key()?,
        )?,
        issuer: config.token_issuer()?,
    };

    run(service_fn(|event| handler(&state, event))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use berkeley_mobile_core::testing::RestEvent;
    use berkeley_mobile_core::config::DEFAULT_TRANSIT_API_URL;

    fn state() -> AppState {
        AppState {
            transit: TransitClient::new(reqwest::Client::new(), DEFAULT_TRANSIT_API_URL, "test-key").unwrap(),
            issuer: TokenIssuer::new(b"secret"),
        }
    }

    fn body_json(response: &Response<Body>) -> Value {
        serde_json::from_slice(response.body().as_ref()).unwrap()
    }

    #[test]
    fn test_resolve_routes() {
        assert_eq!(resolve("/transit/routes"), Some(Route::AllRoutes));
        assert_eq!(resolve("/transit/routes/51B"), Some(Route::RouteByName("51B")));
        assert_eq!(resolve("/transit/stops/"), Some(Route::StopsNear));
        assert_eq!(
            resolve("/transit/stops/55989/routes"),
            Some(Route::RoutesAtStop("55989"))
        );
    }

    #[test]
    fn test_resolve_unknown() {
        assert_eq!(resolve("/transit"), None);
        assert_eq!(resolve("/transit/stops/55989"), None);
        assert_eq!(resolve("/transit/routes/51B/stops"), None);
        assert_eq!(resolve("/weather"), None);
    }

    #[tokio::test]
    async fn test_handler_answers_preflight() {
        let state = state();
        let response = handler(&state, RestEvent::new("OPTIONS", "/transit/routes").into_request())
            .await
            .unwrap();
        assert_eq!(response.status(), 204);
    }

    #[tokio::test]
    async fn test_handler_requires_token_behind_stage() {
        let state = state();
        let response = handler(&state, RestEvent::get("/transit/routes").into_request())
            .await
            .unwrap();
        assert_eq!(response.status(), 401);
        assert_eq!(body_json(&response)["error"], "invalid_token");
    }

    #[tokio::test]
    async fn test_handler_rejects_bad_stop_radius() {
        let state = state();
        let token = state.issuer.issue_access("u1").unwrap();
        let response = handler(
            &state,
            RestEvent::get("/transit/stops")
                .bearer(&token)
                .query("radius", "-2")
                .query("unit", "mi")
                .into_request(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"], "invalid_param");
    }

    #[tokio::test]
    async fn test_handler_unknown_route() {
        let state = state();
        let response = handler(&state, RestEvent::get("/transit/stops/55989").into_request())
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }
}
