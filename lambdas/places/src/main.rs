//! Berkeley Mobile Places Lambda
//!
//! Serves every place category (`dining`, `gyms`, `libraries`, `resources`):
//! - GET /{category} - List places
//! - GET /{category}/search?name= - Case-insensitive name search
//! - GET /{category}/by-name?name= - Exact name lookup
//! - GET /{category}/location?radius=&latitude=&longitude=&unit= - Radius filter
//! - GET /{category}/open?time= - Places open at a unix timestamp (default now)

use aws_config::BehaviorVersion;
use berkeley_mobile_core::geo::within_radius;
use berkeley_mobile_core::hours::open_at;
use berkeley_mobile_core::request::{authorize, required_str, route_path, timestamp_param, LocationQuery};
use berkeley_mobile_core::response::{error_response, json_response, not_found, preflight_response};
use berkeley_mobile_core::search::search_by_name;
use berkeley_mobile_core::{Category, Config, DynamoClient, Error, Place, TokenIssuer};
use lambda_http::{run, service_fn, Body, Error as LambdaError, Request, Response};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct AppState {
    db: DynamoClient,
    issuer: TokenIssuer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    List,
    Search,
    ByName,
    Location,
    Open,
}

/// Split a request path into its category segment and action
fn resolve(path: &str) -> Option<(&str, Action)> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let action = match segments.as_slice() {
        [""] => return None,
        [_] => Action::List,
        [_, "search"] => Action::Search,
        [_, "by-name"] => Action::ByName,
        [_, "location"] => Action::Location,
        [_, "open"] => Action::Open,
        _ => return None,
    };
    Some((segments[0], action))
}

fn project_all(category: Category, places: &[Place]) -> Result<Value, Error> {
    places
        .iter()
        .map(|place| category.project(place))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

async fn dispatch(state: &AppState, category: Category, action: Action, event: &Request) -> Result<Value, Error> {
    match action {
        Action::List => {
            let places = state.db.list_places(category).await?;
            project_all(category, &places)
        }
        Action::Search => {
            let name = required_str(event, "name")?;
            let places = search_by_name(name, state.db.list_places(category).await?)?;
            project_all(category, &places)
        }
        Action::ByName => {
            let name = required_str(event, "name")?;
            let place = state.db.get_place(category, name).await?;
            category.project(&place)
        }
        Action::Location => {
            let query = LocationQuery::from_request(event)?;
            let places = state.db.list_places(category).await?;
            let nearby = within_radius(query.center, query.radius_km(), places);
            info!(
                category = %category,
                radius = query.radius,
                unit = %query.unit,
                matches = nearby.len(),
                "Radius search"
            );
            project_all(category, &nearby)
        }
        Action::Open => {
            let timestamp = timestamp_param(event)?;
            let places = open_at(timestamp, state.db.list_places(category).await?);
            project_all(category, &places)
        }
    }
}

async fn handler(state: &AppState, event: Request) -> Result<Response<Body>, LambdaError> {
    let method = event.method().as_str();
    let path = route_path(&event).to_string();

    info!(method = %method, path = %path, "Processing places request");

    if method == "OPTIONS" {
        return preflight_response();
    }

    let Some((slug, action)) = resolve(&path).filter(|_| method == "GET") else {
        return not_found();
    };

    if let Err(e) = authorize(&event, &state.issuer) {
        return error_response(e);
    }

    let category: Category = match slug.parse() {
        Ok(category) => category,
        Err(e) => return error_response(e),
    };

    match dispatch(state, category, action, &event).await {
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
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let state = AppState {
        db: DynamoClient::new(aws_sdk_dynamodb::Client::new(&aws), config.table_name.clone()),
        issuer: config.token_issuer()?,
    };

    run(service_fn(|event| handler(&state, event))).await
}
