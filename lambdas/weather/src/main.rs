//! Berkeley Mobile Weather Lambda
//!
//! - GET /weather - Current conditions and forecast for campus (OpenWeatherMap)

use berkeley_mobile_core::request::{authorize, route_path};
use berkeley_mobile_core::response::{error_response, json_response, not_found, preflight_response};
use berkeley_mobile_core::upstream::WeatherClient;
use berkeley_mobile_core::{Config, TokenIssuer};
use lambda_http::{run, service_fn, Body, Error as LambdaError, Request, Response};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct AppState {
    weather: WeatherClient,
    issuer: TokenIssuer,
}

fn is_weather_path(path: &str) -> bool {
    path.trim_end_matches('/') == "/weather"
}

async fn handler(state: &AppState, event: Request) -> Result<Response<Body>, LambdaError> {
    let method = event.method().as_str();
    let path = route_path(&event).to_string();

    info!(method = %method, path = %path, "Processing weather request");

    match method {
        "OPTIONS" => preflight_response(),
        "GET" if is_weather_path(&path) => {
            if let Err(e) = authorize(&event, &state.issuer) {
                return error_response(e);
            }
            match state.weather.current().await {
                Ok(forecast) => json_response(200, &forecast),
                Err(e) => error_response(e),
            }
        }
        _ => not_found(),
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
        weather: WeatherClient::new(
            reqwest::Client::new(),
            &config.weather_api_url,
            config.weather_api_key()?,
        )?,
        issuer: config.token_issuer()?,
    };

    run(service_fn(|event| handler(&state, event))).await
}
