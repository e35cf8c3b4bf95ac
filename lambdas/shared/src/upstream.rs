//! Clients for the third-party transit and weather APIs
//!
//! Both APIs take their key as a query parameter, so upstream error messages
//! are stripped of the request URL before they are logged.

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Error, Result};
use crate::geo::{Coordinate, LengthUnit};

/// Centre of the default stop search
pub const BERKELEY_CENTER: Coordinate = Coordinate {
    latitude: 37.871853,
    longitude: -122.258423,
};
pub const DEFAULT_STOP_RADIUS: f64 = 3.0;
pub const DEFAULT_STOP_UNIT: LengthUnit = LengthUnit::Miles;

/// Point the weather forecast is requested for
pub const WEATHER_POINT: Coordinate = Coordinate {
    latitude: 37.8712,
    longitude: -122.2601,
};

fn parse_base(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).map_err(|e| Error::Config(format!("invalid API url {}: {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("invalid API url {}", base_url)));
    }
    Ok(url)
}

async fn fetch_json(http: &Client, url: Url, service: &str) -> Result<Value> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Upstream(format!("{} request failed: {}", service, e.without_url())))?;

    let status = response.status();
    if !status.is_success() {
        warn!(service, status = status.as_u16(), "Upstream returned an error status");
        return Err(Error::Upstream(format!("{} API returned {}", service, status)));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Upstream(format!("{} returned invalid JSON: {}", service, e.without_url())))
}

/// AC Transit REST client
#[derive(Clone)]
pub struct TransitClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl TransitClient {
    pub fn new(http: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http,
            base_url: parse_base(base_url)?,
            api_key: api_key.into(),
        })
    }

    fn endpoint<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        // parse_base rejects cannot-be-a-base urls
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().append_pair("token", &self.api_key);
        url
    }

    fn routes_url(&self) -> Url {
        self.endpoint(["routes"])
    }

    fn route_url(&self, name: &str) -> Url {
        self.endpoint(["route", name])
    }

    fn stop_destinations_url(&self, stop_id: &str) -> Url {
        self.endpoint(["stop", stop_id, "destinations"])
    }

    fn stops_url(&self, center: Coordinate, distance_ft: f64) -> Url {
        let latitude = center.latitude.to_string();
        let longitude = center.longitude.to_string();
        let distance = (distance_ft as i64).to_string();
        self.endpoint(["stops", latitude.as_str(), longitude.as_str(), distance.as_str()])
    }

    /// Every route the agency runs
    pub async fn all_routes(&self) -> Result<Value> {
        debug!("Fetching all transit routes");
        fetch_json(&self.http, self.routes_url(), "transit").await
    }

    /// A single route by name (e.g. "51B")
    pub async fn route(&self, name: &str) -> Result<Value> {
        debug!(route = %name, "Fetching transit route");
        fetch_json(&self.http, self.route_url(name), "transit").await
    }

    /// Routes and directions serving a stop
    pub async fn routes_at_stop(&self, stop_id: &str) -> Result<Value> {
        debug!(stop_id = %stop_id, "Fetching routes at stop");
        fetch_json(&self.http, self.stop_destinations_url(stop_id), "transit").await
    }

    /// Stops within `distance_ft` feet of `center`
    pub async fn stops_near(&self, center: Coordinate, distance_ft: f64) -> Result<Value> {
        debug!(
            latitude = center.latitude,
            longitude = center.longitude,
            distance_ft,
            "Fetching nearby stops"
        );
        fetch_json(&self.http, self.stops_url(center, distance_ft), "transit").await
    }
}

/// OpenWeatherMap one-call client
#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    url: Url,
}

impl WeatherClient {
    pub fn new(http: Client, base_url: &str, api_key: &str) -> Result<Self> {
        let mut url = parse_base(base_url)?;
        url.query_pairs_mut()
            .append_pair("lat", &WEATHER_POINT.latitude.to_string())
            .append_pair("lon", &WEATHER_POINT.longitude.to_string())
            .append_pair("appid", api_key);
        Ok(Self { http, url })
    }

    /// Current conditions and forecast for campus, passed through unchanged
    pub async fn current(&self) -> Result<Value> {
        fetch_json(&self.http, self.url.clone(), "weather").await
    }
}
