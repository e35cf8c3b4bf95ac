//! Request parsing helpers shared by the HTTP lambdas

use chrono::Utc;
use lambda_http::http::header::AUTHORIZATION;
use lambda_http::{Request, RequestExt};
use serde::de::DeserializeOwned;
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::geo::{Coordinate, LengthUnit};
use crate::tokens::{bearer_token, Claims, TokenIssuer};
use crate::upstream::{BERKELEY_CENTER, DEFAULT_STOP_RADIUS, DEFAULT_STOP_UNIT};

/// Path the API was called with, without any API Gateway stage prefix.
///
/// REST API events are rewritten to `/{stage}{path}` by `lambda_http`; routing
/// has to match on the path as the client sent it.
pub fn route_path(req: &Request) -> &str {
    match req.raw_http_path() {
        "" => req.uri().path(),
        raw => raw,
    }
}

/// First value of a query string parameter
pub fn query_param<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.query_string_parameters_ref()
        .and_then(|params| params.first(name))
}

/// Parse a required numeric parameter.
///
/// Absent is `MissingParam`; present but empty or unparsable is `InvalidParam`.
pub fn parse_required<T: FromStr>(name: &str, value: Option<&str>) -> Result<T> {
    let value = value.ok_or_else(|| Error::MissingParam(name.to_string()))?;
    parse_present(name, value)
}

/// Parse an optional numeric parameter; absent or empty is `None`
pub fn parse_optional<T: FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_present(name, v).map(Some),
    }
}

fn parse_present<T: FromStr>(name: &str, value: &str) -> Result<T> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidParam(name.to_string()));
    }
    value
        .parse()
        .map_err(|_| Error::InvalidParam(name.to_string()))
}

/// A required, non-blank string parameter
pub fn required_str<'a>(req: &'a Request, name: &str) -> Result<&'a str> {
    query_param(req, name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::MissingParam(name.to_string()))
}

/// The `time` parameter in unix seconds. Absent, empty or `0` means now.
pub fn timestamp_param(req: &Request) -> Result<i64> {
    match parse_optional("time", query_param(req, "time"))? {
        Some(time) if time != 0 => Ok(time),
        _ => Ok(Utc::now().timestamp()),
    }
}

/// Deserialize a JSON request body
pub fn json_body<T: DeserializeOwned>(req: &Request) -> Result<T> {
    let body = req.body().as_ref();
    if body.is_empty() {
        return Err(Error::Validation("request body is required".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| Error::Validation(format!("invalid request body: {}", e)))
}

/// Validate the bearer access token on a request
pub fn authorize(req: &Request, issuer: &TokenIssuer) -> Result<Claims> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::InvalidToken("missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| Error::InvalidToken("invalid Authorization header encoding".to_string()))?;

    issuer.validate_access(bearer_token(header)?)
}

/// Parameters of a radius search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationQuery {
    pub center: Coordinate,
    pub radius: f64,
    pub unit: LengthUnit,
}

impl LocationQuery {
    /// Parse `radius`, `longitude`, `latitude` and `unit`, checked in that order
    pub fn from_request(req: &Request) -> Result<Self> {
        let radius: f64 = parse_required("radius", query_param(req, "radius"))?;
        let longitude: f64 = parse_required("longitude", query_param(req, "longitude"))?;
        let latitude: f64 = parse_required("latitude", query_param(req, "latitude"))?;
        let unit: LengthUnit = query_param(req, "unit")
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::MissingParam("unit".to_string()))?
            .parse()?;

        Ok(Self {
            center: Coordinate::new(latitude, longitude),
            radius,
            unit,
        })
    }

    pub fn radius_km(&self) -> f64 {
        self.unit.to_kilometers(self.radius)
    }
}

/// Parameters of a transit stop search; every field is optional
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopQuery {
    pub center: Coordinate,
    pub radius: f64,
    pub unit: LengthUnit,
}

impl StopQuery {
    /// Falls back to central Berkeley unless both coordinates are given, and to
    /// three miles unless both a non-zero radius and a unit are given
    pub fn from_request(req: &Request) -> Result<Self> {
        let latitude: Option<f64> = parse_optional("latitude", query_param(req, "latitude"))?;
        let longitude: Option<f64> = parse_optional("longitude", query_param(req, "longitude"))?;
        let radius: Option<f64> = parse_optional("radius", query_param(req, "radius"))?;
        let unit: Option<LengthUnit> = query_param(req, "unit")
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::parse::<LengthUnit>)
            .transpose()?;

        let center = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Coordinate::new(latitude, longitude),
            _ => BERKELEY_CENTER,
        };
        let (radius, unit) = match (radius, unit) {
            (Some(radius), Some(unit)) if radius != 0.0 => (radius, unit),
            _ => (DEFAULT_STOP_RADIUS, DEFAULT_STOP_UNIT),
        };
        // forwarded upstream as a whole number of feet
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidParam("radius".to_string()));
        }
        if !center.latitude.is_finite() {
            return Err(Error::InvalidParam("latitude".to_string()));
        }
        if !center.longitude.is_finite() {
            return Err(Error::InvalidParam("longitude".to_string()));
        }

        Ok(Self { center, radius, unit })
    }

    pub fn radius_feet(&self) -> f64 {
        self.unit.to_feet(self.radius)
    }
}
