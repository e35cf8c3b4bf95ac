//! Domain models for Berkeley Mobile
//!
//! These types represent the core entities in the system:
//! - Categories: The kinds of campus places the API serves
//! - Places: Dining halls, gyms, libraries and campus resources
//! - Users: Token holders, with their refresh token and blocked flag
//! - Token payloads and API error bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

const DINING_FIELDS: &[&str] = &["name", "description", "latitude", "longitude", "address", "phone"];

const GYM_FIELDS: &[&str] = &[
    "name",
    "description",
    "latitude",
    "longitude",
    "address",
    "phone",
    "open_close_array",
    "track_hours",
    "pool_hours",
];

const LIBRARY_FIELDS: &[&str] = &["name", "description", "latitude", "longitude", "address", "open_close_array"];

/// Kind of campus place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    DiningHall,
    Gym,
    Library,
    CampusResource,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::DiningHall,
        Category::Gym,
        Category::Library,
        Category::CampusResource,
    ];

    /// URL path segment
    pub fn slug(&self) -> &'static str {
        match self {
            Category::DiningHall => "dining",
            Category::Gym => "gyms",
            Category::Library => "libraries",
            Category::CampusResource => "resources",
        }
    }

    /// Collection name the documents are stored under
    pub fn collection(&self) -> &'static str {
        match self {
            Category::DiningHall => "Dining Halls",
            Category::Gym => "Gyms",
            Category::Library => "Libraries",
            Category::CampusResource => "Campus Resource",
        }
    }

    /// Fields returned to clients, or `None` for the whole document
    pub fn fields(&self) -> Option<&'static [&'static str]> {
        match self {
            Category::DiningHall => Some(DINING_FIELDS),
            Category::Gym => Some(GYM_FIELDS),
            Category::Library => Some(LIBRARY_FIELDS),
            Category::CampusResource => None,
        }
    }

    /// Render a place as the JSON object this category exposes.
    ///
    /// Projected fields the place doesn't have come out as `null`.
    pub fn project(&self, place: &Place) -> Result<Value, Error> {
        let full = match serde_json::to_value(place)? {
            Value::Object(map) => map,
            other => return Ok(other),
        };

        let Some(fields) = self.fields() else {
            return Ok(Value::Object(full));
        };

        let mut projected = Map::with_capacity(fields.len());
        for field in fields {
            let value = full.get(*field).cloned().unwrap_or(Value::Null);
            projected.insert((*field).to_string(), value);
        }
        Ok(Value::Object(projected))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// An opening interval in unix seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenClose {
    pub open_time: i64,
    pub close_time: i64,
    /// Free-form note; "Closed" marks the interval as closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OpenClose {
    pub fn new(open_time: i64, close_time: i64) -> Self {
        Self {
            open_time,
            close_time,
            notes: None,
        }
    }
}

/// A campus place document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// General opening hours
    #[serde(default, alias = "open_close_hours", skip_serializing_if = "Vec::is_empty")]
    pub open_close_array: Vec<OpenClose>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub track_hours: Vec<OpenClose>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pool_hours: Vec<OpenClose>,
    /// Any other stored attributes, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Place {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_hours(mut self, hours: Vec<OpenClose>) -> Self {
        self.open_close_array = hours;
        self
    }
}

/// A registered API user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    /// Long-lived refresh token issued at first login
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(uid: String, email: String, refresh_token: String) -> Self {
        Self {
            uid,
            email,
            refresh_token,
            created_at: Utc::now(),
            blocked: false,
            blocked_at: None,
        }
    }
}

/// Request to log in and obtain tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub uid: String,
    pub email: String,
}

/// Request to exchange a refresh token for an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refresh-token")]
    pub refresh_token: String,
}

/// Response after logging in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "refresh-token")]
    pub refresh_token: String,
    #[serde(rename = "access-token")]
    pub access_token: String,
}

/// Response after refreshing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    #[serde(rename = "access-token")]
    pub access_token: String,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_slugs_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.slug().parse::<Category>().unwrap(), category);
        }
        assert!(matches!(
            "pools".parse::<Category>(),
            Err(Error::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_dining_projection_fills_nulls() {
        let place = Place {
            phone: Some("510-642-0000".into()),
            ..Place::new("Crossroads").with_location(37.8665, -122.2566)
        };
        let value = Category::DiningHall.project(&place).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 6);
        assert_eq!(obj["name"], "Crossroads");
        assert_eq!(obj["phone"], "510-642-0000");
        assert_eq!(obj["description"], Value::Null);
        assert!(!obj.contains_key("open_close_array"));
    }

    #[test]
    fn test_resource_projection_keeps_extra_fields() {
        let mut place = Place::new("Tang Center");
        place.extra.insert("category".into(), json!("Health"));
        let value = Category::CampusResource.project(&place).unwrap();
        assert_eq!(value["category"], "Health");
        assert_eq!(value["name"], "Tang Center");
    }

    #[test]
    fn test_place_accepts_legacy_hours_field() {
        let json = r#"{"name": "RSF", "open_close_hours": [{"open_time": 10, "close_time": 20}]}"#;
        let place: Place = serde_json::from_str(json).unwrap();
        assert_eq!(place.open_close_array, vec![OpenClose::new(10, 20)]);
        assert!(place.extra.is_empty());
    }

    #[test]
    fn test_token_payload_renames() {
        let pair = TokenPair {
            refresh_token: "r".into(),
            access_token: "a".into(),
        };
        let json = serde_json::to_string(&pair).unwrap();
        assert!(json.contains(r#""refresh-token":"r""#));
        assert!(json.contains(r#""access-token":"a""#));

        let req: RefreshRequest = serde_json::from_str(r#"{"refresh-token": "abc"}"#).unwrap();
        assert_eq!(req.refresh_token, "abc");
    }

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("place_not_found", "Place not found: RSF");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("place_not_found"));
        assert!(!json.contains("details"));
    }
}
