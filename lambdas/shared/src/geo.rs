//! Great-circle distance and radius filtering
//!
//! Distances use the haversine formula on a spherical Earth with mean radius
//! 6371 km. Radii arrive in one of five length units and are normalised to
//! kilometres (or feet, for the transit stop search) before comparison.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::errors::Error;
use crate::models::Place;

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const METERS_PER_FOOT: f64 = 0.3048;
const METERS_PER_YARD: f64 = 0.9144;
const METERS_PER_MILE: f64 = 1609.344;

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Location of a place, if it has both coordinates
    pub fn of(place: &Place) -> Option<Self> {
        Some(Self::new(place.latitude?, place.longitude?))
    }
}

/// Spellings accepted by `LengthUnit::from_str`
pub const SUPPORTED_UNITS: [&str; 5] = ["ft", "yd", "mi", "m", "km"];

/// Length units accepted in `unit` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Feet,
    Yards,
    Miles,
    Meters,
    Kilometers,
}

impl LengthUnit {
    fn meters_per_unit(&self) -> f64 {
        match self {
            LengthUnit::Feet => METERS_PER_FOOT,
            LengthUnit::Yards => METERS_PER_YARD,
            LengthUnit::Miles => METERS_PER_MILE,
            LengthUnit::Meters => 1.0,
            LengthUnit::Kilometers => 1000.0,
        }
    }

    pub fn to_kilometers(&self, value: f64) -> f64 {
        value * self.meters_per_unit() / 1000.0
    }

    pub fn to_feet(&self, value: f64) -> f64 {
        value * self.meters_per_unit() / METERS_PER_FOOT
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ft" => Ok(LengthUnit::Feet),
            "yd" => Ok(LengthUnit::Yards),
            "mi" => Ok(LengthUnit::Miles),
            "m" => Ok(LengthUnit::Meters),
            "km" => Ok(LengthUnit::Kilometers),
            other => Err(Error::UnsupportedUnit(other.to_string())),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LengthUnit::Feet => "ft",
            LengthUnit::Yards => "yd",
            LengthUnit::Miles => "mi",
            LengthUnit::Meters => "m",
            LengthUnit::Kilometers => "km",
        };
        f.write_str(s)
    }
}

/// Great-circle distance between two coordinates in kilometres
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Keep the places no further than `radius_km` from `center`.
///
/// Places without a latitude or longitude are skipped.
pub fn within_radius(center: Coordinate, radius_km: f64, places: Vec<Place>) -> Vec<Place> {
    places
        .into_iter()
        .filter(|place| match Coordinate::of(place) {
            Some(location) => haversine_km(center, location) <= radius_km,
            None => {
                warn!(name = %place.name, "Place has no location data, skipping");
                false
            }
        })
        .collect()
}
