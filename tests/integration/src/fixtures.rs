//! Test fixtures and utilities

use uuid::Uuid;

pub const API_URL_ENV: &str = "BERKELEY_MOBILE_API_URL";

/// Place categories served by the API
pub const CATEGORIES: [&str; 4] = ["dining", "gyms", "libraries", "resources"];

/// Sather Gate, roughly the middle of campus
pub const CAMPUS_LATITUDE: f64 = 37.8703;
pub const CAMPUS_LONGITUDE: f64 = -122.2595;

/// Generate a unique user ID for testing
pub fn unique_uid() -> String {
    format!("test-user-{}", &Uuid::new_v4().to_string()[..8])
}

/// A campus e-mail address for a test user
pub fn campus_email(uid: &str) -> String {
    format!("{}@berkeley.edu", uid)
}

/// Check if API URL is configured
pub fn api_url_configured() -> bool {
    dotenvy::dotenv().ok();
    std::env::var(API_URL_ENV).is_ok()
}

/// Skip test if API URL is not configured
#[macro_export]
macro_rules! skip_if_no_api {
    () => {
        if !$crate::fixtures::api_url_configured() {
            eprintln!("Skipping test: BERKELEY_MOBILE_API_URL not set");
            return;
        }
    };
}
