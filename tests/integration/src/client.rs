//! Berkeley Mobile API Client for testing

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::fixtures::API_URL_ENV;

/// API client for Berkeley Mobile
pub struct BerkeleyMobileClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

// Request/Response types

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    #[serde(rename = "refresh-token")]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "refresh-token")]
    pub refresh_token: String,
    #[serde(rename = "access-token")]
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    #[serde(rename = "access-token")]
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Result type for API responses
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// HTTP error with status code and body
    Http { status: StatusCode, body: String },
    /// Network or serialization error
    Request(String),
}

impl ApiError {
    /// Status of an HTTP error, if the request got that far
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Request(_) => None,
        }
    }

    /// Parsed error body of an HTTP error
    pub fn error_response(&self) -> Option<ErrorResponse> {
        match self {
            ApiError::Http { body, .. } => serde_json::from_str(body).ok(),
            ApiError::Request(_) => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ApiError::Request(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl BerkeleyMobileClient {
    /// Create a new client with the given base URL
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Create a client from environment variable
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(API_URL_ENV).expect("BERKELEY_MOBILE_API_URL environment variable not set");
        Self::new(&base_url)
    }

    /// Send subsequent requests with this access token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    // =========================================================================
    // Auth Operations
    // =========================================================================

    pub async fn login(&self, uid: &str, email: &str) -> ApiResult<TokenPair> {
        let req = LoginRequest {
            uid: uid.to_string(),
            email: email.to_string(),
        };
        self.post("/auth/login", &req).await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> ApiResult<AccessTokenResponse> {
        let req = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post("/auth/refresh-token", &req).await
    }

    // =========================================================================
    // Place Operations
    // =========================================================================

    pub async fn list_places(&self, category: &str) -> ApiResult<Vec<Value>> {
        self.get(&format!("/{}", category), &[]).await
    }

    pub async fn search_places(&self, category: &str, name: &str) -> ApiResult<Vec<Value>> {
        self.get(&format!("/{}/search", category), &[("name", name.to_string())])
            .await
    }

    pub async fn place_by_name(&self, category: &str, name: &str) -> ApiResult<Value> {
        self.get(&format!("/{}/by-name", category), &[("name", name.to_string())])
            .await
    }

    pub async fn places_near(
        &self,
        category: &str,
        latitude: f64,
        longitude: f64,
        radius: f64,
        unit: &str,
    ) -> ApiResult<Vec<Value>> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("radius", radius.to_string()),
            ("unit", unit.to_string()),
        ];
        self.get(&format!("/{}/location", category), &query).await
    }

    pub async fn open_places(&self, category: &str, time: Option<i64>) -> ApiResult<Vec<Value>> {
        let query: Vec<(&str, String)> = time.map(|t| ("time", t.to_string())).into_iter().collect();
        self.get(&format!("/{}/open", category), &query).await
    }

    // =========================================================================
    // Transit and Weather Operations
    // =========================================================================

    pub async fn transit_routes(&self) -> ApiResult<Value> {
        self.get("/transit/routes", &[]).await
    }

    pub async fn transit_stops(&self) -> ApiResult<Value> {
        self.get("/transit/stops", &[]).await
    }

    pub async fn weather(&self) -> ApiResult<Value> {
        self.get("/weather", &[]).await
    }

    // =========================================================================
    // HTTP Helpers
    // =========================================================================

    /// Send an OPTIONS request and return the raw response
    pub async fn preflight(&self, path: &str) -> ApiResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(reqwest::Method::OPTIONS, &url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorized(self.client.get(&url).query(query))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        self.handle_response(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| ApiError::Request(e.to_string()))
        } else {
            Err(ApiError::Http { status, body })
        }
    }
}
