//! Error types for Berkeley Mobile

use thiserror::Error;

/// Result type alias using the Berkeley Mobile Error
pub type Result<T> = std::result::Result<T, Error>;

/// Berkeley Mobile error types
#[derive(Error, Debug)]
pub enum Error {
    /// No place with the given name in the category
    #[error("Place not found: {0}")]
    PlaceNotFound(String),

    /// User record already exists
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    /// User is blocked from obtaining tokens
    #[error("Your account has been blocked: {0}")]
    UserBlocked(String),

    /// Missing, malformed, expired or wrongly typed token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Required query parameter absent
    #[error("Url Param '{0}' is missing")]
    MissingParam(String),

    /// Query parameter present but unparsable
    #[error("Url Param '{0}' is of incorrect type")]
    InvalidParam(String),

    /// Length unit outside ft/yd/mi/m/km
    #[error("Url Param 'unit' is incorrect: {0}")]
    UnsupportedUnit(String),

    /// Path names a category that doesn't exist
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// DynamoDB error
    #[error("Database error: {0}")]
    Database(String),

    /// Transit or weather API failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// JSON Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// DynamoDB serialization error
    #[error("DynamoDB serialization error: {0}")]
    DynamoSerialization(String),

    /// Token signing failure
    #[error("Token error: {0}")]
    Token(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Error::PlaceNotFound(_) => "place_not_found",
            Error::UserAlreadyExists(_) => "user_already_exists",
            Error::UserBlocked(_) => "user_blocked",
            Error::InvalidToken(_) => "invalid_token",
            Error::MissingParam(_) => "missing_param",
            Error::InvalidParam(_) => "invalid_param",
            Error::UnsupportedUnit(_) => "unsupported_unit",
            Error::UnknownCategory(_) => "unknown_category",
            Error::Validation(_) => "validation_error",
            Error::Config(_) => "config_error",
            Error::Database(_) => "database_error",
            Error::Upstream(_) => "upstream_error",
            Error::Serialization(_) => "serialization_error",
            Error::DynamoSerialization(_) => "serialization_error",
            Error::Token(_) => "token_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::PlaceNotFound(_) => 404,
            Error::UserAlreadyExists(_) => 409,
            Error::UserBlocked(_) => 403,
            Error::InvalidToken(_) => 401,
            Error::MissingParam(_) => 400,
            Error::InvalidParam(_) => 400,
            Error::UnsupportedUnit(_) => 400,
            Error::UnknownCategory(_) => 404,
            Error::Validation(_) => 400,
            Error::Config(_) => 500,
            Error::Database(_) => 500,
            Error::Upstream(_) => 502,
            Error::Serialization(_) => 400,
            Error::DynamoSerialization(_) => 500,
            Error::Token(_) => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Whether the message is safe to show to API callers.
    ///
    /// Server-side failures are logged in full but answered with a generic message.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
