//! Access and refresh token issuance
//!
//! Both token kinds are HS256 JWTs signed with the same secret and carry the
//! user's `uid` plus a `type` claim. Access tokens expire after 72 hours;
//! refresh tokens never expire and are instead revoked by blocking the user.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Lifetime of an access token
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 72;

const BEARER_PREFIX: &str = "bearer ";

/// Which kind of token a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims shared by both token kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub uid: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Expiry in unix seconds; absent on refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Signs and verifies tokens with a shared HMAC secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a 72-hour access token
    pub fn issue_access(&self, uid: &str) -> Result<String> {
        self.issue_access_at(uid, Utc::now())
    }

    fn issue_access_at(&self, uid: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            uid: uid.to_string(),
            token_type: TokenType::Access,
            exp: Some((issued_at + Duration::hours(ACCESS_TOKEN_TTL_HOURS)).timestamp()),
        };
        self.sign(&claims)
    }

    /// Issue a non-expiring refresh token
    pub fn issue_refresh(&self, uid: &str) -> Result<String> {
        let claims = Claims {
            uid: uid.to_string(),
            token_type: TokenType::Refresh,
            exp: None,
        };
        self.sign(&claims)
    }

    /// Verify a refresh token and return its uid
    pub fn decode_refresh(&self, token: &str) -> Result<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        let claims = self.verify(token, &validation)?;
        if claims.token_type != TokenType::Refresh {
            return Err(Error::InvalidToken("not a refresh token".to_string()));
        }
        Ok(claims.uid)
    }

    /// Verify an unexpired access token
    pub fn validate_access(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        let claims = self.verify(token, &validation)?;
        if claims.token_type != TokenType::Access {
            return Err(Error::InvalidToken("not an access token".to_string()));
        }
        Ok(claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| Error::Token(e.to_string()))
    }

    fn verify(&self, token: &str, validation: &Validation) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, validation)
            .map(|data| data.claims)
            .map_err(|e| Error::InvalidToken(e.to_string()))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Result<&str> {
    let header = header.trim();
    let prefix = header
        .get(..BEARER_PREFIX.len())
        .ok_or_else(|| Error::InvalidToken("malformed Authorization header".to_string()))?;

    if !prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
        return Err(Error::InvalidToken("expected bearer authentication".to_string()));
    }

    let token = header[BEARER_PREFIX.len()..].trim();
    if token.is_empty() {
        return Err(Error::InvalidToken("empty bearer token".to_string()));
    }
    Ok(token)
}
