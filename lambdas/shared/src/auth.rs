//! Login and refresh flows
//!
//! Login hands out a long-lived refresh token (minted once, on first login,
//! and stored with the user) plus a fresh access token. Refresh exchanges the
//! refresh token for a new access token. Blocked users get neither.

use tracing::info;

use crate::dynamo::DynamoClient;
use crate::errors::{Error, Result};
use crate::models::{AccessTokenResponse, LoginRequest, RefreshRequest, TokenPair, User};
use crate::tokens::TokenIssuer;

/// E-mail domain every account must belong to
pub const ALLOWED_EMAIL_DOMAIN: &str = "berkeley.edu";

/// Persistence needed by the auth flows
#[allow(async_fn_in_trait)]
pub trait UserStore {
    async fn get_user(&self, uid: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: &User) -> Result<()>;
}

impl UserStore for DynamoClient {
    async fn get_user(&self, uid: &str) -> Result<Option<User>> {
        DynamoClient::get_user(self, uid).await
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        DynamoClient::create_user(self, user).await
    }
}

/// Whether an address belongs to the campus domain (or one of its subdomains)
pub fn is_campus_email(email: &str) -> bool {
    let Some((local, domain)) = email.trim().rsplit_once('@') else {
        return false;
    };
    let domain = domain.to_ascii_lowercase();
    !local.is_empty()
        && (domain == ALLOWED_EMAIL_DOMAIN || domain.ends_with(&format!(".{}", ALLOWED_EMAIL_DOMAIN)))
}

/// Log a user in, registering them on first login
pub async fn login<S: UserStore>(store: &S, issuer: &TokenIssuer, req: &LoginRequest) -> Result<TokenPair> {
    let uid = req.uid.trim();
    if uid.is_empty() {
        return Err(Error::Validation("uid is required".to_string()));
    }
    if req.email.trim().is_empty() {
        return Err(Error::Validation("email is required".to_string()));
    }
    if !is_campus_email(&req.email) {
        return Err(Error::Validation(format!(
            "email must be a {} address",
            ALLOWED_EMAIL_DOMAIN
        )));
    }

    if let Some(user) = store.get_user(uid).await? {
        info!(uid = %uid, "Issuing access token for existing user");
        return existing_user_tokens(issuer, user);
    }

    let refresh_token = issuer.issue_refresh(uid)?;
    let user = User::new(uid.to_string(), req.email.trim().to_string(), refresh_token);
    match store.create_user(&user).await {
        Ok(()) => {}
        // a concurrent first login registered the uid after our read
        Err(Error::UserAlreadyExists(_)) => {
            info!(uid = %uid, "User registered concurrently, using stored record");
            return match store.get_user(uid).await? {
                Some(existing) => existing_user_tokens(issuer, existing),
                None => Err(Error::UserAlreadyExists(uid.to_string())),
            };
        }
        Err(e) => return Err(e),
    }
    info!(uid = %uid, "Registered new user");

    Ok(TokenPair {
        refresh_token: user.refresh_token,
        access_token: issuer.issue_access(uid)?,
    })
}

fn existing_user_tokens(issuer: &TokenIssuer, user: User) -> Result<TokenPair> {
    if user.blocked {
        return Err(Error::UserBlocked(user.uid));
    }
    Ok(TokenPair {
        access_token: issuer.issue_access(&user.uid)?,
        refresh_token: user.refresh_token,
    })
}

/// Exchange a refresh token for a new access token
pub async fn refresh<S: UserStore>(
    store: &S,
    issuer: &TokenIssuer,
    req: &RefreshRequest,
) -> Result<AccessTokenResponse> {
    let uid = issuer.decode_refresh(&req.refresh_token)?;

    let user = store
        .get_user(&uid)
        .await?
        .ok_or_else(|| Error::InvalidToken("unknown user".to_string()))?;

    if user.blocked {
        return Err(Error::UserBlocked(uid));
    }

    Ok(AccessTokenResponse {
        access_token: issuer.issue_access(&uid)?,
    })
}
