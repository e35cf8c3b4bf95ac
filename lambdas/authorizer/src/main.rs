//! Berkeley Mobile Token Authorizer
//!
//! API Gateway TOKEN authorizer. A valid access token is allowed to invoke the
//! requested method, with the user's uid passed to the backend in the
//! authorizer context. Anything else is denied.

use berkeley_mobile_core::tokens::bearer_token;
use berkeley_mobile_core::{Config, Result as CoreResult, TokenIssuer};
use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const POLICY_VERSION: &str = "2012-10-17";
const INVOKE_ACTION: &str = "execute-api:Invoke";
const DENIED_PRINCIPAL: &str = "user";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenAuthorizerRequest {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    authorization_token: Option<String>,
    method_arn: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenAuthorizerResponse {
    principal_id: String,
    policy_document: PolicyDocument,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    context: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PolicyDocument {
    version: &'static str,
    statement: Vec<Statement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Statement {
    action: &'static str,
    effect: Effect,
    resource: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
enum Effect {
    Allow,
    Deny,
}

fn policy(principal_id: &str, effect: Effect, method_arn: &str) -> TokenAuthorizerResponse {
    let mut context = HashMap::new();
    if effect == Effect::Allow {
        context.insert("uid".to_string(), principal_id.to_string());
    }

    TokenAuthorizerResponse {
        principal_id: principal_id.to_string(),
        policy_document: PolicyDocument {
            version: POLICY_VERSION,
            statement: vec![Statement {
                action: INVOKE_ACTION,
                effect,
                resource: method_arn.to_string(),
            }],
        },
        context,
    }
}

fn validate(issuer: &TokenIssuer, header: Option<&str>) -> CoreResult<String> {
    let header = header.unwrap_or_default();
    let claims = issuer.validate_access(bearer_token(header)?)?;
    Ok(claims.uid)
}

fn authorize(issuer: &TokenIssuer, request: &TokenAuthorizerRequest) -> TokenAuthorizerResponse {
    match validate(issuer, request.authorization_token.as_deref()) {
        Ok(uid) => {
            info!(uid = %uid, "Authorized");
            policy(&uid, Effect::Allow, &request.method_arn)
        }
        Err(e) => {
            warn!(error = %e, kind = ?request.kind, "Token rejected");
            policy(DENIED_PRINCIPAL, Effect::Deny, &request.method_arn)
        }
    }
}

async fn handler(
    issuer: &TokenIssuer,
    event: LambdaEvent<TokenAuthorizerRequest>,
) -> Result<TokenAuthorizerResponse, LambdaError> {
    let (request, _) = event.into_parts();
    Ok(authorize(issuer, &request))
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let issuer = Config::from_env().token_issuer()?;

    run(service_fn(|event| handler(&issuer, event))).await
}
