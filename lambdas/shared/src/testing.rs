//! Test fixtures for the HTTP lambdas
//!
//! `RestEvent` renders an API Gateway REST (v1) proxy event and runs it through
//! `lambda_http`'s own event conversion, so handlers see the same stage-prefixed
//! URI and extensions they get when deployed.

use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use lambda_http::Request;
use serde_json::{json, Map, Value};

use crate::dynamo::DynamoClient;

pub const TEST_STAGE: &str = "prod";

/// Builder for a REST API proxy event
#[derive(Debug, Clone)]
pub struct RestEvent {
    method: String,
    path: String,
    stage: String,
    headers: Map<String, Value>,
    query: Map<String, Value>,
    body: Option<String>,
}

impl RestEvent {
    pub fn new(method: &str, path: &str) -> Self {
        let mut headers = Map::new();
        headers.insert(
            "Host".to_string(),
            Value::from("abc123.execute-api.us-west-1.amazonaws.com"),
        );
        Self {
            method: method.to_string(),
            path: path.to_string(),
            stage: TEST_STAGE.to_string(),
            headers,
            query: Map::new(),
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: &str) -> Self {
        Self::new("POST", path)
    }

    pub fn stage(mut self, stage: &str) -> Self {
        self.stage = stage.to_string();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), Value::from(value));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), Value::from(value));
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// The raw event as API Gateway delivers it
    pub fn to_json(&self) -> Value {
        let multi_query: Map<String, Value> = self
            .query
            .iter()
            .map(|(k, v)| (k.clone(), Value::Array(vec![v.clone()])))
            .collect();
        json!({
            "resource": "/{proxy+}",
            "path": self.path,
            "httpMethod": self.method,
            "headers": self.headers,
            "queryStringParameters": self.query,
            "multiValueQueryStringParameters": multi_query,
            "pathParameters": { "proxy": self.path.trim_start_matches('/') },
            "stageVariables": {},
            "requestContext": {
                "accountId": "123456789012",
                "resourceId": "us4z18",
                "stage": self.stage,
                "requestId": "41b45ea3-70b5-11e6-b7bd-69b5aaebc7d9",
                "identity": { "sourceIp": "192.168.100.1" },
                "resourcePath": "/{proxy+}",
                "httpMethod": self.method,
                "apiId": "abc123"
            },
            "body": self.body,
            "isBase64Encoded": false
        })
    }

    pub fn into_request(self) -> Request {
        let event = self.to_json().to_string();
        lambda_http::request::from_str(&event).expect("REST event fixture should deserialize")
    }
}

/// A table client that never reaches AWS.
///
/// Handler tests use it for paths that answer before touching DynamoDB.
pub fn offline_dynamo_client() -> DynamoClient {
    let conf = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-west-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "offline"))
        .build();
    DynamoClient::new(aws_sdk_dynamodb::Client::from_conf(conf), "berkeley-mobile-test")
}
