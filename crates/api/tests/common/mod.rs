//! Common test utilities for integration tests.
//!
//! The router runs against the in-memory store, so no database is needed.

// Not every test binary uses every helper.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bandly_api::{
    app::{create_app, AppState, Stores},
    config::{
        Config, DatabaseConfig, InvitesConfig, JwtAuthConfig, LoggingConfig, SecurityConfig,
        ServerConfig,
    },
};
use domain::models::Profile;
use domain::store::InMemoryStore;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::Value;
use shared::jwt::JwtConfig;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Test configuration; the database URL is never used by the in-memory store.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 1,
            idle_timeout_secs: 60,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        jwt: JwtAuthConfig {
            secret: TEST_JWT_SECRET.to_string(),
            leeway_secs: 0,
        },
        invites: InvitesConfig::default(),
    }
}

/// A registered user and a bearer token for them.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    jwt: JwtConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(config, Stores::in_memory(store.clone()))
            .expect("Failed to build app state");
        Self {
            router: create_app(state),
            store,
            jwt: JwtConfig::new(TEST_JWT_SECRET).expect("Failed to build JWT config"),
        }
    }

    /// Token for a user id that has no profile row.
    pub fn token_for(&self, user_id: Uuid) -> String {
        self.jwt
            .generate_access_token(user_id, 3600)
            .expect("Failed to sign test token")
    }

    /// Seed a profile with a random email and return its credentials.
    pub async fn create_user(&self) -> TestUser {
        let email: String = SafeEmail().fake();
        self.create_user_with_email(&email.to_lowercase()).await
    }

    pub async fn create_user_with_email(&self, email: &str) -> TestUser {
        let id = Uuid::new_v4();
        self.store
            .add_profile(Profile {
                id,
                email: email.to_string(),
                name: Some(Name().fake()),
                avatar_url: None,
            })
            .await;
        TestUser {
            id,
            email: email.to_string(),
            token: self.token_for(id),
        }
    }

    /// Create a band through the API with `owner` as admin.
    pub async fn create_band(&self, owner: &TestUser) -> Uuid {
        let (status, body) = self
            .send(json_request_with_auth(
                Method::POST,
                "/api/v1/bands",
                serde_json::json!({ "name": "The Test Band" }),
                &owner.token,
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create band failed: {}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Create an invitation through the API and return the response body.
    pub async fn create_invitation(&self, band_id: Uuid, owner: &TestUser, body: Value) -> Value {
        let (status, body) = self
            .send(json_request_with_auth(
                Method::POST,
                &format!("/api/v1/bands/{}/invitations", band_id),
                body,
                &owner.token,
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create invitation failed: {}", body);
        body
    }

    /// Send a request and parse the JSON body; empty bodies become `Null`.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        if body.is_empty() {
            return (status, Value::Null);
        }
        let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!(
                "Failed to parse response body. Status: {}, Body: {:?}",
                status,
                String::from_utf8_lossy(&body)
            )
        });
        (status, json)
    }
}

/// Build a JSON request with authentication.
pub fn json_request_with_auth(
    method: Method,
    uri: &str,
    body: Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build an authenticated JSON request from a raw body string.
pub fn raw_request_with_auth(method: Method, uri: &str, body: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body, optionally authenticated.
pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn accept_uri(token: &str) -> String {
    format!("/api/v1/invitations/{}/accept", token)
}
