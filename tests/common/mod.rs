#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{Method, Request, StatusCode, header},
    middleware,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use finance_tracker::{
    auth::jwt::TokenIssuer,
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::connection,
    middleware::json_error_middleware,
    routes::{API_PREFIX, router},
    state::AppState,
};

pub struct TestApp {
    pub state: Arc<AppState>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    /// Fresh in-memory SQLite database with the schema synced from entities.
    pub async fn spawn() -> Self {
        let mut cfg = AppConfig::default();
        cfg.database = Some(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_idle: 1,
        });
        cfg.auth = Some(AuthConfig {
            access_secret: "integration-access-secret".to_string(),
            refresh_secret: "integration-refresh-secret".to_string(),
            access_ttl_secs: 900,
            refresh_ttl_days: 7,
        });

        let db = connection::connect(cfg.database().expect("database config"))
            .await
            .expect("connect to in-memory sqlite");
        let tokens = TokenIssuer::from_config(cfg.auth().expect("auth config"));
        Self {
            state: AppState::new(cfg, db, tokens),
        }
    }

    fn app(&self) -> Router {
        Router::new()
            .merge(router(Arc::clone(&self.state)))
            .layer(middleware::from_fn(json_error_middleware))
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{API_PREFIX}{path}"));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse { status, body }
    }

    pub async fn get(&self, path: &str, token: &str) -> TestResponse {
        self.send(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, path, token, Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> TestResponse {
        self.send(Method::DELETE, path, Some(token), None).await
    }

    /// Registers a user and returns `(user_id, access_token, refresh_token)`.
    pub async fn register(&self, username: &str, email: &str) -> (String, String, String) {
        let res = self
            .post(
                "/auth/register",
                None,
                serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": "password123",
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "register failed: {}", res.body);
        let data = res.data();
        (
            data["user"]["id"].as_str().unwrap().to_string(),
            data["accessToken"].as_str().unwrap().to_string(),
            data["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}
