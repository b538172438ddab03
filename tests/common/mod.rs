#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use storefront_api::{clock::Clock, config::AppConfig, routes::create_app, state::AppState};
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub async fn spawn_app() -> TestApp {
    let state = AppState::seeded(&AppConfig::default())
        .await
        .expect("seed state");
    TestApp {
        router: create_app(state.clone()),
        state,
    }
}

pub async fn spawn_app_with_clock(clock: Arc<dyn Clock>) -> TestApp {
    let state = AppState::seeded_with_clock(&AppConfig::default(), clock)
        .await
        .expect("seed state");
    TestApp {
        router: create_app(state.clone()),
        state,
    }
}

/// One request against the router.
#[derive(Default)]
pub struct Call<'a> {
    pub session: Option<&'a str>,
    pub token: Option<&'a str>,
    pub body: Option<Value>,
}

impl TestApp {
    pub async fn call(&self, method: Method, uri: &str, call: Call<'_>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(session) = call.session {
            builder = builder.header("session-id", session);
        }
        if let Some(token) = call.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match call.body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).expect("request")).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Call::default()).await
    }

    pub async fn product_id(&self, search: &str) -> String {
        let (status, body) = self.get(&format!("/api/products?search={search}")).await;
        assert_eq!(status, StatusCode::OK);
        body["data"][0]["id"]
            .as_str()
            .expect("product id")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/login",
                Call {
                    body: Some(serde_json::json!({ "username": username, "password": password })),
                    ..Call::default()
                },
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["sessionId"].as_str().expect("token").to_string()
    }

    /// Registers a shopper and returns `(token, user id)`.
    pub async fn register(&self, name: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/register",
                Call {
                    body: Some(serde_json::json!({
                        "name": name,
                        "email": email,
                        "password": "secret-pass",
                    })),
                    ..Call::default()
                },
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["data"]["sessionId"].as_str().expect("token").to_string(),
            body["data"]["user"]["id"].as_str().expect("id").to_string(),
        )
    }
}
