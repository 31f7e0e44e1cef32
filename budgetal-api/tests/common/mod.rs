//! Common test utilities for HTTP tests
//!
//! Builds the full router over an in-memory store so the endpoints can be
//! driven with `tower::ServiceExt::oneshot` without a database.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use budgetal_api::app::{build_router, AppState};
use budgetal_api::config::Config;
use budgetal_shared::auth::jwt::{create_token, Claims};
use budgetal_shared::auth::middleware::SESSION_HEADER;
use budgetal_shared::budget::{DefaultItem, DefaultTemplate};
use budgetal_shared::models::transaction::NewTransaction;
use budgetal_shared::store::MemoryStore;
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Router, backing store and an authenticated user
pub struct TestContext {
    pub app: axum::Router,
    pub store: MemoryStore,
    pub user_id: Uuid,
    pub token: String,
}

impl TestContext {
    /// Creates a context whose budgets start with the two default items
    pub fn new() -> Self {
        Self::with_template(default_template())
    }

    pub fn with_template(template: DefaultTemplate) -> Self {
        Self::with_store(MemoryStore::new(), template)
    }

    /// Creates a context over a prepared store
    pub fn with_store(store: MemoryStore, template: DefaultTemplate) -> Self {
        let config = Config::from_vars(|key| match key {
            "DATABASE_URL" => Some("postgresql://unused/budgetal_test".to_string()),
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            _ => None,
        })
        .expect("test config");

        let state = AppState::with_stores(
            config,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            template,
        );

        let user_id = Uuid::new_v4();
        let token = token_for(user_id);

        Self {
            app: build_router(state),
            store,
            user_id,
            token,
        }
    }

    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Sends an authenticated GET
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(uri)
            .header("authorization", self.auth_header())
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Sends a GET with the session header instead of `Authorization`
    pub async fn get_with_session(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(uri)
            .header(SESSION_HEADER, &self.token)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Sends a GET without credentials
    pub async fn get_anonymous(&self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Sends an authenticated request with a JSON body
    pub async fn send_json(&self, method: Method, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send_json_as(&self.token, method, uri, body).await
    }

    pub async fn send_json_as(
        &self,
        token: &str,
        method: Method,
        uri: &str,
        body: serde_json::Value,
    ) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Sends an authenticated DELETE
    pub async fn delete(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .header("authorization", self.auth_header())
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Records spending for the context's user
    pub async fn spend(&self, category: &str, amount: Decimal, date: NaiveDate) {
        self.spend_as(self.user_id, category, amount, date).await;
    }

    pub async fn spend_as(&self, user_id: Uuid, category: &str, amount: Decimal, date: NaiveDate) {
        self.store
            .insert_transaction(NewTransaction {
                user_id,
                category: category.to_string(),
                amount,
                date,
            })
            .await;
    }
}

pub fn token_for(user_id: Uuid) -> String {
    create_token(&Claims::new(user_id), JWT_SECRET).unwrap()
}

pub fn default_template() -> DefaultTemplate {
    DefaultTemplate::new(vec![
        DefaultItem {
            name: "Car Insurance".to_string(),
            amount: dec!(600.00),
            due_month: 6,
            interval: 12,
        },
        DefaultItem {
            name: "Holiday Gifts".to_string(),
            amount: dec!(400.00),
            due_month: 12,
            interval: 10,
        },
    ])
    .unwrap()
}

pub fn current_year() -> i32 {
    Local::now().year()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Reads a response body as JSON, asserting the status first
pub async fn json_body(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    assert_eq!(
        status,
        expected,
        "unexpected status, body: {}",
        String::from_utf8_lossy(&body)
    );

    serde_json::from_slice(&body).unwrap()
}
