//! JSON-over-HTTP surface.
//!
//! Every route except `/health`, `/login` and `/registerowner` requires an
//! `Authorization: Bearer` token. Handlers resolve the caller's [`Identity`] and hand it
//! to the core, which enforces scoping.
//!
//! [`Identity`]: crate::core::scope::Identity

/// Login, registration and admin listing
pub mod accounts;
/// Access tokens and the identity extractor
pub mod auth;
/// Error to response mapping
pub mod error;
/// Extractors with JSON rejections
pub mod extract;
/// Transactions, dashboard and catalogs
pub mod ledger;
/// Pricing packages and additional prices
pub mod pricing;
/// Rooming houses and rooms
pub mod property;
/// Tenants
pub mod tenancy;

use crate::{config::AppConfig, core::dashboard::DashboardOptions};
use auth::TokenService;
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle
    pub db: Arc<DatabaseConnection>,
    /// Token issuer and validator
    pub tokens: Arc<TokenService>,
    /// Dashboard switches
    pub dashboard: DashboardOptions,
}

impl AppState {
    /// Builds the state from a connection and the loaded configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(TokenService::new(&config.jwt_secret, config.jwt_ttl_secs)),
            dashboard: DashboardOptions {
                zero_fill: config.dashboard_zero_fill,
            },
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(accounts::routes())
        .merge(property::routes())
        .merge(pricing::routes())
        .merge(tenancy::routes())
        .merge(ledger::routes())
        .with_state(state)
}

/// CORS policy for the configured browser origins.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::scope::Identity;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    pub fn test_state(db: DatabaseConnection) -> AppState {
        AppState {
            db: Arc::new(db),
            tokens: Arc::new(TokenService::new("test-secret", 3600)),
            dashboard: DashboardOptions::default(),
        }
    }

    pub fn bearer(state: &AppState, identity: &Identity) -> String {
        format!("Bearer {}", state.tokens.issue(identity).unwrap())
    }

    /// Sends one request through a fresh router and decodes the JSON body.
    pub async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            request = request.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
