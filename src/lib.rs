//! Storefront - Self-hosted Storefront and Order Service
//!
//! ## Features
//! - Product catalog with slug lookup
//! - Client-held cart aggregation
//! - Checkout with atomic stock reservation
//! - Order management and status administration

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod extract;
pub mod routes;
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub nats: Option<async_nats::Client>,
    pub verifier: auth::SharedVerifier,
}

pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
