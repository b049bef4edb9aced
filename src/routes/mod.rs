//! HTTP surface

use axum::{
    routing::{get, post},
    Json, Router,
};

use crate::AppState;

pub mod orders;
pub mod products;
pub mod users;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(orders::create).get(orders::list_all))
        .route("/orders/mine", get(orders::list_mine))
        .route("/orders/:id", get(orders::get_one).put(orders::update_status))
        .route("/products", get(products::list).post(products::create))
        .route("/products/:id", get(products::get_one).put(products::update))
        .route("/products/slug/:slug", get(products::get_by_slug))
        .route("/users/me", get(users::me))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "storefront" }))
}
