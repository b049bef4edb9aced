//! Order placement and administration endpoints

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Identity;
use crate::checkout::{self, OrderSubmission};
use crate::domain::order::{Order, OrderStatus, ALLOWED_STATUSES};
use crate::error::{ApiError, ApiResult};
use crate::events::{self, OrderEvent};
use crate::extract::{Json, Path};
use crate::store::orders::OrderHistory;
use crate::{store, AppState};

#[derive(Serialize)]
pub struct OrderBody {
    order: Order,
}

#[derive(Serialize)]
pub struct OrdersBody {
    orders: Vec<Order>,
}

/// POST /orders: validates the submission, reserves stock, persists the
/// order. The owner is always the verified caller, never client input.
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<OrderSubmission>,
) -> ApiResult<(StatusCode, Json<OrderBody>)> {
    let draft = body.validate()?;
    let order = checkout::place_order(&state.db, identity.user.id, draft).await?;
    tracing::info!(
        order_id = %order.id,
        user_id = %order.user_id,
        total_price = order.total_price,
        "order placed"
    );
    events::publish(
        &state.nats,
        OrderEvent::Created {
            order_id: order.id,
            user_id: order.user_id,
            total_price: order.total_price,
        },
    )
    .await;
    Ok((StatusCode::CREATED, Json(OrderBody { order })))
}

/// GET /orders: admin only, newest first.
pub async fn list_all(State(state): State<AppState>, identity: Identity) -> ApiResult<Json<OrdersBody>> {
    identity.require_admin()?;
    let orders = store::orders::list_all(&state.db).await?;
    Ok(Json(OrdersBody { orders }))
}

/// GET /orders/mine: the caller's own orders, newest first.
pub async fn list_mine(State(state): State<AppState>, identity: Identity) -> ApiResult<Json<OrdersBody>> {
    let orders = state.db.orders_for(identity.user.id).await?;
    Ok(Json(OrdersBody { orders }))
}

/// GET /orders/:id: owner or admin.
pub async fn get_one(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OrderBody>> {
    let order = store::orders::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found.".into()))?;
    if !identity.can_view_order(order.user_id) {
        return Err(ApiError::Forbidden("Forbidden: access denied.".into()));
    }
    Ok(Json(OrderBody { order }))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

/// PUT /orders/:id: admin-only status mutation. Any enumerated value is
/// accepted from any current state.
pub async fn update_status(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdate>,
) -> ApiResult<Json<OrderBody>> {
    identity.require_admin()?;
    let status = body
        .status
        .as_deref()
        .and_then(OrderStatus::parse)
        .ok_or_else(|| {
            ApiError::Validation(format!("Invalid status. Allowed: {}", ALLOWED_STATUSES.join(", ")))
        })?;
    let order = store::orders::update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found.".into()))?;
    tracing::info!(order_id = %order.id, status = %status, "order status updated");
    events::publish(
        &state.nats,
        OrderEvent::StatusChanged { order_id: order.id, status: status.to_string() },
    )
    .await;
    Ok(Json(OrderBody { order }))
}
