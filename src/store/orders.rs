//! Order rows
//!
//! Orders are created exactly once per checkout and never deleted; `status`
//! is the only field mutated afterwards.

use axum::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::order::{NewOrder, Order, OrderStatus};

/// Inserts the order inside the checkout transaction so the stock decrements
/// and the order row commit or roll back together.
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    order: &NewOrder,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "INSERT INTO orders (id, user_id, items, total_price, shipping_address, status, payment_method, is_paid, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, NOW(), NOW())
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(Json(&order.items))
    .bind(order.total_price)
    .bind(Json(&order.shipping_address))
    .bind(order.payment_method.as_str())
    .bind(order.is_paid)
    .fetch_one(&mut **tx)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Per-user order history. Implementations return only orders owned by
/// `user_id`, newest first; the caller never sees another user's rows.
#[async_trait]
pub trait OrderHistory {
    async fn orders_for(&self, user_id: Uuid) -> Result<Vec<Order>, sqlx::Error>;
}

#[async_trait]
impl OrderHistory for PgPool {
    async fn orders_for(&self, user_id: Uuid) -> Result<Vec<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self)
        .await
    }
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: OrderStatus,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await
}
