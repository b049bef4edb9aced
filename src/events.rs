//! Order lifecycle events published to NATS
//!
//! Publishing is best effort: a missing connection or a failed publish is
//! logged and never fails the request.

use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Created { order_id: Uuid, user_id: Uuid, total_price: i64 },
    StatusChanged { order_id: Uuid, status: String },
}

impl OrderEvent {
    fn subject(&self) -> &'static str {
        match self {
            Self::Created { .. } => "orders.created",
            Self::StatusChanged { .. } => "orders.status_changed",
        }
    }
}

pub async fn publish(nats: &Option<async_nats::Client>, event: OrderEvent) {
    let Some(client) = nats else { return };
    let payload = match serde_json::to_vec(&event) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(error = %err, "failed to encode order event");
            return;
        }
    };
    if let Err(err) = client.publish(event.subject().to_string(), payload.into()).await {
        tracing::warn!(subject = event.subject(), error = %err, "failed to publish order event");
    }
}
