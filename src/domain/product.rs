//! Product catalog records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    /// Minor currency units (cents).
    pub price: i64,
    pub sizes: Vec<String>,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trimmed shape returned by the catalog listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price: i64,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub stock: i32,
}

/// Validated input for product creation and update.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: i64,
    pub sizes: Vec<String>,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub stock: i32,
}
