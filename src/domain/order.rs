//! Order records and their enumerations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

pub const ALLOWED_STATUSES: [&str; 5] = ["pending", "processing", "shipped", "delivered", "cancelled"];

/// Order lifecycle states. No transition graph is enforced; an admin may set
/// any enumerated value at any time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cod,
    Card,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "cod",
            Self::Card => "card",
        }
    }
}

/// One line of an order: a snapshot copied from the cart at submission time,
/// independent of later product changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub size: Option<String>,
    pub quantity: i32,
    /// Unit price snapshot in minor currency units.
    pub unit_price: i64,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[validate(length(min = 1, message = "fullName is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "addressLine1 is required"))]
    pub address_line1: String,
    pub address_line2: Option<String>,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "postalCode is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "country is required"))]
    pub country: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Json<Vec<OrderItem>>,
    pub total_price: i64,
    pub shipping_address: Json<ShippingAddress>,
    pub status: String,
    pub payment_method: String,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully validated submission, ready for stock reservation and persistence.
#[derive(Clone, Debug)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub total_price: i64,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for name in ALLOWED_STATUSES {
            let status = OrderStatus::parse(name).unwrap();
            assert_eq!(status.as_str(), name);
        }
        assert_eq!(OrderStatus::parse("refunded"), None);
        assert_eq!(OrderStatus::parse("PENDING"), None);
    }

    #[test]
    fn test_payment_method_serde() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cod).unwrap(), "\"cod\"");
        let card: PaymentMethod = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(card, PaymentMethod::Card);
    }

    #[test]
    fn test_order_item_wire_shape() {
        let item = OrderItem {
            product_id: Uuid::nil(),
            name: "Veil Hoodie".into(),
            size: Some("M".into()),
            quantity: 2,
            unit_price: 4500,
            image: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], serde_json::json!(Uuid::nil()));
        assert_eq!(json["unitPrice"], 4500);
    }

    #[test]
    fn test_shipping_address_requires_fields() {
        let address = ShippingAddress {
            full_name: "".into(),
            address_line1: "1 Main St".into(),
            address_line2: None,
            city: "Lagos".into(),
            state: "LA".into(),
            postal_code: "100001".into(),
            country: "NG".into(),
            phone: None,
        };
        assert!(address.validate().is_err());
    }
}
