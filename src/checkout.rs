//! Order intake: submission validation, stock reservation, order creation
//!
//! The reservation loop and the order insert run inside one Postgres
//! transaction. Each per-item decrement is a single conditional UPDATE
//! (`stock = stock - N WHERE stock >= N`), so two concurrent submissions can
//! never drive stock negative, and a failure part-way rolls every earlier
//! decrement back.

use axum::async_trait;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::domain::order::{NewOrder, Order, OrderItem, PaymentMethod, ShippingAddress};
use crate::error::ApiError;
use crate::store;

/// Outcome of one conditional stock decrement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decrement {
    Applied,
    Insufficient,
    Missing,
}

/// The catalog store's conditional-decrement seam. The check and the write
/// must be indivisible to concurrent callers.
#[async_trait]
pub trait Inventory {
    async fn decrement(&mut self, product_id: Uuid, quantity: i32) -> Result<Decrement, sqlx::Error>;
}

#[async_trait]
impl<'c> Inventory for Transaction<'c, Postgres> {
    async fn decrement(&mut self, product_id: Uuid, quantity: i32) -> Result<Decrement, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE products SET stock = stock - $2, updated_at = NOW()
             WHERE id = $1 AND stock >= $2",
        )
        .bind(product_id)
        .bind(quantity)
        .execute(&mut **self)
        .await?;
        if updated.rows_affected() == 1 {
            return Ok(Decrement::Applied);
        }
        let stock: Option<i32> = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&mut **self)
            .await?;
        Ok(match stock {
            None => Decrement::Missing,
            Some(_) => Decrement::Insufficient,
        })
    }
}

/// Loosely-typed request body; `validate` is the explicit first phase that
/// produces a typed [`NewOrder`] before any side effect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_price: Option<i64>,
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub is_paid: bool,
}

impl OrderSubmission {
    pub fn validate(self) -> Result<NewOrder, ApiError> {
        if self.items.is_empty() {
            return Err(ApiError::Validation("Order items are required.".into()));
        }
        for item in &self.items {
            if item.quantity < 1 {
                return Err(ApiError::Validation(format!("Invalid quantity for {}.", item.name)));
            }
        }
        let total_price = match self.total_price {
            Some(total) if total > 0 => total,
            _ => return Err(ApiError::Validation("Valid totalPrice is required.".into())),
        };
        let shipping_address = self
            .shipping_address
            .ok_or_else(|| ApiError::Validation("Shipping address is required.".into()))?;
        shipping_address.validate()?;
        Ok(NewOrder {
            items: self.items,
            total_price,
            shipping_address,
            payment_method: self.payment_method,
            is_paid: self.is_paid,
        })
    }
}

/// Decrements stock for each line in submission order. The first failing line
/// aborts the whole reservation; the error names the product from the
/// submitted snapshot.
pub async fn reserve<I: Inventory>(inventory: &mut I, items: &[OrderItem]) -> Result<(), ApiError> {
    for item in items {
        match inventory.decrement(item.product_id, item.quantity).await? {
            Decrement::Applied => {}
            Decrement::Missing => {
                return Err(ApiError::Validation(format!("Product not found: {}", item.name)));
            }
            Decrement::Insufficient => return Err(ApiError::OutOfStock(item.name.clone())),
        }
    }
    Ok(())
}

/// Reserves stock and persists the order as one atomic unit. The declared
/// total is stored as submitted; it is not recomputed from the line items.
pub async fn place_order(pool: &PgPool, user_id: Uuid, order: NewOrder) -> Result<Order, ApiError> {
    let mut tx = pool.begin().await?;
    reserve(&mut tx, &order.items).await?;
    let created = store::orders::insert(&mut tx, user_id, &order).await?;
    tx.commit().await?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Test double with the same indivisible check-then-decrement contract as
    /// the Postgres conditional UPDATE.
    #[derive(Clone, Default)]
    struct MemoryInventory {
        stock: Arc<Mutex<HashMap<Uuid, i32>>>,
    }

    impl MemoryInventory {
        fn with_product(product_id: Uuid, stock: i32) -> Self {
            let inventory = Self::default();
            inventory.stock.lock().unwrap().insert(product_id, stock);
            inventory
        }

        fn stock_of(&self, product_id: Uuid) -> Option<i32> {
            self.stock.lock().unwrap().get(&product_id).copied()
        }
    }

    #[async_trait]
    impl Inventory for MemoryInventory {
        async fn decrement(
            &mut self,
            product_id: Uuid,
            quantity: i32,
        ) -> Result<Decrement, sqlx::Error> {
            let mut stock = self.stock.lock().unwrap();
            Ok(match stock.get_mut(&product_id) {
                None => Decrement::Missing,
                Some(available) if *available < quantity => Decrement::Insufficient,
                Some(available) => {
                    *available -= quantity;
                    Decrement::Applied
                }
            })
        }
    }

    fn item(product_id: Uuid, name: &str, quantity: i32) -> OrderItem {
        OrderItem {
            product_id,
            name: name.into(),
            size: None,
            quantity,
            unit_price: 4500,
            image: None,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ada Obi".into(),
            address_line1: "1 Main St".into(),
            address_line2: None,
            city: "Lagos".into(),
            state: "LA".into(),
            postal_code: "100001".into(),
            country: "NG".into(),
            phone: None,
        }
    }

    fn submission(items: Vec<OrderItem>, total_price: Option<i64>) -> OrderSubmission {
        OrderSubmission {
            items,
            total_price,
            shipping_address: Some(address()),
            payment_method: PaymentMethod::Cod,
            is_paid: false,
        }
    }

    #[tokio::test]
    async fn test_reserve_decrements_stock() {
        let p1 = Uuid::now_v7();
        let mut inventory = MemoryInventory::with_product(p1, 5);
        reserve(&mut inventory, &[item(p1, "Veil Hoodie", 2)]).await.unwrap();
        assert_eq!(inventory.stock_of(p1), Some(3));
    }

    #[tokio::test]
    async fn test_reserve_rejects_quantity_above_stock() {
        let p1 = Uuid::now_v7();
        let mut inventory = MemoryInventory::with_product(p1, 2);
        let err = reserve(&mut inventory, &[item(p1, "Veil Hoodie", 5)]).await.unwrap_err();
        assert_eq!(err.to_string(), "Out of stock: Veil Hoodie");
        assert_eq!(inventory.stock_of(p1), Some(2));
    }

    #[tokio::test]
    async fn test_reserve_rejects_missing_product() {
        let mut inventory = MemoryInventory::default();
        let err = reserve(&mut inventory, &[item(Uuid::now_v7(), "Ghost Tee", 1)])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Product not found: Ghost Tee");
    }

    #[tokio::test]
    async fn test_concurrent_submissions_never_oversell() {
        let p1 = Uuid::now_v7();
        let inventory = MemoryInventory::with_product(p1, 1);

        let first = {
            let mut inv = inventory.clone();
            tokio::spawn(async move { reserve(&mut inv, &[item(p1, "Veil Hoodie", 1)]).await })
        };
        let second = {
            let mut inv = inventory.clone();
            tokio::spawn(async move { reserve(&mut inv, &[item(p1, "Veil Hoodie", 1)]).await })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert_eq!(inventory.stock_of(p1), Some(0));
    }

    #[test]
    fn test_empty_items_rejected_before_any_mutation() {
        let err = submission(vec![], Some(9000)).validate().unwrap_err();
        assert_eq!(err.to_string(), "Order items are required.");
    }

    #[test]
    fn test_missing_or_nonpositive_total_rejected() {
        let p1 = Uuid::now_v7();
        let err = submission(vec![item(p1, "Veil Hoodie", 1)], None).validate().unwrap_err();
        assert_eq!(err.to_string(), "Valid totalPrice is required.");
        let err = submission(vec![item(p1, "Veil Hoodie", 1)], Some(0)).validate().unwrap_err();
        assert_eq!(err.to_string(), "Valid totalPrice is required.");
    }

    #[test]
    fn test_missing_address_rejected() {
        let mut body = submission(vec![item(Uuid::now_v7(), "Veil Hoodie", 1)], Some(4500));
        body.shipping_address = None;
        let err = body.validate().unwrap_err();
        assert_eq!(err.to_string(), "Shipping address is required.");
    }

    #[test]
    fn test_nonpositive_quantity_rejected() {
        let body = submission(vec![item(Uuid::now_v7(), "Veil Hoodie", 0)], Some(4500));
        let err = body.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid quantity for Veil Hoodie.");
    }

    // The declared total is trusted as submitted; a mismatch against the
    // summed line prices is accepted. Pins current behavior.
    #[test]
    fn test_declared_total_is_not_cross_checked() {
        let p1 = Uuid::now_v7();
        let order = submission(vec![item(p1, "Veil Hoodie", 2)], Some(999))
            .validate()
            .unwrap();
        assert_eq!(order.total_price, 999);
        assert_ne!(
            order.total_price,
            order.items.iter().map(|i| i.unit_price * i64::from(i.quantity)).sum::<i64>()
        );
    }

    #[test]
    fn test_defaults_for_payment_fields() {
        let body: OrderSubmission = serde_json::from_value(serde_json::json!({
            "items": [{
                "productId": Uuid::now_v7(),
                "name": "Veil Hoodie",
                "size": "M",
                "quantity": 1,
                "unitPrice": 4500,
                "image": null
            }],
            "totalPrice": 4500,
            "shippingAddress": {
                "fullName": "Ada Obi",
                "addressLine1": "1 Main St",
                "addressLine2": null,
                "city": "Lagos",
                "state": "LA",
                "postalCode": "100001",
                "country": "NG",
                "phone": null
            }
        }))
        .unwrap();
        let order = body.validate().unwrap();
        assert_eq!(order.payment_method, PaymentMethod::Cod);
        assert!(!order.is_paid);
    }
}
