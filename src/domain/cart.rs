//! Client-held cart aggregation
//!
//! The cart never lives server-side: the presentation layer keeps one per
//! browsing session and submits its lines at checkout. Stock is validated
//! only at submission, never here.

use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// One to-be-purchased line. Identity key is `(product_id, size)`; `name` and
/// `image` are display snapshots only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub size: Option<String>,
    pub name: String,
    pub image: Option<String>,
    /// Unit price snapshot in minor currency units.
    pub unit_price: i64,
    pub quantity: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of line quantities.
    pub count: u32,
    /// Sum of `unit_price * quantity` in minor currency units.
    pub subtotal: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLine>,
}

impl Cart {
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a line, merging with an existing `(product_id, size)` line by
    /// summing quantities. Two lines with the same product but different
    /// sizes stay distinct; absent size is its own key.
    pub fn add(&mut self, line: CartLine) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == line.product_id && i.size == line.size)
        {
            existing.quantity += line.quantity;
        } else {
            self.items.push(line);
        }
    }

    /// Removes the matching line. An absent match is a no-op, not an error.
    pub fn remove(&mut self, product_id: Uuid, size: Option<&str>) {
        self.items
            .retain(|i| !(i.product_id == product_id && i.size.as_deref() == size));
    }

    /// Overwrites the stored quantity (not incremental). Zero removes the
    /// line; an absent line is a no-op.
    pub fn set_quantity(&mut self, product_id: Uuid, size: Option<&str>, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id, size);
            return;
        }
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id && i.size.as_deref() == size)
        {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Recomputed on every call, never cached.
    pub fn totals(&self) -> CartTotals {
        self.items.iter().fold(CartTotals::default(), |acc, i| CartTotals {
            count: acc.count + i.quantity,
            subtotal: acc.subtotal + i.unit_price * i64::from(i.quantity),
        })
    }

    /// Loads the durable local cache. A missing, unreadable, or corrupt cache
    /// yields an empty cart, never an error.
    pub fn load(path: &Path) -> Cart {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Cart::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(cart) => cart,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "discarding corrupt cart cache");
                Cart::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let raw = serde_json::to_string(self).map_err(std::io::Error::other)?;
        std::fs::write(path, raw)
    }
}
