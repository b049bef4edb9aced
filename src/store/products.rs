//! Product rows and slug generation

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::product::{NewProduct, Product, ProductSummary};

pub async fn list(pool: &PgPool) -> Result<Vec<ProductSummary>, sqlx::Error> {
    sqlx::query_as::<_, ProductSummary>(
        "SELECT id, name, slug, price, images, is_featured, stock
         FROM products ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &PgPool, product: &NewProduct) -> Result<Product, sqlx::Error> {
    let slug = unique_slug(pool, &product.name).await?;
    sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, name, slug, description, category, price, sizes, images, is_featured, stock, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&product.name)
    .bind(&slug)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.price)
    .bind(&product.sizes)
    .bind(&product.images)
    .bind(product.is_featured)
    .bind(product.stock)
    .fetch_one(pool)
    .await
}

/// The slug is kept stable across updates.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    product: &NewProduct,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "UPDATE products
         SET name = $2, description = $3, category = $4, price = $5, sizes = $6,
             images = $7, is_featured = $8, stock = $9, updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.price)
    .bind(&product.sizes)
    .bind(&product.images)
    .bind(product.is_featured)
    .bind(product.stock)
    .fetch_optional(pool)
    .await
}

/// Lowercases, maps non-alphanumeric runs to single dashes, trims dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Appends a numeric suffix until the slug is free.
async fn unique_slug(pool: &PgPool, name: &str) -> Result<String, sqlx::Error> {
    let base = slugify(name);
    let mut candidate = base.clone();
    let mut suffix = 0u32;
    loop {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE slug = $1)")
                .bind(&candidate)
                .fetch_one(pool)
                .await?;
        if !taken {
            return Ok(candidate);
        }
        suffix += 1;
        candidate = format!("{base}-{suffix}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Veil Hoodie"), "veil-hoodie");
        assert_eq!(slugify("  Midnight -- Tee!  "), "midnight-tee");
        assert_eq!(slugify("Crop Top 2024"), "crop-top-2024");
        assert_eq!(slugify("!!!"), "");
    }
}
