//! Product catalog endpoints

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::Identity;
use crate::domain::product::{NewProduct, Product, ProductSummary};
use crate::error::{ApiError, ApiResult};
use crate::extract::{Json, Path};
use crate::{store, AppState};

#[derive(Serialize)]
pub struct ProductBody {
    product: Product,
}

#[derive(Serialize)]
pub struct ProductsBody {
    products: Vec<ProductSummary>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[validate(range(min = 1, message = "price must be a positive number (in cents)"))]
    pub price: i64,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub stock: i64,
}

fn default_category() -> String {
    "uncategorized".to_string()
}

impl ProductRequest {
    fn into_new_product(self) -> Result<NewProduct, ApiError> {
        self.validate()?;
        Ok(NewProduct {
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            sizes: self.sizes,
            images: self.images,
            is_featured: self.is_featured,
            stock: self.stock.clamp(0, i64::from(i32::MAX)) as i32,
        })
    }
}

/// GET /products: summary listing, newest first.
pub async fn list(State(state): State<AppState>, _identity: Identity) -> ApiResult<Json<ProductsBody>> {
    let products = store::products::list(&state.db).await?;
    Ok(Json(ProductsBody { products }))
}

/// POST /products: admin only.
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductBody>)> {
    identity.require_admin()?;
    let draft = body.into_new_product()?;
    let product = store::products::insert(&state.db, &draft).await?;
    tracing::info!(product_id = %product.id, slug = %product.slug, "product created");
    Ok((StatusCode::CREATED, Json(ProductBody { product })))
}

/// GET /products/:id
pub async fn get_one(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProductBody>> {
    let product = store::products::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found.".into()))?;
    Ok(Json(ProductBody { product }))
}

/// PUT /products/:id: admin only. The slug is left unchanged.
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(body): Json<ProductRequest>,
) -> ApiResult<Json<ProductBody>> {
    identity.require_admin()?;
    let draft = body.into_new_product()?;
    let product = store::products::update(&state.db, id, &draft)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found.".into()))?;
    Ok(Json(ProductBody { product }))
}

/// GET /products/slug/:slug: public storefront lookup.
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ProductBody>> {
    let product = store::products::get_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found.".into()))?;
    Ok(Json(ProductBody { product }))
}
