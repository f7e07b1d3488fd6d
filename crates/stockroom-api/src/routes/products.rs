//! Product catalog routes
//!
//! Reads are public; every mutation sits behind the bearer-token gate.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use stockroom_db::{CatalogStats, NewProduct, Product, UpdateProduct};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::{CreateProductRequest, DataResponse, MessageResponse, UpdateProductRequest};

// ==================== Input Validation ====================

/// Maximum allowed product name length
const MAX_NAME_LENGTH: usize = 100;
/// Maximum allowed product description length
const MAX_DESCRIPTION_LENGTH: usize = 1000;

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ApiError::Validation(format!(
            "Name cannot exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.trim().is_empty() {
        return Err(ApiError::Validation("Description is required".to_string()));
    }
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(ApiError::Validation(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::Validation("Price cannot be negative".to_string()));
    }
    Ok(())
}

fn validate_stock(stock: i64) -> Result<(), ApiError> {
    if stock < 0 {
        return Err(ApiError::Validation("Stock cannot be negative".to_string()));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), ApiError> {
    if category.trim().is_empty() {
        return Err(ApiError::Validation("Category is required".to_string()));
    }
    Ok(())
}

impl CreateProductRequest {
    /// First violated rule wins, in field order
    fn validate(&self) -> Result<(), ApiError> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        validate_category(&self.category)?;
        Ok(())
    }
}

impl UpdateProductRequest {
    /// Validate only the supplied fields
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        Ok(())
    }
}

// ==================== Product Routes ====================

/// GET /products (public)
async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Product>>>, ApiError> {
    let products = state.db.list_products().await?;

    Ok(Json(DataResponse { data: products }))
}

/// GET /products/{id} (public)
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .get_product_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product: {}", id)))?;

    Ok(Json(product))
}

/// POST /products
async fn create_product(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    request.validate()?;

    debug!("Creating product: {}", request.name);

    let product = state
        .db
        .insert_product(NewProduct {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
            category: request.category,
            images: request.images,
        })
        .await?;

    info!("Created product {} ({})", product.id, product.name);

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id}
async fn update_product(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    request.validate()?;

    debug!("Updating product: {}", id);

    let product = state
        .db
        .update_product(
            id,
            UpdateProduct {
                name: request.name,
                description: request.description,
                price: request.price,
                stock: request.stock,
                category: request.category,
                images: request.images,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product: {}", id)))?;

    info!("Updated product {} ({})", product.id, product.name);

    Ok(Json(product))
}

/// DELETE /products/{id}
async fn delete_product(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!("Deleting product: {}", id);

    let deleted = state.db.delete_product(id).await?;

    if deleted {
        info!("Deleted product: {}", id);
        Ok(Json(MessageResponse {
            message: "Product deleted".to_string(),
        }))
    } else {
        Err(ApiError::NotFound(format!("Product: {}", id)))
    }
}

/// GET /stats
async fn catalog_stats(
    _auth: RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<DataResponse<CatalogStats>>, ApiError> {
    let stats = state.db.catalog_stats().await?;

    Ok(Json(DataResponse { data: stats }))
}

/// Create product routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products", post(create_product))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}", put(update_product))
        .route("/products/{id}", delete(delete_product))
        .route("/stats", get(catalog_stats))
}
