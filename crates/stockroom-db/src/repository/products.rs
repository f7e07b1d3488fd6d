//! Product catalog operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewProduct, Product, UpdateProduct};
use crate::repository::Database;

/// Aggregate catalog statistics
///
/// Stock buckets follow the dashboard's thresholds: in stock means ten or
/// more units, low stock is anything between one and nine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogStats {
    pub total_products: i64,
    pub in_stock: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,
    pub inventory_value: f64,
    pub categories: Vec<CategoryCount>,
}

/// Product count for a single category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

impl Database {
    // ==================== Product Operations ====================

    /// Insert a new product
    pub async fn insert_product(&self, product: NewProduct) -> Result<Product, DbError> {
        let now = Utc::now();
        let images_json = serde_json::to_string(&product.images).unwrap_or_else(|_| "[]".to_string());

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, stock, category, images, sales, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&images_json)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Product {
            id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category: product.category,
            images: product.images,
            sales: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a product by ID
    pub async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, description, price, stock, category, images, sales, created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Product::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all products, newest first
    pub async fn list_products(&self) -> Result<Vec<Product>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, stock, category, images, sales, created_at, updated_at
            FROM products
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Product::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to a product
    ///
    /// Only supplied fields change; `updated_at` is refreshed. Returns
    /// `None` when the product does not exist.
    pub async fn update_product(
        &self,
        id: i64,
        update: UpdateProduct,
    ) -> Result<Option<Product>, DbError> {
        let Some(existing) = self.get_product_by_id(id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        let merged = Product {
            id: existing.id,
            name: update.name.unwrap_or(existing.name),
            description: update.description.unwrap_or(existing.description),
            price: update.price.unwrap_or(existing.price),
            stock: update.stock.unwrap_or(existing.stock),
            category: update.category.unwrap_or(existing.category),
            images: update.images.unwrap_or(existing.images),
            sales: existing.sales,
            created_at: existing.created_at,
            updated_at: now,
        };

        let images_json = serde_json::to_string(&merged.images).unwrap_or_else(|_| "[]".to_string());

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, stock = ?, category = ?, images = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&merged.name)
        .bind(&merged.description)
        .bind(merged.price)
        .bind(merged.stock)
        .bind(&merged.category)
        .bind(&images_json)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(merged))
    }

    /// Delete a product
    pub async fn delete_product(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get product count
    pub async fn get_product_count(&self) -> Result<i64, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(result.get("count"))
    }

    /// Get aggregate catalog statistics
    pub async fn catalog_stats(&self) -> Result<CatalogStats, DbError> {
        let totals = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COALESCE(SUM(CASE WHEN stock >= 10 THEN 1 ELSE 0 END), 0) as in_stock,
                COALESCE(SUM(CASE WHEN stock > 0 AND stock < 10 THEN 1 ELSE 0 END), 0) as low_stock,
                COALESCE(SUM(CASE WHEN stock = 0 THEN 1 ELSE 0 END), 0) as out_of_stock,
                COALESCE(SUM(price * stock), 0.0) as inventory_value
            FROM products
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT category, COUNT(*) as count
            FROM products
            GROUP BY category
            ORDER BY count DESC, category ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let categories = rows
            .iter()
            .map(|row| {
                Ok(CategoryCount {
                    category: row.try_get("category")?,
                    count: row.try_get("count")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(CatalogStats {
            total_products: totals.get("total"),
            in_stock: totals.get("in_stock"),
            low_stock: totals.get("low_stock"),
            out_of_stock: totals.get("out_of_stock"),
            inventory_value: totals.get("inventory_value"),
            categories,
        })
    }
}
