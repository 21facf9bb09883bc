use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, StockStatus, UpdateProduct};

/// Repository trait for Product persistence
///
/// Inputs reaching the repository have already been normalized and
/// validated by the service layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// List every product, newest first
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Get a product by ID
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// Apply a partial update and return the stored result.
    ///
    /// Fails with `ProductError::NotFound` when no product has `id`.
    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Product>;

    /// Set only the stock status and return the stored result.
    ///
    /// Fails with `ProductError::NotFound` when no product has `id`.
    async fn update_stock_status(&self, id: ObjectId, status: StockStatus)
    -> ProductResult<Product>;

    /// Delete a product by ID. Returns `false` when nothing was deleted.
    async fn delete(&self, id: ObjectId) -> ProductResult<bool>;
}
