//! Product Service - Business logic layer

use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, StockStatus, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Text fields are trimmed before validation, so `"  "` is rejected as a
/// blank name and `" Lamp "` is stored as `"Lamp"`.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.product_name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        let input = input.normalize();
        input.validate()?;

        self.repository.create(input).await
    }

    /// List all products, newest first
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Update name and/or price. The stock status is never touched here.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Product> {
        let input = input.normalize();
        input.validate()?;

        self.repository.update(id, input).await
    }

    /// Set the stock status from its wire value (e.g. `"en stock"`).
    #[instrument(skip(self))]
    pub async fn update_stock_status(&self, id: ObjectId, status: &str) -> ProductResult<Product> {
        let status: StockStatus = status
            .parse()
            .map_err(|_| ProductError::InvalidStockStatus(status.to_string()))?;

        self.repository.update_stock_status(id, status).await
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
