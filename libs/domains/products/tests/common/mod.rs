//! In-memory repository and request helpers shared by the handler tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bson::oid::ObjectId;
use domain_products::{
    handlers, CreateProduct, Product, ProductError, ProductRepository, ProductResult,
    ProductService, StockStatus, UpdateProduct,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Repository backed by a Vec, counting every call that reaches it.
///
/// Clones share the same store.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<Mutex<Vec<Product>>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryProductRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn modify(
        &self,
        id: ObjectId,
        change: impl FnOnce(&mut Product),
    ) -> ProductResult<Product> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProductError::NotFound(id))?;
        change(product);
        Ok(product.clone())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        self.touch();
        let product = Product::new(input);
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        self.touch();
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(products)
    }

    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        self.touch();
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Product> {
        self.touch();
        self.modify(id, |product| product.apply_update(input))
    }

    async fn update_stock_status(
        &self,
        id: ObjectId,
        status: StockStatus,
    ) -> ProductResult<Product> {
        self.touch();
        self.modify(id, |product| product.set_stock_status(status))
    }

    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        self.touch();
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

/// Repository whose every operation fails like an unreachable server.
pub struct UnavailableRepository;

fn unavailable<T>() -> ProductResult<T> {
    Err(ProductError::Database(
        "Server selection timeout: No available servers, mongodb://10.0.0.7:27017".to_string(),
    ))
}

#[async_trait]
impl ProductRepository for UnavailableRepository {
    async fn create(&self, _input: CreateProduct) -> ProductResult<Product> {
        unavailable()
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        unavailable()
    }

    async fn get_by_id(&self, _id: ObjectId) -> ProductResult<Option<Product>> {
        unavailable()
    }

    async fn update(&self, _id: ObjectId, _input: UpdateProduct) -> ProductResult<Product> {
        unavailable()
    }

    async fn update_stock_status(
        &self,
        _id: ObjectId,
        _status: StockStatus,
    ) -> ProductResult<Product> {
        unavailable()
    }

    async fn delete(&self, _id: ObjectId) -> ProductResult<bool> {
        unavailable()
    }
}

/// The products router mounted the way the binary mounts it.
pub fn app<R: ProductRepository + 'static>(repository: R) -> Router {
    Router::new().nest("/products", handlers::router(ProductService::new(repository)))
}

/// Router over a fresh in-memory store, plus a handle to inspect it.
pub fn in_memory_app() -> (Router, InMemoryProductRepository) {
    let repository = InMemoryProductRepository::default();
    (app(repository.clone()), repository)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn create(app: &Router, name: &str, price: f64, status: &str) -> Value {
    let (code, body) = send(
        app,
        Method::POST,
        "/products",
        Some(serde_json::json!({
            "productName": name,
            "price": price,
            "stockStatus": status,
        })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "create failed: {body}");
    body
}
