use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Stock level of a product.
///
/// The wire values are fixed strings; they are also what the status path
/// segment of `PATCH /products/{id}/{status}` must match exactly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    ToSchema,
)]
pub enum StockStatus {
    #[serde(rename = "en stock")]
    #[strum(serialize = "en stock")]
    InStock,
    #[serde(rename = "petite stock")]
    #[strum(serialize = "petite stock")]
    LowStock,
    #[serde(rename = "pas en stock")]
    #[strum(serialize = "pas en stock")]
    OutOfStock,
}

impl StockStatus {
    /// Comma-separated list of accepted values, for error details.
    pub fn allowed_values() -> String {
        use strum::IntoEnumIterator;

        Self::iter()
            .map(|status| format!("'{}'", status))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn validate_product_name(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        return Err(validator::ValidationError::new("blank")
            .with_message("productName must not be blank".into()));
    }
    Ok(())
}

/// Product document as stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub product_name: String,
    pub price: f64,
    pub stock_status: StockStatus,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(custom(function = "validate_product_name"))]
    #[schema(example = "Chaise en bois")]
    pub product_name: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    #[schema(example = 49.9, minimum = 0)]
    pub price: f64,
    pub stock_status: StockStatus,
}

/// DTO for a partial update.
///
/// Has no `stockStatus` field, so a status sent in the body is dropped on
/// deserialization. Only `PATCH /products/{id}/{status}` changes it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(custom(function = "validate_product_name"))]
    pub product_name: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
}

/// Product as returned by the HTTP API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    /// 24 hex character identifier
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub product_name: String,
    pub price: f64,
    pub stock_status: StockStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body returned by a successful delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Product deleted successfully")]
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Product deleted successfully".to_string(),
        }
    }
}

/// Current time truncated to the millisecond precision BSON dates keep, so a
/// freshly built document equals the one read back from the store.
pub fn now() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

impl Product {
    /// Create a new product from a validated CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = now();
        Self {
            id: ObjectId::new(),
            product_name: input.product_name,
            price: input.price,
            stock_status: input.stock_status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateProduct DTO
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(product_name) = update.product_name {
            self.product_name = product_name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        self.updated_at = now();
    }

    pub fn set_stock_status(&mut self, status: StockStatus) {
        self.stock_status = status;
        self.updated_at = now();
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            product_name: product.product_name,
            price: product.price,
            stock_status: product.stock_status,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl CreateProduct {
    /// Trim surrounding whitespace from text fields.
    pub fn normalize(mut self) -> Self {
        self.product_name = self.product_name.trim().to_string();
        self
    }
}

impl UpdateProduct {
    /// Trim surrounding whitespace from text fields.
    pub fn normalize(mut self) -> Self {
        self.product_name = self.product_name.map(|name| name.trim().to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stock_status_wire_values() {
        assert_eq!(
            serde_json::to_value(StockStatus::InStock).unwrap(),
            json!("en stock")
        );
        assert_eq!(
            serde_json::from_value::<StockStatus>(json!("petite stock")).unwrap(),
            StockStatus::LowStock
        );
        assert_eq!(
            "pas en stock".parse::<StockStatus>().unwrap(),
            StockStatus::OutOfStock
        );
        assert_eq!(StockStatus::OutOfStock.to_string(), "pas en stock");
    }

    #[test]
    fn test_stock_status_rejects_unknown_and_case_variants() {
        assert!("unknown".parse::<StockStatus>().is_err());
        assert!("En Stock".parse::<StockStatus>().is_err());
        assert!(serde_json::from_value::<StockStatus>(json!("in_stock")).is_err());
    }

    #[test]
    fn test_allowed_values_lists_every_status() {
        assert_eq!(
            StockStatus::allowed_values(),
            "'en stock', 'petite stock', 'pas en stock'"
        );
    }

    #[test]
    fn test_create_product_validation() {
        let valid = CreateProduct {
            product_name: "Lampe".to_string(),
            price: 0.0,
            stock_status: StockStatus::InStock,
        };
        assert!(valid.validate().is_ok());

        let negative = CreateProduct {
            price: -5.0,
            ..valid.clone()
        };
        let errors = negative.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));

        let blank = CreateProduct {
            product_name: "   ".to_string(),
            ..valid
        };
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("product_name"));
    }

    #[test]
    fn test_create_product_requires_every_field() {
        let missing_status = json!({ "productName": "Lampe", "price": 10 });
        assert!(serde_json::from_value::<CreateProduct>(missing_status).is_err());

        let price_as_text = json!({ "productName": "Lampe", "price": "10", "stockStatus": "en stock" });
        assert!(serde_json::from_value::<CreateProduct>(price_as_text).is_err());
    }

    #[test]
    fn test_update_product_ignores_stock_status() {
        let update: UpdateProduct = serde_json::from_value(json!({
            "stockStatus": "pas en stock",
            "productName": "X"
        }))
        .unwrap();

        assert_eq!(
            update,
            UpdateProduct {
                product_name: Some("X".to_string()),
                price: None,
            }
        );
    }

    #[test]
    fn test_update_product_validation_skips_absent_fields() {
        assert!(UpdateProduct::default().validate().is_ok());

        let blank = UpdateProduct {
            product_name: Some(" ".to_string()),
            price: None,
        };
        assert!(blank.validate().is_err());

        let negative = UpdateProduct {
            product_name: None,
            price: Some(-0.01),
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_normalize_trims_name() {
        let input = CreateProduct {
            product_name: "  Table basse \n".to_string(),
            price: 120.0,
            stock_status: StockStatus::LowStock,
        }
        .normalize();
        assert_eq!(input.product_name, "Table basse");

        let update = UpdateProduct {
            product_name: Some(" Tabouret ".to_string()),
            price: None,
        }
        .normalize();
        assert_eq!(update.product_name.as_deref(), Some("Tabouret"));
    }

    #[test]
    fn test_apply_update_keeps_status_and_refreshes_timestamp() {
        let mut product = Product::new(CreateProduct {
            product_name: "Lampe".to_string(),
            price: 15.0,
            stock_status: StockStatus::LowStock,
        });
        let created_at = product.created_at;

        product.apply_update(UpdateProduct {
            product_name: None,
            price: Some(12.5),
        });

        assert_eq!(product.product_name, "Lampe");
        assert_eq!(product.price, 12.5);
        assert_eq!(product.stock_status, StockStatus::LowStock);
        assert_eq!(product.created_at, created_at);
        assert!(product.updated_at >= created_at);
    }

    #[test]
    fn test_product_document_round_trips_through_bson() {
        let product = Product::new(CreateProduct {
            product_name: "Lampe".to_string(),
            price: 15.0,
            stock_status: StockStatus::InStock,
        });

        let document = bson::to_document(&product).unwrap();
        assert_eq!(document.get_object_id("_id").unwrap(), product.id);
        assert_eq!(document.get_str("stockStatus").unwrap(), "en stock");
        assert!(document.get_datetime("createdAt").is_ok());

        let decoded: Product = bson::from_document(document).unwrap();
        assert_eq!(decoded, product);
    }

    #[test]
    fn test_response_uses_hex_id_and_camel_case() {
        let product = Product::new(CreateProduct {
            product_name: "Lampe".to_string(),
            price: 15.0,
            stock_status: StockStatus::InStock,
        });
        let hex = product.id.to_hex();

        let body = serde_json::to_value(ProductResponse::from(product)).unwrap();
        assert_eq!(body["id"], hex);
        assert_eq!(body["productName"], "Lampe");
        assert_eq!(body["stockStatus"], "en stock");
        assert!(body.get("createdAt").is_some());
        assert!(body.get("_id").is_none());
    }
}
