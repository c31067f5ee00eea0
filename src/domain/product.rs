//! Product domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier
    pub id: Uuid,
    /// Product name
    #[schema(example = "Mechanical Keyboard")]
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price, never negative
    #[schema(example = 79.99)]
    pub price: f64,
    /// Image reference (URL or asset key)
    pub image: String,
    /// Product category
    #[schema(example = "electronics")]
    pub category: String,
    /// Units in stock, never negative
    #[schema(example = 42)]
    pub stock: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
    pub stock: i32,
}

/// Partial product update.
///
/// Absent fields keep their stored value; present fields are applied as
/// given, so an explicit `0` price or empty string is a real update.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i32>,
}

/// Catalog sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    Latest,
}

impl ProductSort {
    /// Lenient parse: unrecognized keys mean "no explicit ordering" rather
    /// than an error, leaving the provider default in place.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "priceAsc" => Some(ProductSort::PriceAsc),
            "priceDesc" => Some(ProductSort::PriceDesc),
            "latest" => Some(ProductSort::Latest),
            _ => None,
        }
    }
}

/// Catalog list filters. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive name substring
    pub search: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    pub sort: Option<ProductSort>,
}
