//! Order domain entity and related types.
//!
//! Line items are denormalized snapshots of the product at order time, so
//! later product edits or deletions never alter historical orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A single order line item: a product snapshot taken at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Reference to the ordered product
    pub product_id: Uuid,
    /// Product name at order time
    pub name: String,
    /// Unit price at order time
    pub price: f64,
    /// Quantity ordered
    pub quantity: i32,
    /// Image reference at order time
    pub image: String,
}

/// Order domain entity.
///
/// `payment_status` and `order_status` are stored as free-form strings;
/// the declared values live in `config::{PAYMENT_STATUSES, ORDER_STATUSES}`
/// but writes are not checked against them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub payment_status: String,
    pub order_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owning user summary joined into order detail responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderOwner {
    pub id: Uuid,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "user@example.com")]
    pub email: String,
}

/// Order response with the owning user's name and email resolved.
///
/// `user` is `None` when the owning user record no longer exists.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user: Option<OrderOwner>,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    #[schema(example = "Pending")]
    pub payment_status: String,
    #[schema(example = "Processing")]
    pub order_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderResponse {
    /// Join an order with its resolved owner.
    pub fn new(order: Order, owner: Option<OrderOwner>) -> Self {
        Self {
            id: order.id,
            user: owner,
            items: order.items,
            total_price: order.total_price,
            payment_status: order.payment_status,
            order_status: order.order_status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
