//! Order service - order placement, listing, and status administration.
//!
//! The submitted total price is stored as-is: line items are not re-priced
//! and stock is neither checked nor decremented here.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Order, OrderItem, OrderResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Create an order for an authenticated user. Rejects empty item lists.
    async fn create_order(
        &self,
        user_id: Uuid,
        items: Vec<OrderItem>,
        total_price: f64,
    ) -> AppResult<Order>;

    /// List the caller's orders, unpaginated
    async fn list_my_orders(&self, user_id: Uuid) -> AppResult<Vec<Order>>;

    /// Get any order by id with the owner's name and email joined in.
    /// There is no ownership check; any authenticated caller may fetch
    /// any order.
    async fn get_order(&self, id: Uuid) -> AppResult<OrderResponse>;

    /// List every order with owner details (admin)
    async fn list_all_orders(&self) -> AppResult<Vec<OrderResponse>>;

    /// Overwrite an order's status with the submitted value (admin).
    /// The value is stored verbatim; no transition graph is enforced.
    async fn update_status(&self, id: Uuid, status: String) -> AppResult<Order>;
}

/// Concrete implementation of OrderService using Unit of Work.
pub struct OrderDesk<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderDesk<U> {
    /// Create new order service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderDesk<U> {
    async fn create_order(
        &self,
        user_id: Uuid,
        items: Vec<OrderItem>,
        total_price: f64,
    ) -> AppResult<Order> {
        if items.is_empty() {
            return Err(AppError::bad_request("No items in the order"));
        }

        self.uow.orders().create(user_id, items, total_price).await
    }

    async fn list_my_orders(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        self.uow.orders().list_by_user(user_id).await
    }

    async fn get_order(&self, id: Uuid) -> AppResult<OrderResponse> {
        let (order, owner) = self.uow.orders().find_with_owner(id).await?.ok_or_not_found()?;

        Ok(OrderResponse::new(order, owner))
    }

    async fn list_all_orders(&self) -> AppResult<Vec<OrderResponse>> {
        let orders = self.uow.orders().list_all_with_owner().await?;

        Ok(orders
            .into_iter()
            .map(|(order, owner)| OrderResponse::new(order, owner))
            .collect())
    }

    async fn update_status(&self, id: Uuid, status: String) -> AppResult<Order> {
        self.uow.orders().update_status(id, status).await
    }
}
