//! Order repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::order::{self, ActiveModel, Entity as OrderEntity, OrderItems};
use super::entities::user;
use crate::config::{ORDER_STATUS_PROCESSING, PAYMENT_STATUS_PENDING};
use crate::domain::{Order, OrderItem, OrderOwner};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order with default payment and order status
    async fn create(
        &self,
        user_id: Uuid,
        items: Vec<OrderItem>,
        total_price: f64,
    ) -> AppResult<Order>;

    /// Find an order with its owning user's summary joined in.
    /// The owner is `None` when the user record no longer exists.
    async fn find_with_owner(&self, id: Uuid) -> AppResult<Option<(Order, Option<OrderOwner>)>>;

    /// List all orders owned by a user, unpaginated
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Order>>;

    /// List every order with its owner summary joined in
    async fn list_all_with_owner(&self) -> AppResult<Vec<(Order, Option<OrderOwner>)>>;

    /// Overwrite an order's status with the submitted value verbatim
    async fn update_status(&self, id: Uuid, status: String) -> AppResult<Order>;
}

fn owner_summary(model: user::Model) -> OrderOwner {
    OrderOwner {
        id: model.id,
        name: model.name,
        email: model.email,
    }
}

/// Concrete implementation of OrderRepository
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn create(
        &self,
        user_id: Uuid,
        items: Vec<OrderItem>,
        total_price: f64,
    ) -> AppResult<Order> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            items: Set(OrderItems(items)),
            total_price: Set(total_price),
            payment_status: Set(PAYMENT_STATUS_PENDING.to_string()),
            order_status: Set(ORDER_STATUS_PROCESSING.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Order::from(model))
    }

    async fn find_with_owner(&self, id: Uuid) -> AppResult<Option<(Order, Option<OrderOwner>)>> {
        let result = OrderEntity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(|(order, owner)| (Order::from(order), owner.map(owner_summary))))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let models = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Order::from).collect())
    }

    async fn list_all_with_owner(&self) -> AppResult<Vec<(Order, Option<OrderOwner>)>> {
        let results = OrderEntity::find()
            .find_also_related(user::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(results
            .into_iter()
            .map(|(order, owner)| (Order::from(order), owner.map(owner_summary)))
            .collect())
    }

    async fn update_status(&self, id: Uuid, status: String) -> AppResult<Order> {
        let model = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        // No transition graph: the submitted value is stored as-is
        active.order_status = Set(status);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Order::from(model))
    }
}
