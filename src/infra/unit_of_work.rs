//! Unit of Work - centralized repository access.
//!
//! The persistence provider is the only shared resource in the system and is
//! relied on for single-document write atomicity; no cross-entity transaction
//! machinery is layered on top.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    OrderRepository, OrderStore, ProductRepository, ProductStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get product repository
    fn products(&self) -> Arc<dyn ProductRepository>;

    /// Get order repository
    fn orders(&self) -> Arc<dyn OrderRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
    order_repo: Arc<OrderStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            product_repo: Arc::new(ProductStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }
}
