//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and migrations
//! - Repositories over the persistence provider

pub mod db;
pub mod repositories;
mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    OrderRepository, OrderStore, ProductRepository, ProductStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockOrderRepository, MockProductRepository, MockUserRepository};
