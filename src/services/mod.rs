//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, with repositories reached through the Unit of Work.

mod auth_service;
mod catalog_service;
pub mod container;
mod order_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthResponse, AuthService, Authenticator, Claims};
pub use catalog_service::{Catalog, CatalogService};
pub use order_service::{OrderDesk, OrderService};
