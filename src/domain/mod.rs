//! Domain layer - Core business entities.

mod order;
mod password;
mod product;
mod user;

pub use order::{Order, OrderItem, OrderOwner, OrderResponse};
pub use password::Password;
pub use product::{NewProduct, Product, ProductFilter, ProductSort, ProductUpdate};
pub use user::{User, UserResponse, UserRole};
