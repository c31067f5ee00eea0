//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, order_handler, product_handler};
use crate::domain::{OrderItem, OrderOwner, OrderResponse, Product, UserResponse, UserRole};
use crate::services::AuthResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Retail API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Retail API",
        version = "0.1.0",
        description = "E-commerce backend with JWT auth, product catalog, and orders",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::profile,
        // Product endpoints
        product_handler::list_products,
        product_handler::get_product,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        // Order endpoints
        order_handler::create_order,
        order_handler::my_orders,
        order_handler::get_order,
        order_handler::all_orders,
        order_handler::update_order_status,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            Product,
            OrderItem,
            OrderOwner,
            OrderResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            AuthResponse,
            // Product handler types
            product_handler::CreateProductRequest,
            product_handler::UpdateProductRequest,
            // Order handler types
            order_handler::CreateOrderRequest,
            order_handler::UpdateOrderStatusRequest,
            // Common responses
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration, login, and profile"),
        (name = "Products", description = "Product catalog browsing and management"),
        (name = "Orders", description = "Order placement and fulfillment")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
