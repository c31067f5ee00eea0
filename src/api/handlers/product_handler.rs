//! Product catalog handlers.

use axum::{
    extract::{Path, Query, State},
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{admin_middleware, auth_middleware};
use crate::api::AppState;
use crate::domain::{NewProduct, Product, ProductFilter, ProductSort, ProductUpdate};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse, Paginated, PaginationParams};

/// Product creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    #[schema(example = "Mechanical Keyboard")]
    pub name: String,
    #[validate(length(min = 1, message = "Product description is required"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    #[schema(example = 79.99)]
    pub price: f64,
    pub image: String,
    #[validate(length(min = 1, message = "Product category is required"))]
    #[schema(example = "electronics")]
    pub category: String,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[serde(default)]
    #[schema(example = 42)]
    pub stock: i32,
}

/// Partial product update request.
///
/// Absent fields keep their stored value; present fields are applied as
/// given, including explicit zeros and empty strings.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
}

/// Catalog listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Case-insensitive name substring
    pub search: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    /// One of `priceAsc`, `priceDesc`, `latest`; anything else is ignored
    pub sort: Option<String>,
    /// Page number, 1-indexed (default 1)
    pub page: Option<u64>,
    /// Page size (default 10)
    pub limit: Option<u64>,
}

impl ProductListQuery {
    fn into_parts(self) -> (ProductFilter, PaginationParams) {
        let pagination = PaginationParams::resolve(self.page, self.limit);
        let filter = ProductFilter {
            search: self.search,
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            sort: self.sort.as_deref().and_then(ProductSort::parse),
        };
        (filter, pagination)
    }
}

/// Create product routes: public reads, admin-gated writes
pub fn product_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product));

    // route_layer runs last-added first: identity stage, then role gate
    let admin = Router::new()
        .route("/", post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(admin)
}

/// List products with filters, sort, and pagination
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Paginated product list: {items, page, totalPages, totalCount}")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Paginated<Product>>> {
    let (filter, pagination) = query.into_parts();
    let page = state.catalog_service.list_products(filter, pagination).await?;

    Ok(Json(page))
}

/// Get a single product by ID
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let product = state.catalog_service.get_product(id).await?;

    Ok(Json(product))
}

/// Create a new product (admin only)
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Created<Product>> {
    let product = state
        .catalog_service
        .create_product(NewProduct {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            image: payload.image,
            category: payload.category,
            stock: payload.stock,
        })
        .await?;

    Ok(Created(product))
}

/// Update a product (admin only)
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let update = ProductUpdate {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        image: payload.image,
        category: payload.category,
        stock: payload.stock,
    };
    let product = state.catalog_service.update_product(id, update).await?;

    Ok(Json(product))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product removed", body = MessageResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.catalog_service.delete_product(id).await?;

    Ok(Json(MessageResponse::new("Product removed")))
}
