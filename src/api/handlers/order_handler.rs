//! Order handlers.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{admin_middleware, auth_middleware, AuthSession, CurrentUser};
use crate::api::AppState;
use crate::domain::{Order, OrderItem, OrderResponse};
use crate::errors::{AppError, AppResult};
use crate::types::Created;

/// Order creation request.
///
/// The total price is stored as submitted; it is not recomputed from the
/// line items, and stock is neither checked nor decremented.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Product snapshots for each line item
    pub items: Vec<OrderItem>,
    /// Total price as computed by the client
    #[schema(example = 159.98)]
    pub total_price: f64,
}

/// Order status update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    /// New status, stored verbatim
    #[schema(example = "Shipped")]
    pub order_status: String,
}

/// Create order routes. Every route requires a bearer token; the admin
/// subset additionally passes the role gate.
pub fn order_routes(state: AppState) -> Router<AppState> {
    let authed = Router::new()
        .route("/", post(create_order).get(my_orders))
        .route("/:id", get(get_order));

    let admin = Router::new()
        .route("/admin/all", get(all_orders))
        .route("/:id/status", put(update_order_status))
        .route_layer(middleware::from_fn(admin_middleware));

    authed
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// The session user, or 401 when the record vanished after token issuance.
fn require_user(session: AuthSession) -> AppResult<CurrentUser> {
    session.user.ok_or(AppError::Unauthorized)
}

/// Create a new order for the authenticated user
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created"),
        (status = 400, description = "No items in the order"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<Created<Order>> {
    let user = require_user(session)?;

    let order = state
        .order_service
        .create_order(user.id, payload.items, payload.total_price)
        .await?;

    Ok(Created(order))
}

/// List the authenticated user's orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's orders, unpaginated"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> AppResult<Json<Vec<Order>>> {
    let user = require_user(session)?;

    let orders = state.order_service.list_my_orders(user.id).await?;

    Ok(Json(orders))
}

/// Get an order by ID with the owner's name and email joined in.
///
/// Any authenticated caller may fetch any order; there is no ownership
/// check.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with owner details"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderResponse>> {
    let order = state.order_service.get_order(id).await?;

    Ok(Json(order))
}

/// List all orders (admin only)
#[utoipa::path(
    get,
    path = "/api/orders/admin/all",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All orders with owner details"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn all_orders(State(state): State<AppState>) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders = state.order_service.list_all_orders().await?;

    Ok(Json(orders))
}

/// Update an order's status (admin only)
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated order"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .order_service
        .update_status(id, payload.order_status)
        .await?;

    Ok(Json(order))
}
