use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{AddItemsRequest, OrderList, OrderWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    rbac,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/items", post(add_items))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status: active, completed, cancelled"),
        ("tableId" = Option<Uuid>, Query, description = "Filter by table"),
    ),
    responses(
        (status = 200, description = "List orders", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    rbac::authorize(&state.pool, &user, "orders", "list").await?;
    let resp = order_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Get order with its line items", body = ApiResponse<OrderWithItems>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    rbac::authorize_any(&state.pool, &user, &[("orders", "read"), ("orders", "list")]).await?;
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/items",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = AddItemsRequest,
    responses(
        (status = 200, description = "Items added, totals recomputed", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Order is not active or invalid items"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order or menu item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn add_items(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddItemsRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    rbac::authorize(&state.pool, &user, "orders", "update").await?;
    let resp = order_service::add_items(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
