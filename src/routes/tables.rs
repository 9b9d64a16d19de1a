use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::tables::{
        CheckInRequest, CheckoutRequest, CreateTableRequest, ReserveRequest, TableList,
        TableStats, TableWithOrder, UpdateTableRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Table,
    rbac,
    response::ApiResponse,
    routes::params::TableListQuery,
    services::table_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tables).post(create_table))
        .route("/stats", get(table_stats))
        .route(
            "/{id}",
            get(get_table).put(update_table).delete(delete_table),
        )
        .route("/{id}/check-in", post(check_in))
        .route("/{id}/reserve", post(reserve_table))
        .route("/{id}/checkout", post(checkout_table))
        .route("/{id}/clean", post(clean_table))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 50"),
        ("floor" = Option<String>, Query, description = "Filter by floor"),
        ("section" = Option<String>, Query, description = "Filter by section: Main, VIP, Outdoor"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("minCapacity" = Option<i32>, Query, description = "Minimum capacity"),
        ("maxCapacity" = Option<i32>, Query, description = "Maximum capacity"),
    ),
    responses(
        (status = 200, description = "List tables", body = ApiResponse<TableList>)
    ),
    tag = "Tables"
)]
pub async fn list_tables(
    State(state): State<AppState>,
    Query(query): Query<TableListQuery>,
) -> AppResult<Json<ApiResponse<TableList>>> {
    let resp = table_service::list_tables(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/stats",
    responses(
        (status = 200, description = "Table statistics by floor, section, and summary", body = ApiResponse<TableStats>)
    ),
    tag = "Tables"
)]
pub async fn table_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TableStats>>> {
    let resp = table_service::table_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/{id}",
    params(("id" = Uuid, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Get table", body = ApiResponse<Table>),
        (status = 404, description = "Table not found"),
    ),
    tag = "Tables"
)]
pub async fn get_table(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Table>>> {
    let resp = table_service::get_table(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables",
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Table created", body = ApiResponse<Table>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn create_table(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Table>>)> {
    rbac::authorize(&state.pool, &user, "tables", "create").await?;
    let resp = table_service::create_table(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/v1/tables/{id}",
    params(("id" = Uuid, Path, description = "Table ID")),
    request_body = UpdateTableRequest,
    responses(
        (status = 200, description = "Table updated", body = ApiResponse<Table>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Table not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn update_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTableRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    rbac::authorize(&state.pool, &user, "tables", "update").await?;
    let resp = table_service::update_table(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tables/{id}",
    params(("id" = Uuid, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Table deleted"),
        (status = 400, description = "Table is occupied"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Table not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn delete_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    rbac::authorize(&state.pool, &user, "tables", "delete").await?;
    let resp = table_service::delete_table(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables/{id}/check-in",
    params(("id" = Uuid, Path, description = "Table ID")),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Table checked in, order created", body = ApiResponse<TableWithOrder>),
        (status = 400, description = "Invalid state or missing guests"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Table not found"),
        (status = 409, description = "Concurrent transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn check_in(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckInRequest>,
) -> AppResult<Json<ApiResponse<TableWithOrder>>> {
    rbac::authorize(&state.pool, &user, "tables", "check-in").await?;
    let resp = table_service::check_in(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables/{id}/reserve",
    params(("id" = Uuid, Path, description = "Table ID")),
    request_body = ReserveRequest,
    responses(
        (status = 200, description = "Table reserved", body = ApiResponse<Table>),
        (status = 400, description = "Invalid state or missing reservation details"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Table not found"),
        (status = 409, description = "Concurrent transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn reserve_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReserveRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    rbac::authorize(&state.pool, &user, "tables", "reserve").await?;
    let resp = table_service::reserve(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables/{id}/checkout",
    params(("id" = Uuid, Path, description = "Table ID")),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order completed, table moved to cleaning", body = ApiResponse<TableWithOrder>),
        (status = 400, description = "Table not occupied or invalid payment details"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Table not found"),
        (status = 409, description = "Concurrent transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn checkout_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<TableWithOrder>>> {
    rbac::authorize(&state.pool, &user, "tables", "checkout").await?;
    let resp = table_service::checkout(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables/{id}/clean",
    params(("id" = Uuid, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Table cleaned and available", body = ApiResponse<Table>),
        (status = 400, description = "Table not in cleaning or reserved status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Table not found"),
        (status = 409, description = "Concurrent transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn clean_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Table>>> {
    rbac::authorize(&state.pool, &user, "tables", "clean").await?;
    let resp = table_service::clean(&state, &user, id).await?;
    Ok(Json(resp))
}
