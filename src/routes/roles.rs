use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Role,
    rbac,
    response::ApiResponse,
    services::role_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route(
            "/{id}",
            get(get_role).put(update_role).delete(delete_role),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/roles",
    responses(
        (status = 200, description = "List roles with their permissions", body = ApiResponse<RoleList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn list_roles(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RoleList>>> {
    rbac::authorize(&state.pool, &user, "roles", "list").await?;
    let resp = role_service::list_roles(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Get role", body = ApiResponse<Role>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn get_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Role>>> {
    rbac::authorize(&state.pool, &user, "roles", "read").await?;
    let resp = role_service::get_role(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = ApiResponse<Role>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn create_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Role>>)> {
    rbac::authorize(&state.pool, &user, "roles", "create").await?;
    let resp = role_service::create_role(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    params(("id" = Uuid, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<Role>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<Role>>> {
    rbac::authorize(&state.pool, &user, "roles", "update").await?;
    let resp = role_service::update_role(&state.pool, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted"),
        (status = 400, description = "Cannot delete default roles"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn delete_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    rbac::authorize(&state.pool, &user, "roles", "delete").await?;
    let resp = role_service::delete_role(&state.pool, id).await?;
    Ok(Json(resp))
}
