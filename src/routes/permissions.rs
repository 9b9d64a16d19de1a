use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::roles::{CreatePermissionRequest, PermissionList, UpdatePermissionRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Permission,
    rbac,
    response::{ApiResponse, ListMeta},
    routes::params::Pagination,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_permissions).post(create_permission))
        .route(
            "/{id}",
            get(get_permission)
                .put(update_permission)
                .delete(delete_permission),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/permissions",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 50"),
    ),
    responses(
        (status = 200, description = "List permissions", body = ApiResponse<PermissionList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
pub async fn list_permissions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PermissionList>>> {
    rbac::authorize(&state.pool, &user, "permissions", "list").await?;
    let (page, limit, offset) = pagination.normalize(50);

    let (total,): (i64,) = sqlx::query_as("SELECT count(*) FROM permissions")
        .fetch_one(&state.pool)
        .await?;

    let items: Vec<Permission> = sqlx::query_as(
        "SELECT * FROM permissions ORDER BY resource, action LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let meta = ListMeta::new(items.len() as i64, total, page, limit);
    Ok(Json(ApiResponse::list(PermissionList { items }, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/permissions/{id}",
    params(("id" = Uuid, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Get permission", body = ApiResponse<Permission>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Permission not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
pub async fn get_permission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Permission>>> {
    rbac::authorize(&state.pool, &user, "permissions", "read").await?;

    let permission: Option<Permission> =
        sqlx::query_as("SELECT * FROM permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?;
    let permission = permission.ok_or_else(|| AppError::not_found("Permission", id))?;

    Ok(Json(ApiResponse::data(permission)))
}

#[utoipa::path(
    post,
    path = "/api/v1/permissions",
    request_body = CreatePermissionRequest,
    responses(
        (status = 201, description = "Permission created", body = ApiResponse<Permission>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
pub async fn create_permission(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePermissionRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Permission>>)> {
    rbac::authorize(&state.pool, &user, "permissions", "create").await?;

    let resource = payload.resource.trim().to_lowercase();
    let action = payload.action.trim().to_lowercase();
    if resource.is_empty() || action.is_empty() {
        return Err(AppError::validation("Please provide resource and action"));
    }

    let exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM permissions WHERE resource = $1 AND action = $2")
            .bind(&resource)
            .bind(&action)
            .fetch_optional(&state.pool)
            .await?;
    if exists.is_some() {
        return Err(AppError::validation("Permission already exists"));
    }

    let permission: Permission = sqlx::query_as(
        r#"
        INSERT INTO permissions (id, resource, action, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(resource)
    .bind(action)
    .bind(payload.description)
    .fetch_one(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Permission created successfully",
            permission,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/permissions/{id}",
    params(("id" = Uuid, Path, description = "Permission ID")),
    request_body = UpdatePermissionRequest,
    responses(
        (status = 200, description = "Permission updated", body = ApiResponse<Permission>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Permission not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
pub async fn update_permission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePermissionRequest>,
) -> AppResult<Json<ApiResponse<Permission>>> {
    rbac::authorize(&state.pool, &user, "permissions", "update").await?;

    let permission: Option<Permission> = sqlx::query_as(
        r#"
        UPDATE permissions
        SET resource = COALESCE($2, resource),
            action = COALESCE($3, action),
            description = COALESCE($4, description)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.resource.map(|r| r.to_lowercase()))
    .bind(payload.action.map(|a| a.to_lowercase()))
    .bind(payload.description)
    .fetch_optional(&state.pool)
    .await?;
    let permission = permission.ok_or_else(|| AppError::not_found("Permission", id))?;

    Ok(Json(ApiResponse::success(
        "Permission updated successfully",
        permission,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/permissions/{id}",
    params(("id" = Uuid, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Permission deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Permission not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Permissions"
)]
pub async fn delete_permission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    rbac::authorize(&state.pool, &user, "permissions", "delete").await?;

    let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Permission", id));
    }

    Ok(Json(ApiResponse::success(
        "Permission deleted successfully",
        serde_json::json!({}),
    )))
}
