use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    error::{AppError, AppResult},
    models::{Permission, Role},
    response::{ApiResponse, ListMeta},
};

/// Roles that ship with the system and cannot be deleted.
const PROTECTED_ROLES: [&str; 2] = ["admin", "user"];

pub async fn list_roles(pool: &DbPool) -> AppResult<ApiResponse<RoleList>> {
    let mut roles: Vec<Role> = sqlx::query_as("SELECT * FROM roles ORDER BY name")
        .fetch_all(pool)
        .await?;

    for role in &mut roles {
        role.permissions = permissions_of(pool, role.id).await?;
    }

    let count = roles.len() as i64;
    let meta = ListMeta::new(count, count, 1, count.max(1));
    Ok(ApiResponse::list(RoleList { items: roles }, meta))
}

pub async fn get_role(pool: &DbPool, id: Uuid) -> AppResult<ApiResponse<Role>> {
    let role: Option<Role> = sqlx::query_as("SELECT * FROM roles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let mut role = role.ok_or_else(|| AppError::not_found("Role", id))?;
    role.permissions = permissions_of(pool, role.id).await?;

    Ok(ApiResponse::data(role))
}

pub async fn create_role(
    pool: &DbPool,
    payload: CreateRoleRequest,
) -> AppResult<ApiResponse<Role>> {
    let name = payload.name.trim().to_lowercase();
    if name.is_empty() {
        return Err(AppError::validation("Please provide a role name"));
    }

    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM roles WHERE name = $1")
        .bind(&name)
        .fetch_optional(pool)
        .await?;
    if exists.is_some() {
        return Err(AppError::validation("Role already exists"));
    }

    let permission_ids = payload.permissions.unwrap_or_default();
    validate_permission_ids(pool, &permission_ids).await?;

    let id = Uuid::new_v4();
    let mut txn = pool.begin().await?;

    sqlx::query("INSERT INTO roles (id, name, description) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(&name)
        .bind(payload.description)
        .execute(&mut *txn)
        .await?;

    for permission_id in &permission_ids {
        sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
            .bind(id)
            .bind(permission_id)
            .execute(&mut *txn)
            .await?;
    }

    txn.commit().await?;

    let mut role: Role = sqlx::query_as("SELECT * FROM roles WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    role.permissions = permissions_of(pool, id).await?;

    Ok(ApiResponse::success("Role created successfully", role))
}

/// Updating the grant set replaces it wholesale; roles never inherit from one
/// another, so this only ever affects the one role.
pub async fn update_role(
    pool: &DbPool,
    id: Uuid,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<Role>> {
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM roles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::not_found("Role", id));
    }

    if let Some(permission_ids) = &payload.permissions {
        validate_permission_ids(pool, permission_ids).await?;
    }

    let mut txn = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE roles
        SET description = COALESCE($2, description),
            is_active = COALESCE($3, is_active)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(payload.description)
    .bind(payload.is_active)
    .execute(&mut *txn)
    .await?;

    if let Some(permission_ids) = payload.permissions {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(id)
            .execute(&mut *txn)
            .await?;
        for permission_id in permission_ids {
            sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
                .bind(id)
                .bind(permission_id)
                .execute(&mut *txn)
                .await?;
        }
    }

    txn.commit().await?;

    let mut role: Role = sqlx::query_as("SELECT * FROM roles WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    role.permissions = permissions_of(pool, id).await?;

    Ok(ApiResponse::success("Role updated successfully", role))
}

pub async fn delete_role(pool: &DbPool, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let role: Option<(String,)> = sqlx::query_as("SELECT name FROM roles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let (name,) = role.ok_or_else(|| AppError::not_found("Role", id))?;

    if PROTECTED_ROLES.contains(&name.as_str()) {
        return Err(AppError::validation("Cannot delete default system roles"));
    }

    sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(ApiResponse::success(
        "Role deleted successfully",
        serde_json::json!({}),
    ))
}

async fn permissions_of(pool: &DbPool, role_id: Uuid) -> AppResult<Vec<Permission>> {
    let permissions = sqlx::query_as(
        r#"
        SELECT p.*
        FROM permissions p
        JOIN role_permissions rp ON rp.permission_id = p.id
        WHERE rp.role_id = $1
        ORDER BY p.resource, p.action
        "#,
    )
    .bind(role_id)
    .fetch_all(pool)
    .await?;
    Ok(permissions)
}

async fn validate_permission_ids(pool: &DbPool, ids: &[Uuid]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let (found,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM permissions WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(pool)
            .await?;
    if found != ids.len() as i64 {
        return Err(AppError::validation("One or more permissions do not exist"));
    }
    Ok(())
}
