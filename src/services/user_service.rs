use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::users::{ChangePasswordRequest, UpdateUserRequest, UserList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    rbac,
    response::{ApiResponse, ListMeta},
    routes::params::Pagination,
    services::auth_service::hash_password,
};

const USER_SELECT: &str = r#"
    SELECT u.id, u.name, u.email, u.password_hash, r.name AS role, u.is_active,
           u.shift, u.work_status, u.avatar, u.phone, u.bio, u.created_at, u.updated_at
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

pub async fn list_users(pool: &DbPool, pagination: Pagination) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize(10);

    let (total,): (i64,) = sqlx::query_as("SELECT count(*) FROM users")
        .fetch_one(pool)
        .await?;

    let items: Vec<User> = sqlx::query_as(&format!(
        "{USER_SELECT} ORDER BY u.created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let meta = ListMeta::new(items.len() as i64, total, page, limit);
    Ok(ApiResponse::list(UserList { items }, meta))
}

/// Users can read their own record; anyone else needs users:read.
pub async fn get_user(pool: &DbPool, actor: &AuthUser, id: Uuid) -> AppResult<ApiResponse<User>> {
    if actor.user_id != id {
        rbac::authorize(pool, actor, "users", "read").await?;
    }

    let user: Option<User> = sqlx::query_as(&format!("{USER_SELECT} WHERE u.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or_else(|| AppError::not_found("User", id))?;

    Ok(ApiResponse::data(user))
}

/// Self-service updates touch only profile fields; updating someone else, or
/// changing a role, goes through the gate.
pub async fn update_user(
    pool: &DbPool,
    actor: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    if actor.user_id != id {
        rbac::authorize(pool, actor, "users", "update").await?;
    }

    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::not_found("User", id));
    }

    if let Some(email) = &payload.email
        && !email.contains('@')
    {
        return Err(AppError::validation("Please provide a valid email"));
    }

    let role_id: Option<Uuid> = match &payload.role {
        Some(role_name) => {
            rbac::authorize(pool, actor, "users", "update").await?;
            let role_name = role_name.to_lowercase();
            let role: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM roles WHERE name = $1")
                .bind(&role_name)
                .fetch_optional(pool)
                .await?;
            Some(
                role.ok_or_else(|| AppError::NotFound(format!("Role '{role_name}' not found")))?
                    .0,
            )
        }
        None => None,
    };

    sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            avatar = COALESCE($4, avatar),
            phone = COALESCE($5, phone),
            bio = COALESCE($6, bio),
            role_id = COALESCE($7, role_id),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.email.map(|e| e.to_lowercase()))
    .bind(payload.avatar)
    .bind(payload.phone)
    .bind(payload.bio)
    .bind(role_id)
    .execute(pool)
    .await?;

    let user: User = sqlx::query_as(&format!("{USER_SELECT} WHERE u.id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(ApiResponse::success("User updated successfully", user))
}

pub async fn delete_user(
    pool: &DbPool,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("User", id));
    }

    Ok(ApiResponse::success(
        "User deleted successfully",
        serde_json::json!({}),
    ))
}

pub async fn change_password(
    pool: &DbPool,
    actor: &AuthUser,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(AppError::validation(
            "Please provide current password and new password",
        ));
    }
    if payload.new_password.len() < 6 {
        return Err(AppError::validation(
            "New password must be at least 6 characters",
        ));
    }

    let row: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
        .bind(actor.user_id)
        .fetch_optional(pool)
        .await?;
    let (current_hash,) = row.ok_or_else(|| AppError::not_found("User", actor.user_id))?;

    let parsed_hash = PasswordHash::new(&current_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    if Argon2::default()
        .verify_password(payload.current_password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthenticated);
    }

    let new_hash = hash_password(&payload.new_password)?;
    sqlx::query(
        "UPDATE users SET password_hash = $2, password_changed_at = now(), updated_at = now() WHERE id = $1",
    )
    .bind(actor.user_id)
    .bind(new_hash)
    .execute(pool)
    .await?;

    Ok(ApiResponse::success(
        "Password changed successfully",
        serde_json::json!({}),
    ))
}
