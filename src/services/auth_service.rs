use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::auth::{
        Claims, CreateUserRequest, LoginRequest, LoginResponse, LogoutRequest, RefreshClaims,
        RefreshTokenRequest, RefreshTokenResponse,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
};

/// Joined user projection used everywhere a `User` is returned: the role
/// column carries the role name, not the id.
const USER_SELECT: &str = r#"
    SELECT u.id, u.name, u.email, u.password_hash, r.name AS role, u.is_active,
           u.shift, u.work_status, u.avatar, u.phone, u.bio, u.created_at, u.updated_at
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

pub async fn login(pool: &DbPool, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::validation("Please provide email and password"));
    }

    let user: Option<User> = sqlx::query_as(&format!("{USER_SELECT} WHERE u.email = $1"))
        .bind(email.to_lowercase())
        .fetch_optional(pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthenticated),
    };

    if !user.is_active {
        return Err(AppError::Unauthenticated);
    }

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthenticated);
    }

    let token = issue_access_token(user.id, &user.role)?;
    let refresh_token = issue_refresh_token(user.id)?;

    sqlx::query("INSERT INTO refresh_tokens (id, user_id, token) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&refresh_token)
        .execute(pool)
        .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Login successful",
        LoginResponse {
            user,
            token,
            refresh_token,
        },
    ))
}

/// Rotate a refresh token: the presented token is revoked and a fresh pair is
/// issued, all in one transaction.
pub async fn refresh_token(
    pool: &DbPool,
    payload: RefreshTokenRequest,
) -> AppResult<ApiResponse<RefreshTokenResponse>> {
    let presented = payload.refresh_token;
    if presented.trim().is_empty() {
        return Err(AppError::validation("Please provide refresh token"));
    }

    let secret = refresh_secret()?;
    let decoded = decode::<RefreshClaims>(
        &presented,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthenticated)?;
    let user_id =
        Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthenticated)?;

    let user: Option<User> = sqlx::query_as(&format!("{USER_SELECT} WHERE u.id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or_else(|| AppError::not_found("User", user_id))?;

    let mut txn = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND token = $2")
        .bind(user.id)
        .bind(&presented)
        .execute(&mut *txn)
        .await?;
    if deleted.rows_affected() == 0 {
        // Token was valid JWT but is not in the active set (already revoked).
        return Err(AppError::Unauthenticated);
    }

    let token = issue_access_token(user.id, &user.role)?;
    let new_refresh = issue_refresh_token(user.id)?;

    sqlx::query("INSERT INTO refresh_tokens (id, user_id, token) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&new_refresh)
        .execute(&mut *txn)
        .await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Token refreshed successfully",
        RefreshTokenResponse {
            token,
            refresh_token: new_refresh,
        },
    ))
}

/// Revoke one session token, or the whole active set when none is given.
pub async fn logout(
    pool: &DbPool,
    user: &AuthUser,
    payload: LogoutRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    match payload.refresh_token {
        Some(token) => {
            sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND token = $2")
                .bind(user.user_id)
                .bind(token)
                .execute(pool)
                .await?;
        }
        None => {
            sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
                .bind(user.user_id)
                .execute(pool)
                .await?;
        }
    }

    Ok(ApiResponse::success("Logout successful", serde_json::json!({})))
}

pub async fn me(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let found: Option<User> = sqlx::query_as(&format!("{USER_SELECT} WHERE u.id = $1"))
        .bind(user.user_id)
        .fetch_optional(pool)
        .await?;
    let found = found.ok_or_else(|| AppError::not_found("User", user.user_id))?;
    Ok(ApiResponse::data(found))
}

/// Admin-created accounts replace open registration.
pub async fn create_user(
    pool: &DbPool,
    actor: &AuthUser,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(AppError::validation(
            "Please provide name, email and password",
        ));
    }
    if !payload.email.contains('@') {
        return Err(AppError::validation("Please provide a valid email"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let email = payload.email.to_lowercase();
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;
    if exists.is_some() {
        return Err(AppError::validation("User already exists"));
    }

    let role_name = payload
        .role_name
        .as_deref()
        .unwrap_or("user")
        .to_lowercase();
    let role: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM roles WHERE name = $1")
        .bind(&role_name)
        .fetch_optional(pool)
        .await?;
    let (role_id,) = role
        .ok_or_else(|| AppError::NotFound(format!("Role '{role_name}' not found")))?;

    let password_hash = hash_password(&payload.password)?;
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, role_id, is_active, shift, work_status, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(id)
    .bind(payload.name.trim())
    .bind(&email)
    .bind(password_hash)
    .bind(role_id)
    .bind(payload.is_active.unwrap_or(true))
    .bind(payload.shift)
    .bind(payload.work_status)
    .bind(actor.user_id)
    .execute(pool)
    .await?;

    let user: User = sqlx::query_as(&format!("{USER_SELECT} WHERE u.id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await?;

    if let Err(err) = log_audit(
        pool,
        Some(actor.user_id),
        "user_created",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id, "role": role_name })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("User created successfully", user))
}

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub(crate) fn issue_access_token(user_id: Uuid, role: &str) -> AppResult<String> {
    let secret = access_secret()?;
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_lowercase(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn issue_refresh_token(user_id: Uuid) -> AppResult<String> {
    let secret = refresh_secret()?;
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(7))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = RefreshClaims {
        sub: user_id.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn access_secret() -> AppResult<String> {
    std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))
}

fn refresh_secret() -> AppResult<String> {
    std::env::var("JWT_REFRESH_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_REFRESH_SECRET is not set")))
}
