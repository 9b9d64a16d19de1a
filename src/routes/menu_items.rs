use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dto::menu_items::{
        CategoryStats, CreateMenuItemRequest, MenuItemList, MenuStats, MenuSummary,
        UpdateMenuItemRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{MenuItem, MENU_CATEGORIES, MENU_STATUSES},
    rbac,
    response::{ApiResponse, ListMeta},
    routes::params::MenuListQuery,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu_items).post(create_menu_item))
        .route("/stats", get(menu_stats))
        .route(
            "/{id}",
            get(get_menu_item)
                .put(update_menu_item)
                .delete(delete_menu_item),
        )
}

fn apply_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a MenuListQuery) {
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        builder.push(" AND category = ").push_bind(category);
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(popular) = query.popular {
        builder.push(" AND popular = ").push_bind(popular);
    }
    if let Some(vegetarian) = query.vegetarian {
        builder.push(" AND vegetarian = ").push_bind(vegetarian);
    }
    if let Some(spicy) = query.spicy {
        builder.push(" AND spicy = ").push_bind(spicy);
    }
    if let Some(min_price) = query.min_price {
        builder.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = query.max_price {
        builder.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/menu-items",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("popular" = Option<bool>, Query, description = "Filter by popular flag"),
        ("vegetarian" = Option<bool>, Query, description = "Filter by vegetarian flag"),
        ("spicy" = Option<bool>, Query, description = "Filter by spicy flag"),
        ("minPrice" = Option<i64>, Query, description = "Minimum price"),
        ("maxPrice" = Option<i64>, Query, description = "Maximum price"),
        ("search" = Option<String>, Query, description = "Search in name and description"),
    ),
    responses(
        (status = 200, description = "List menu items", body = ApiResponse<MenuItemList>)
    ),
    tag = "MenuItems"
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
    Query(query): Query<MenuListQuery>,
) -> AppResult<Json<ApiResponse<MenuItemList>>> {
    let (page, limit, offset) = query.pagination.normalize(20);

    let mut count_builder =
        QueryBuilder::<Postgres>::new("SELECT count(*) FROM menu_items WHERE 1=1");
    apply_filters(&mut count_builder, &query);
    let (total,): (i64,) = count_builder
        .build_query_as()
        .fetch_one(&state.pool)
        .await?;

    let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM menu_items WHERE 1=1");
    apply_filters(&mut builder, &query);
    builder.push(" ORDER BY created_at DESC");
    builder.push(" LIMIT ").push_bind(limit);
    builder.push(" OFFSET ").push_bind(offset);

    let items: Vec<MenuItem> = builder.build_query_as().fetch_all(&state.pool).await?;

    let meta = ListMeta::new(items.len() as i64, total, page, limit);
    Ok(Json(ApiResponse::list(MenuItemList { items }, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/menu-items/stats",
    responses(
        (status = 200, description = "Menu statistics by category and summary", body = ApiResponse<MenuStats>)
    ),
    tag = "MenuItems"
)]
pub async fn menu_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MenuStats>>> {
    let by_category: Vec<CategoryStats> = sqlx::query_as(
        r#"
        SELECT
            category,
            count(*) AS count,
            avg(price)::float8 AS avg_price,
            min(price) AS min_price,
            max(price) AS max_price,
            avg(rating)::float8 AS avg_rating
        FROM menu_items
        GROUP BY category
        ORDER BY count DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let (total_items, available_items, popular_items): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            count(*),
            count(*) FILTER (WHERE status = 'available'),
            count(*) FILTER (WHERE popular)
        FROM menu_items
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::data(MenuStats {
        by_category,
        summary: MenuSummary {
            total_items,
            available_items,
            popular_items,
            out_of_stock: total_items - available_items,
        },
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Get menu item", body = ApiResponse<MenuItem>),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "MenuItems"
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let item: Option<MenuItem> = sqlx::query_as("SELECT * FROM menu_items WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let item = item.ok_or_else(|| AppError::not_found("Menu item", id))?;

    Ok(Json(ApiResponse::data(item)))
}

#[utoipa::path(
    post,
    path = "/api/v1/menu-items",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = ApiResponse<MenuItem>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "MenuItems"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMenuItemRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<MenuItem>>)> {
    rbac::authorize(&state.pool, &user, "menu-items", "create").await?;

    if payload.name.trim().is_empty()
        || payload.image.trim().is_empty()
        || payload.description.trim().is_empty()
    {
        return Err(AppError::validation(
            "Please provide name, image and description",
        ));
    }
    validate_category(&payload.category)?;
    if payload.price < 0 {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let item: MenuItem = sqlx::query_as(
        r#"
        INSERT INTO menu_items
            (id, name, category, price, image, description, popular, spicy, vegetarian, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(&payload.category)
    .bind(payload.price)
    .bind(payload.image.trim())
    .bind(payload.description.trim())
    .bind(payload.popular.unwrap_or(false))
    .bind(payload.spicy.unwrap_or(false))
    .bind(payload.vegetarian.unwrap_or(false))
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Menu item created successfully", item)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = ApiResponse<MenuItem>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Menu item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "MenuItems"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    rbac::authorize(&state.pool, &user, "menu-items", "update").await?;

    if let Some(category) = &payload.category {
        validate_category(category)?;
    }
    if let Some(status) = &payload.status
        && !MENU_STATUSES.contains(&status.as_str())
    {
        return Err(AppError::validation(format!(
            "Status must be one of: {}",
            MENU_STATUSES.join(", ")
        )));
    }
    if let Some(price) = payload.price
        && price < 0
    {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let item: Option<MenuItem> = sqlx::query_as(
        r#"
        UPDATE menu_items
        SET name = COALESCE($2, name),
            category = COALESCE($3, category),
            price = COALESCE($4, price),
            image = COALESCE($5, image),
            description = COALESCE($6, description),
            status = COALESCE($7, status),
            popular = COALESCE($8, popular),
            spicy = COALESCE($9, spicy),
            vegetarian = COALESCE($10, vegetarian),
            updated_by = $11,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.category)
    .bind(payload.price)
    .bind(payload.image)
    .bind(payload.description)
    .bind(payload.status)
    .bind(payload.popular)
    .bind(payload.spicy)
    .bind(payload.vegetarian)
    .bind(user.user_id)
    .fetch_optional(&state.pool)
    .await?;
    let item = item.ok_or_else(|| AppError::not_found("Menu item", id))?;

    Ok(Json(ApiResponse::success(
        "Menu item updated successfully",
        item,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Menu item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "MenuItems"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    rbac::authorize(&state.pool, &user, "menu-items", "delete").await?;

    let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Menu item", id));
    }

    Ok(Json(ApiResponse::success(
        "Menu item deleted successfully",
        serde_json::json!({}),
    )))
}

fn validate_category(category: &str) -> AppResult<()> {
    if !MENU_CATEGORIES.contains(&category) {
        return Err(AppError::validation(format!(
            "Category must be one of: {}",
            MENU_CATEGORIES.join(", ")
        )));
    }
    Ok(())
}
