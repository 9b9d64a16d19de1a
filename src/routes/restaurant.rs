use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::restaurant::UpdateRestaurantRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Restaurant,
    rbac,
    response::ApiResponse,
    services::restaurant_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_restaurant).put(update_restaurant))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant",
    responses(
        (status = 200, description = "Restaurant info", body = ApiResponse<Restaurant>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Restaurant not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Restaurant"
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    rbac::authorize(&state.pool, &user, "restaurant", "read").await?;
    let resp = restaurant_service::get_restaurant(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/v1/restaurant",
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant updated", body = ApiResponse<Restaurant>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Restaurant not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Restaurant"
)]
pub async fn update_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateRestaurantRequest>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    rbac::authorize(&state.pool, &user, "restaurant", "update").await?;
    let resp = restaurant_service::update_restaurant(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}
