use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod doc;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod params;
pub mod permissions;
pub mod restaurant;
pub mod roles;
pub mod tables;
pub mod users;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/permissions", permissions::router())
        .nest("/menu-items", menu_items::router())
        .nest("/tables", tables::router())
        .nest("/orders", orders::router())
        .nest("/restaurant", restaurant::router())
}
