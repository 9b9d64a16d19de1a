use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::MenuItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub category: String,
    pub price: i64,
    pub image: String,
    pub description: String,
    pub popular: Option<bool>,
    pub spicy: Option<bool>,
    pub vegetarian: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub popular: Option<bool>,
    pub spicy: Option<bool>,
    pub vegetarian: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemList {
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub count: i64,
    pub avg_price: Option<f64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuSummary {
    pub total_items: i64,
    pub available_items: i64,
    pub popular_items: i64,
    pub out_of_stock: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuStats {
    pub by_category: Vec<CategoryStats>,
    pub summary: MenuSummary,
}
