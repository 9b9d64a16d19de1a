use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// API-facing models. The wire format is camelCase, matching the shape the
/// frontend consumes; database columns stay snake_case.

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,
    /// Role name, joined from the roles table.
    pub role: String,
    pub is_active: bool,
    pub shift: Option<String>,
    pub work_status: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: Uuid,
    pub resource: String,
    pub action: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub image: String,
    pub description: String,
    pub rating: f64,
    pub reviews: i32,
    pub status: String,
    pub popular: bool,
    pub spicy: bool,
    pub vegetarian: bool,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub open_time: String,
    pub close_time: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub is_active: bool,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transient occupancy/reservation sub-record on a table. Occupied-mode and
/// reservation-mode fields are never both populated.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_guests: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: Uuid,
    pub number: String,
    pub capacity: i32,
    pub floor: String,
    pub section: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_session: Option<ActiveSession>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub table_id: Uuid,
    pub table_number: String,
    pub status: String,
    pub number_of_guests: i32,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub subtotal: i64,
    pub tax: i64,
    pub service_charge: i64,
    pub discount: i64,
    pub total_amount: i64,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub served_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Option<Uuid>,
    pub name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub subtotal: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub const PAYMENT_METHODS: [&str; 4] = ["cash", "card", "e-wallet", "bank-transfer"];
pub const TABLE_SECTIONS: [&str; 3] = ["Main", "VIP", "Outdoor"];
pub const MENU_CATEGORIES: [&str; 5] = ["main", "appetizer", "special", "drink", "dessert"];
pub const MENU_STATUSES: [&str; 3] = ["available", "out_of_stock", "discontinued"];
