use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, Table};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    pub number: String,
    pub capacity: i32,
    pub floor: String,
    pub section: String,
}

/// Status and the active session are deliberately absent: they are mutated
/// only through the transition endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTableRequest {
    pub number: Option<String>,
    pub capacity: Option<i32>,
    pub floor: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckInRequest {
    pub guests: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReserveRequest {
    pub reservation_time: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub guests: Option<i32>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: Option<String>,
    pub tax: Option<i64>,
    pub service_charge: Option<i64>,
    pub discount: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableWithOrder {
    pub table: Table,
    pub order: Order,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableList {
    pub items: Vec<Table>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableStatsSummary {
    pub total_tables: i64,
    pub available_tables: i64,
    pub occupied_tables: i64,
    pub reserved_tables: i64,
    pub cleaning_tables: i64,
    pub occupancy_rate: String,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FloorStats {
    pub floor: String,
    pub total: i64,
    pub available: i64,
    pub occupied: i64,
    pub reserved: i64,
    pub avg_capacity: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SectionStats {
    pub section: String,
    pub total: i64,
    pub available: i64,
    pub occupied: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    pub summary: TableStatsSummary,
    pub by_floor: Vec<FloorStats>,
    pub by_section: Vec<SectionStats>,
}
