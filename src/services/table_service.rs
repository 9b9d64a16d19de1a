use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::tables::{
        CheckInRequest, CheckoutRequest, CreateTableRequest, FloorStats, ReserveRequest,
        SectionStats, TableList, TableStats, TableStatsSummary, TableWithOrder,
        UpdateTableRequest,
    },
    entity::{
        orders::{self, Entity as Orders},
        tables::{self, Column as TableCol, Entity as Tables},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ActiveSession, Table, PAYMENT_METHODS, TABLE_SECTIONS},
    response::{ApiResponse, ListMeta},
    routes::params::{SortOrder, TableListQuery},
    services::order_service::{self, ledger_totals, order_from_entity, ORDER_COMPLETED},
    state::AppState,
};

/// Table lifecycle states. Transitions go through the operations below and
/// nowhere else; the generic update endpoint cannot touch status or session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Cleaning,
}

impl TableStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Cleaning => "cleaning",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(TableStatus::Available),
            "occupied" => Some(TableStatus::Occupied),
            "reserved" => Some(TableStatus::Reserved),
            "cleaning" => Some(TableStatus::Cleaning),
            _ => None,
        }
    }

    /// A reserved table may be checked in directly, consuming the reservation.
    pub fn can_check_in(self) -> bool {
        matches!(self, TableStatus::Available | TableStatus::Reserved)
    }

    pub fn can_reserve(self) -> bool {
        matches!(self, TableStatus::Available)
    }

    pub fn can_checkout(self) -> bool {
        matches!(self, TableStatus::Occupied)
    }

    /// Cleaning a reserved table is the no-show/cancellation path.
    pub fn can_clean(self) -> bool {
        matches!(self, TableStatus::Cleaning | TableStatus::Reserved)
    }
}

fn parse_status(model: &tables::Model) -> AppResult<TableStatus> {
    TableStatus::parse(&model.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "table {} has unknown status '{}'",
            model.id,
            model.status
        ))
    })
}

pub async fn list_tables(
    state: &AppState,
    query: TableListQuery,
) -> AppResult<ApiResponse<TableList>> {
    let (page, limit, offset) = query.pagination.normalize(50);

    let mut condition = Condition::all();
    if let Some(floor) = query.floor.as_ref().filter(|f| !f.is_empty()) {
        condition = condition.add(TableCol::Floor.eq(floor.clone()));
    }
    if let Some(section) = query.section.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(TableCol::Section.eq(section.clone()));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(TableCol::Status.eq(status.clone()));
    }
    if let Some(min) = query.min_capacity {
        condition = condition.add(TableCol::Capacity.gte(min));
    }
    if let Some(max) = query.max_capacity {
        condition = condition.add(TableCol::Capacity.lte(max));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);
    let mut finder = Tables::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(TableCol::Number),
        SortOrder::Desc => finder.order_by_desc(TableCol::Number),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<Table> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(table_from_entity)
        .collect();

    let meta = ListMeta::new(items.len() as i64, total, page, limit);
    Ok(ApiResponse::list(TableList { items }, meta))
}

pub async fn get_table(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Table>> {
    let table = Tables::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Table", id))?;

    Ok(ApiResponse::data(table_from_entity(table)))
}

pub async fn create_table(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTableRequest,
) -> AppResult<ApiResponse<Table>> {
    validate_number(&payload.number)?;
    validate_capacity(payload.capacity)?;
    validate_floor(&payload.floor)?;
    validate_section(&payload.section)?;

    let exists = Tables::find()
        .filter(TableCol::Number.eq(payload.number.clone()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::validation("Table number already exists"));
    }

    let table = tables::ActiveModel {
        id: Set(Uuid::new_v4()),
        number: Set(payload.number),
        capacity: Set(payload.capacity),
        floor: Set(payload.floor),
        section: Set(payload.section),
        status: Set(TableStatus::Available.as_str().to_owned()),
        current_guests: Set(None),
        order_id: Set(None),
        check_in_time: Set(None),
        reservation_time: Set(None),
        customer_name: Set(None),
        customer_phone: Set(None),
        created_by: Set(Some(user.user_id)),
        updated_by: Set(Some(user.user_id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Table created successfully",
        table_from_entity(table),
    ))
}

pub async fn update_table(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTableRequest,
) -> AppResult<ApiResponse<Table>> {
    let table = Tables::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Table", id))?;

    if let Some(number) = &payload.number {
        validate_number(number)?;
        if *number != table.number {
            let taken = Tables::find()
                .filter(TableCol::Number.eq(number.clone()))
                .one(&state.orm)
                .await?;
            if taken.is_some() {
                return Err(AppError::validation("Table number already exists"));
            }
        }
    }
    if let Some(capacity) = payload.capacity {
        validate_capacity(capacity)?;
    }
    if let Some(floor) = &payload.floor {
        validate_floor(floor)?;
    }
    if let Some(section) = &payload.section {
        validate_section(section)?;
    }

    let mut active: tables::ActiveModel = table.into();
    if let Some(number) = payload.number {
        active.number = Set(number);
    }
    if let Some(capacity) = payload.capacity {
        active.capacity = Set(capacity);
    }
    if let Some(floor) = payload.floor {
        active.floor = Set(floor);
    }
    if let Some(section) = payload.section {
        active.section = Set(section);
    }
    active.updated_by = Set(Some(user.user_id));
    active.updated_at = Set(Utc::now().into());
    let table = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Table updated successfully",
        table_from_entity(table),
    ))
}

pub async fn delete_table(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let table = Tables::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Table", id))?;

    if parse_status(&table)? == TableStatus::Occupied {
        return Err(AppError::InvalidState(
            "Cannot delete an occupied table".into(),
        ));
    }

    Tables::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "table_deleted",
        Some("tables"),
        Some(serde_json::json!({ "table_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Table deleted successfully",
        serde_json::json!({}),
    ))
}

/// Open a table: create the order ledger for the seating and move the table
/// to occupied. The order insert and the table write share one transaction;
/// the status write is a compare-and-set against the status observed above,
/// so a concurrent transition makes this one roll back with a conflict.
pub async fn check_in(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CheckInRequest,
) -> AppResult<ApiResponse<TableWithOrder>> {
    let guests = match payload.guests {
        Some(g) if g >= 1 => g,
        _ => return Err(AppError::validation("Please provide number of guests")),
    };

    let txn = state.orm.begin().await?;

    let table = Tables::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Table", id))?;
    let observed = parse_status(&table)?;
    if !observed.can_check_in() {
        return Err(AppError::InvalidState(format!(
            "Cannot check-in: table is currently {}",
            observed.as_str()
        )));
    }

    let now: DateTimeWithTimeZone = Utc::now().into();

    let order = orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        table_id: Set(table.id),
        table_number: Set(table.number.clone()),
        status: Set(order_service::ORDER_ACTIVE.to_owned()),
        number_of_guests: Set(guests),
        check_in_time: Set(now),
        check_out_time: Set(None),
        subtotal: Set(0),
        tax: Set(0),
        service_charge: Set(0),
        discount: Set(0),
        total_amount: Set(0),
        payment_method: Set(None),
        payment_status: Set("pending".to_owned()),
        notes: Set(None),
        created_by: Set(Some(user.user_id)),
        served_by: Set(Some(user.user_id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let update = tables::ActiveModel {
        status: Set(TableStatus::Occupied.as_str().to_owned()),
        current_guests: Set(Some(guests)),
        order_id: Set(Some(order.id)),
        check_in_time: Set(Some(now)),
        reservation_time: Set(None),
        customer_name: Set(None),
        customer_phone: Set(None),
        updated_by: Set(Some(user.user_id)),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = Tables::update_many()
        .set(update)
        .filter(TableCol::Id.eq(table.id))
        .filter(TableCol::Status.eq(observed.as_str()))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Table was updated by another request, please retry".into(),
        ));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "table_check_in",
        Some("tables"),
        Some(serde_json::json!({ "table_id": id, "order_id": order.id, "guests": guests })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let table = reload_table(state, id).await?;
    Ok(ApiResponse::success(
        "Table checked in successfully",
        TableWithOrder {
            table,
            order: order_from_entity(order),
        },
    ))
}

pub async fn reserve(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ReserveRequest,
) -> AppResult<ApiResponse<Table>> {
    let (reservation_time, customer_name, customer_phone) = match (
        payload.reservation_time,
        payload.customer_name.filter(|n| !n.trim().is_empty()),
        payload.customer_phone.filter(|p| !p.trim().is_empty()),
    ) {
        (Some(t), Some(n), Some(p)) => (t, n, p),
        _ => {
            return Err(AppError::validation(
                "Please provide reservation time, customer name, and phone number",
            ));
        }
    };
    if let Some(g) = payload.guests
        && g < 1
    {
        return Err(AppError::validation("Number of guests must be at least 1"));
    }

    let txn = state.orm.begin().await?;

    let table = Tables::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Table", id))?;
    let observed = parse_status(&table)?;
    if !observed.can_reserve() {
        return Err(AppError::InvalidState(format!(
            "Table is currently {}",
            observed.as_str()
        )));
    }

    let guests = payload.guests.unwrap_or(table.capacity);
    let now: DateTimeWithTimeZone = Utc::now().into();

    let update = tables::ActiveModel {
        status: Set(TableStatus::Reserved.as_str().to_owned()),
        current_guests: Set(Some(guests)),
        order_id: Set(None),
        check_in_time: Set(None),
        reservation_time: Set(Some(reservation_time.into())),
        customer_name: Set(Some(customer_name)),
        customer_phone: Set(Some(customer_phone)),
        updated_by: Set(Some(user.user_id)),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = Tables::update_many()
        .set(update)
        .filter(TableCol::Id.eq(table.id))
        .filter(TableCol::Status.eq(observed.as_str()))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Table was updated by another request, please retry".into(),
        ));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "table_reserved",
        Some("tables"),
        Some(serde_json::json!({ "table_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let table = reload_table(state, id).await?;
    Ok(ApiResponse::success("Table reserved successfully", table))
}

/// Close the seating: complete and pay the referenced order, recompute its
/// totals, and move the table to cleaning. The session's order reference
/// stays set until `clean` wipes the whole session.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<TableWithOrder>> {
    if let Some(method) = &payload.payment_method
        && !PAYMENT_METHODS.contains(&method.as_str())
    {
        return Err(AppError::validation(format!(
            "Payment method must be one of: {}",
            PAYMENT_METHODS.join(", ")
        )));
    }
    for (label, value) in [
        ("Tax", payload.tax),
        ("Service charge", payload.service_charge),
        ("Discount", payload.discount),
    ] {
        if let Some(v) = value
            && v < 0
        {
            return Err(AppError::validation(format!("{label} cannot be negative")));
        }
    }

    let txn = state.orm.begin().await?;

    let table = Tables::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Table", id))?;
    let observed = parse_status(&table)?;
    if !observed.can_checkout() {
        return Err(AppError::InvalidState(
            "Table is not currently occupied".into(),
        ));
    }
    let order_id = table.order_id.ok_or_else(|| {
        AppError::InvalidState("No active order found for this table".into())
    })?;

    let order = Orders::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            AppError::InvalidState("No active order found for this table".into())
        })?;

    let items = crate::entity::OrderItems::find()
        .filter(crate::entity::order_items::Column::OrderId.eq(order.id))
        .all(&txn)
        .await?;

    let tax = payload.tax.unwrap_or(order.tax);
    let service_charge = payload.service_charge.unwrap_or(order.service_charge);
    let discount = payload.discount.unwrap_or(order.discount);
    let (subtotal, total) = ledger_totals(&items, tax, service_charge, discount);
    if total < 0 {
        return Err(AppError::validation("Discount exceeds the order total"));
    }

    let now: DateTimeWithTimeZone = Utc::now().into();

    let mut active: orders::ActiveModel = order.into();
    active.status = Set(ORDER_COMPLETED.to_owned());
    active.check_out_time = Set(Some(now));
    active.payment_method = Set(Some(
        payload.payment_method.unwrap_or_else(|| "cash".to_owned()),
    ));
    active.payment_status = Set("paid".to_owned());
    active.subtotal = Set(subtotal);
    active.tax = Set(tax);
    active.service_charge = Set(service_charge);
    active.discount = Set(discount);
    active.total_amount = Set(total);
    active.updated_at = Set(now);
    let order = active.update(&txn).await?;

    let update = tables::ActiveModel {
        status: Set(TableStatus::Cleaning.as_str().to_owned()),
        updated_by: Set(Some(user.user_id)),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = Tables::update_many()
        .set(update)
        .filter(TableCol::Id.eq(table.id))
        .filter(TableCol::Status.eq(observed.as_str()))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Table was updated by another request, please retry".into(),
        ));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "table_checkout",
        Some("tables"),
        Some(serde_json::json!({ "table_id": id, "order_id": order.id, "total": order.total_amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let table = reload_table(state, id).await?;
    Ok(ApiResponse::success(
        "Table checked out successfully",
        TableWithOrder {
            table,
            order: order_from_entity(order),
        },
    ))
}

/// Return the table to available, wiping the whole active session. Reached
/// from cleaning after checkout, or straight from reserved on a no-show.
pub async fn clean(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Table>> {
    let txn = state.orm.begin().await?;

    let table = Tables::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Table", id))?;
    let observed = parse_status(&table)?;
    if !observed.can_clean() {
        return Err(AppError::InvalidState(format!(
            "Table must be in cleaning or reserved status. Current status: {}",
            observed.as_str()
        )));
    }

    let update = tables::ActiveModel {
        status: Set(TableStatus::Available.as_str().to_owned()),
        current_guests: Set(None),
        order_id: Set(None),
        check_in_time: Set(None),
        reservation_time: Set(None),
        customer_name: Set(None),
        customer_phone: Set(None),
        updated_by: Set(Some(user.user_id)),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let result = Tables::update_many()
        .set(update)
        .filter(TableCol::Id.eq(table.id))
        .filter(TableCol::Status.eq(observed.as_str()))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Table was updated by another request, please retry".into(),
        ));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "table_cleaned",
        Some("tables"),
        Some(serde_json::json!({ "table_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let table = reload_table(state, id).await?;
    Ok(ApiResponse::success("Table cleaned and now available", table))
}

pub async fn table_stats(state: &AppState) -> AppResult<ApiResponse<TableStats>> {
    let (total, available, occupied, reserved, cleaning): (i64, i64, i64, i64, i64) =
        sqlx::query_as(
            r#"
            SELECT
                count(*),
                count(*) FILTER (WHERE status = 'available'),
                count(*) FILTER (WHERE status = 'occupied'),
                count(*) FILTER (WHERE status = 'reserved'),
                count(*) FILTER (WHERE status = 'cleaning')
            FROM tables
            "#,
        )
        .fetch_one(&state.pool)
        .await?;

    let by_floor: Vec<FloorStats> = sqlx::query_as(
        r#"
        SELECT
            floor,
            count(*) AS total,
            count(*) FILTER (WHERE status = 'available') AS available,
            count(*) FILTER (WHERE status = 'occupied') AS occupied,
            count(*) FILTER (WHERE status = 'reserved') AS reserved,
            avg(capacity)::float8 AS avg_capacity
        FROM tables
        GROUP BY floor
        ORDER BY floor
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let by_section: Vec<SectionStats> = sqlx::query_as(
        r#"
        SELECT
            section,
            count(*) AS total,
            count(*) FILTER (WHERE status = 'available') AS available,
            count(*) FILTER (WHERE status = 'occupied') AS occupied
        FROM tables
        GROUP BY section
        ORDER BY total DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let occupancy_rate = if total > 0 {
        format!("{:.2}%", occupied as f64 / total as f64 * 100.0)
    } else {
        "0%".to_string()
    };

    Ok(ApiResponse::data(TableStats {
        summary: TableStatsSummary {
            total_tables: total,
            available_tables: available,
            occupied_tables: occupied,
            reserved_tables: reserved,
            cleaning_tables: cleaning,
            occupancy_rate,
        },
        by_floor,
        by_section,
    }))
}

async fn reload_table(state: &AppState, id: Uuid) -> AppResult<Table> {
    let table = Tables::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Table", id))?;
    Ok(table_from_entity(table))
}

pub(crate) fn table_from_entity(model: tables::Model) -> Table {
    let has_session = model.current_guests.is_some()
        || model.order_id.is_some()
        || model.check_in_time.is_some()
        || model.reservation_time.is_some()
        || model.customer_name.is_some()
        || model.customer_phone.is_some();

    let active_session = if has_session {
        Some(ActiveSession {
            current_guests: model.current_guests,
            order_id: model.order_id,
            check_in_time: model.check_in_time.map(|dt| dt.with_timezone(&Utc)),
            reservation_time: model.reservation_time.map(|dt| dt.with_timezone(&Utc)),
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
        })
    } else {
        None
    };

    Table {
        id: model.id,
        number: model.number,
        capacity: model.capacity,
        floor: model.floor,
        section: model.section,
        status: model.status,
        active_session,
        created_by: model.created_by,
        updated_by: model.updated_by,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn validate_number(number: &str) -> AppResult<()> {
    if number.trim().is_empty() {
        return Err(AppError::validation("Please provide a table number"));
    }
    if number.len() > 10 {
        return Err(AppError::validation(
            "Table number cannot be more than 10 characters",
        ));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> AppResult<()> {
    if !(1..=20).contains(&capacity) {
        return Err(AppError::validation("Capacity must be between 1 and 20"));
    }
    Ok(())
}

fn validate_floor(floor: &str) -> AppResult<()> {
    if floor.trim().is_empty() {
        return Err(AppError::validation("Please provide floor information"));
    }
    if floor.len() > 50 {
        return Err(AppError::validation(
            "Floor name cannot be more than 50 characters",
        ));
    }
    Ok(())
}

fn validate_section(section: &str) -> AppResult<()> {
    if !TABLE_SECTIONS.contains(&section) {
        return Err(AppError::validation(format!(
            "Section must be one of: {}",
            TABLE_SECTIONS.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_preconditions_match_the_lifecycle() {
        use TableStatus::*;

        assert!(Available.can_check_in());
        assert!(Reserved.can_check_in());
        assert!(!Occupied.can_check_in());
        assert!(!Cleaning.can_check_in());

        assert!(Available.can_reserve());
        assert!(!Reserved.can_reserve());
        assert!(!Occupied.can_reserve());
        assert!(!Cleaning.can_reserve());

        assert!(Occupied.can_checkout());
        assert!(!Available.can_checkout());
        assert!(!Reserved.can_checkout());
        assert!(!Cleaning.can_checkout());

        assert!(Cleaning.can_clean());
        assert!(Reserved.can_clean());
        assert!(!Available.can_clean());
        assert!(!Occupied.can_clean());
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            TableStatus::Available,
            TableStatus::Occupied,
            TableStatus::Reserved,
            TableStatus::Cleaning,
        ] {
            assert_eq!(TableStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TableStatus::parse("closed"), None);
    }

    #[test]
    fn config_validation_bounds() {
        assert!(validate_capacity(1).is_ok());
        assert!(validate_capacity(20).is_ok());
        assert!(validate_capacity(0).is_err());
        assert!(validate_capacity(21).is_err());
        assert!(validate_section("VIP").is_ok());
        assert!(validate_section("Patio").is_err());
        assert!(validate_number("T-12").is_ok());
        assert!(validate_number("").is_err());
        assert!(validate_number("12345678901").is_err());
    }
}
