use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{AddItemsRequest, OrderList, OrderWithItems},
    entity::{
        order_items::{self, Column as OrderItemCol, Entity as OrderItems},
        orders::{self, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{MenuItem, Order, OrderItem},
    response::{ApiResponse, ListMeta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub const ORDER_ACTIVE: &str = "active";
pub const ORDER_COMPLETED: &str = "completed";

/// Ledger arithmetic over stored line items. Item subtotals are trusted as
/// written at add time; the result is not clamped — a discount larger than
/// the rest of the bill yields a negative total, which the boundary rejects.
pub fn ledger_totals(
    items: &[order_items::Model],
    tax: i64,
    service_charge: i64,
    discount: i64,
) -> (i64, i64) {
    let subtotal: i64 = items.iter().map(|item| item.subtotal).sum();
    let total = subtotal + tax + service_charge - discount;
    (subtotal, total)
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize(20);

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }
    if let Some(table_id) = query.table_id {
        condition = condition.add(OrderCol::TableId.eq(table_id));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CheckInTime),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CheckInTime),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<Order> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = ListMeta::new(items.len() as i64, total, page, limit);
    Ok(ApiResponse::list(OrderList { items }, meta))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order", id))?;

    let items = load_items(&state.orm, order.id).await?;

    Ok(ApiResponse::data(OrderWithItems {
        order: order_from_entity(order),
        items,
    }))
}

pub async fn add_items(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AddItemsRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.items.is_empty() {
        return Err(AppError::validation("Please provide at least one item"));
    }
    for item in &payload.items {
        if item.quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }
    }

    let txn = state.orm.begin().await?;

    // Lock the order row so concurrent item additions serialize and the
    // recomputed totals cannot go stale.
    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Order", id))?;

    if order.status != ORDER_ACTIVE {
        return Err(AppError::InvalidState(format!(
            "Cannot add items to a {} order",
            order.status
        )));
    }

    let mut position = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .count(&txn)
        .await? as i32;

    for item in &payload.items {
        let menu_item: Option<MenuItem> =
            sqlx::query_as("SELECT * FROM menu_items WHERE id = $1")
                .bind(item.menu_item_id)
                .fetch_optional(&state.pool)
                .await?;
        let menu_item =
            menu_item.ok_or_else(|| AppError::not_found("Menu item", item.menu_item_id))?;
        if menu_item.status != "available" {
            return Err(AppError::validation(format!(
                "Menu item '{}' is not available",
                menu_item.name
            )));
        }

        // Snapshot name and price; the subtotal is fixed at add time.
        order_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(Some(menu_item.id)),
            name: Set(menu_item.name.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(menu_item.price),
            subtotal: Set(menu_item.price * item.quantity as i64),
            notes: Set(item.notes.clone()),
            position: Set(position),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        position += 1;
    }

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::Position)
        .all(&txn)
        .await?;

    let (subtotal, total) = ledger_totals(&items, order.tax, order.service_charge, order.discount);

    let mut active: orders::ActiveModel = order.into();
    active.subtotal = Set(subtotal);
    active.total_amount = Set(total);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_items_added",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "count": payload.items.len() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let items = items.into_iter().map(order_item_from_entity).collect();
    Ok(ApiResponse::success(
        "Items added to order",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
    ))
}

pub(crate) async fn load_items(
    conn: &crate::db::OrmConn,
    order_id: Uuid,
) -> AppResult<Vec<OrderItem>> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::Position)
        .all(conn)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();
    Ok(items)
}

pub(crate) fn order_from_entity(model: orders::Model) -> Order {
    Order {
        id: model.id,
        table_id: model.table_id,
        table_number: model.table_number,
        status: model.status,
        number_of_guests: model.number_of_guests,
        check_in_time: model.check_in_time.with_timezone(&Utc),
        check_out_time: model.check_out_time.map(|dt| dt.with_timezone(&Utc)),
        subtotal: model.subtotal,
        tax: model.tax,
        service_charge: model.service_charge,
        discount: model.discount,
        total_amount: model.total_amount,
        payment_method: model.payment_method,
        payment_status: model.payment_status,
        notes: model.notes,
        created_by: model.created_by,
        served_by: model.served_by,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn order_item_from_entity(model: order_items::Model) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        menu_item_id: model.menu_item_id,
        name: model.name,
        quantity: model.quantity,
        unit_price: model.unit_price,
        subtotal: model.subtotal,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::prelude::DateTimeWithTimeZone;

    fn item(subtotal: i64) -> order_items::Model {
        order_items::Model {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            menu_item_id: None,
            name: "item".into(),
            quantity: 1,
            unit_price: subtotal,
            subtotal,
            notes: None,
            position: 0,
            created_at: DateTimeWithTimeZone::from(Utc::now()),
        }
    }

    #[test]
    fn totals_sum_items_and_charges() {
        let items = vec![item(120_000), item(45_000), item(5_000)];
        let (subtotal, total) = ledger_totals(&items, 10_000, 5_000, 2_000);
        assert_eq!(subtotal, 170_000);
        assert_eq!(total, 170_000 + 10_000 + 5_000 - 2_000);
    }

    #[test]
    fn totals_trust_stored_item_subtotals() {
        // A stale quantity/price pair is not rederived here.
        let mut odd = item(999);
        odd.quantity = 3;
        odd.unit_price = 100;
        let (subtotal, _) = ledger_totals(&[odd], 0, 0, 0);
        assert_eq!(subtotal, 999);
    }

    #[test]
    fn oversized_discount_goes_negative_without_clamping() {
        let items = vec![item(10_000)];
        let (_, total) = ledger_totals(&items, 1_000, 0, 50_000);
        assert_eq!(total, -39_000);
    }

    #[test]
    fn empty_ledger_is_all_charges() {
        let (subtotal, total) = ledger_totals(&[], 1_000, 500, 0);
        assert_eq!(subtotal, 0);
        assert_eq!(total, 1_500);
    }
}
