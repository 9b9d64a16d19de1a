use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub table_id: Uuid,
    pub table_number: String,
    pub status: String,
    pub number_of_guests: i32,
    pub check_in_time: DateTimeWithTimeZone,
    pub check_out_time: Option<DateTimeWithTimeZone>,
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
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tables::Entity",
        from = "Column::TableId",
        to = "super::tables::Column::Id"
    )]
    Tables,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tables.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
