use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub number: String,
    pub capacity: i32,
    pub floor: String,
    pub section: String,
    pub status: String,
    pub current_guests: Option<i32>,
    pub order_id: Option<Uuid>,
    pub check_in_time: Option<DateTimeWithTimeZone>,
    pub reservation_time: Option<DateTimeWithTimeZone>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
