pub mod order_items;
pub mod orders;
pub mod tables;

pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use tables::Entity as Tables;
