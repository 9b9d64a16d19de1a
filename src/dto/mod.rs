pub mod auth;
pub mod menu_items;
pub mod orders;
pub mod restaurant;
pub mod roles;
pub mod tables;
pub mod users;
