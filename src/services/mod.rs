pub mod cart;
pub mod catalog;
pub mod order_id;
pub mod orders;
pub mod stock;
pub mod users;
