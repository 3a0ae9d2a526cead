pub mod dashboard;
pub mod inventory;
pub mod order;
pub mod product;
