// storefront/src/admin/mod.rs

//! Admin screens. Each board fetches its whole table, keeps the rows in
//! memory and filters locally.

pub mod dashboard;
pub mod orders;
pub mod products;

pub use dashboard::{Dashboard, DashboardStats};
pub use orders::{OrdersBoard, OrdersView, StatusTab, TabCounts};
pub use products::{CategoryReset, ProductRow, ProductsBoard, STANDARD_CATEGORIES};
