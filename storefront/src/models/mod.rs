// storefront/src/models/mod.rs

//! Rows of the storefront tables and the cart line snapshot.

pub mod cart_item;
pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use cart_item::CartItem;
pub use category::{Category, NewCategory};
pub use order::{NewOrder, Order, OrderStatus, OrderStatusUpdate, PaymentMethod, PaymentStatus};
pub use product::{Product, ProductDraft, ProductImage};
pub use user::AdminUser;
