//! Contains data structures representing database entities.

pub mod cart_item;
pub mod customer;
pub mod order;
pub mod order_detail;
pub mod product;

// Re-export the model structs for convenient access
pub use cart_item::{CartItem, CartItemWithProduct, CartLineView};
pub use customer::Customer;
pub use order::{Order, OrderMeta, OrderStatus, OrderWithDetails};
pub use order_detail::OrderDetail;
pub use product::Product;
