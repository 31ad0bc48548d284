// Declare handler modules
pub mod cart_handlers;
pub mod customer_handlers;
pub mod order_handlers;
pub mod payment_handlers;
pub mod product_handlers;
