//! Business services. Handlers stay thin; everything with a decision in it
//! lives here.

pub mod cart;
pub mod customers;
pub mod orders;
pub mod password;
pub mod payment;
pub mod pricing;
pub mod products;
pub mod token;
