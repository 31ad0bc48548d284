//! Storefront API: a conventional e-commerce backend.
//!
//! Customer accounts, catalog reads, a shopping cart, transactional
//! cart-to-order conversion, and third-party payment capture. HTTP handlers
//! are thin adapters over the services in [`services`]; the only multi-step
//! flow is checkout, which runs as a single unit of work so an order row can
//! never exist without its full set of line-item snapshots.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
