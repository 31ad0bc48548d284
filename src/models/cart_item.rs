use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize}; // Deserialize for request body
use sqlx::FromRow;
use uuid::Uuid;

/// One pre-checkout line, keyed by a client-generated opaque `cart_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
  pub item_id: Uuid,
  pub cart_id: String,
  pub product_id: Uuid,
  /// Free-form selection, e.g. "LG, Red".
  pub attributes: String,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}

/// A cart line joined with its current product row, as read from the store.
#[derive(Debug, Clone, FromRow)]
pub struct CartItemWithProduct {
  pub item_id: Uuid,
  pub cart_id: String,
  pub product_id: Uuid,
  pub name: String,
  pub image: Option<String>,
  pub price: Decimal,
  pub discounted_price: Decimal,
  pub attributes: String,
  pub quantity: i32,
}

/// Cart display line: product snapshot plus the computed, rounded subtotal.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
  pub item_id: Uuid,
  pub cart_id: String,
  pub name: String,
  pub attributes: String,
  pub product_id: Uuid,
  pub image: Option<String>,
  pub price: Decimal,
  pub discounted_price: Decimal,
  pub quantity: i32,
  pub subtotal: Decimal,
}
