use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Snapshot of one cart line at the moment of conversion. Immutable; owned
/// exclusively by its parent order.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderDetail {
  pub detail_id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub attributes: String,
  pub product_name: String,
  pub quantity: i32,
  pub unit_cost: Decimal,
}
