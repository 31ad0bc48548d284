use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

use crate::models::order_detail::OrderDetail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Created,
  Paid,
}

/// Immutable record of a completed checkout. `total_amount` is fixed at
/// creation time; later catalog price changes never alter it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub order_id: Uuid,
  pub customer_id: Uuid,
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub shipping_address: Option<String>,
  pub shipping_city: Option<String>,
  pub shipping_region: Option<String>,
  pub shipping_postal_code: Option<String>,
  pub shipping_country: Option<String>,
  pub comments: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Pass-through shipping/contact metadata supplied with a checkout request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderMeta {
  pub shipping_address: Option<String>,
  pub shipping_city: Option<String>,
  pub shipping_region: Option<String>,
  pub shipping_postal_code: Option<String>,
  pub shipping_country: Option<String>,
  pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWithDetails {
  #[serde(flatten)]
  pub order: Order,
  pub order_items: Vec<OrderDetail>,
}
