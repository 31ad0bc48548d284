use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub product_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub price: Decimal,
  /// Zero means "no discount"; precedence is applied by the pricing engine.
  pub discounted_price: Decimal,
  pub image: Option<String>,
  pub thumbnail: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
