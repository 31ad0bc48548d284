use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
  pub customer_id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub address_1: Option<String>,
  pub address_2: Option<String>,
  pub city: Option<String>,
  pub region: Option<String>,
  pub postal_code: Option<String>,
  pub country: Option<String>,
  pub day_phone: Option<String>,
  pub eve_phone: Option<String>,
  pub mob_phone: Option<String>,
  pub created_at: DateTime<Utc>,
}
