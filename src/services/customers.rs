//! Customer accounts: registration, login verification, profile reads.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::Customer;
use crate::services::password;

const CUSTOMER_COLUMNS: &str = "customer_id, name, email, password_hash, \
       address_1, address_2, city, region, postal_code, country, \
       day_phone, eve_phone, mob_phone, created_at";

#[derive(Clone)]
pub struct CustomerService {
  pool: PgPool,
}

impl CustomerService {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Create a customer account. Field checks mirror the public contract:
  /// plausible email, password of at least 8 characters, name up to 50
  /// characters, unique email.
  #[instrument(name = "customers::register", skip(self, password))]
  pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Customer> {
    if email.is_empty() || password.len() < 8 {
      return Err(AppError::validation(
        "USR_01",
        "email, password",
        "Email or Password is invalid",
      ));
    }
    if name.is_empty() {
      return Err(AppError::validation("USR_02", "name", "The field(s) are/is required."));
    }
    if !plausible_email(email) {
      return Err(AppError::validation("USR_03", "email", "The email is invalid."));
    }
    if name.len() > 50 {
      return Err(AppError::validation("USR_07", "name", "The name is too long."));
    }

    let existing: Option<Uuid> = sqlx::query_scalar("SELECT customer_id FROM customer WHERE email = $1")
      .bind(email)
      .fetch_optional(&self.pool)
      .await?;
    if existing.is_some() {
      return Err(AppError::validation("USR_04", "email", "The email already exists."));
    }

    let customer = Customer {
      customer_id: Uuid::new_v4(),
      name: name.to_string(),
      email: email.to_string(),
      password_hash: password::hash_password(password)?,
      address_1: None,
      address_2: None,
      city: None,
      region: None,
      postal_code: None,
      country: None,
      day_phone: None,
      eve_phone: None,
      mob_phone: None,
      created_at: Utc::now(),
    };

    sqlx::query(
      "INSERT INTO customer (customer_id, name, email, password_hash, created_at) \
       VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(customer.customer_id)
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.password_hash)
    .bind(customer.created_at)
    .execute(&self.pool)
    .await?;

    info!(customer_id = %customer.customer_id, "Customer registered.");
    Ok(customer)
  }

  /// Verify a login. A wrong email and a wrong password are
  /// indistinguishable to the caller.
  #[instrument(name = "customers::verify_login", skip(self, password))]
  pub async fn verify_login(&self, email: &str, password: &str) -> Result<Customer> {
    if email.is_empty() || password.len() < 8 {
      return Err(AppError::validation(
        "USR_01",
        "email, password",
        "Email or Password is invalid",
      ));
    }

    let customer = sqlx::query_as::<_, Customer>(&format!(
      "SELECT {} FROM customer WHERE email = $1",
      CUSTOMER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(&self.pool)
    .await?
    .ok_or(AppError::InvalidLogin)?;

    if !password::verify_password(&customer.password_hash, password)? {
      return Err(AppError::InvalidLogin);
    }
    Ok(customer)
  }

  #[instrument(name = "customers::profile", skip(self))]
  pub async fn profile(&self, customer_id: Uuid) -> Result<Customer> {
    sqlx::query_as::<_, Customer>(&format!(
      "SELECT {} FROM customer WHERE customer_id = $1",
      CUSTOMER_COLUMNS
    ))
    .bind(customer_id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| AppError::not_found(format!("Customer with id {} does not exist", customer_id)))
  }
}

/// Cheap shape check: one `@`, non-empty local part, dotted domain.
fn plausible_email(email: &str) -> bool {
  match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
    }
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plausible_email_accepts_ordinary_addresses() {
    assert!(plausible_email("customer@example.com"));
    assert!(plausible_email("a.b+tag@mail.example.co"));
  }

  #[test]
  fn plausible_email_rejects_malformed_addresses() {
    assert!(!plausible_email("no-at-sign"));
    assert!(!plausible_email("@example.com"));
    assert!(!plausible_email("user@"));
    assert!(!plausible_email("user@nodot"));
    assert!(!plausible_email("user@.com"));
  }
}
