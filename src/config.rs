use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  /// HS256 signing secret for customer credentials.
  pub jwt_secret: String,

  // Payment processor settings
  pub payment_charge_url: String,
  pub payment_secret_key: String,
  pub payment_currency: String,
  pub payment_timeout_secs: u64,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let jwt_secret = get_env("JWT_SECRET")?;

    let payment_charge_url =
      get_env("PAYMENT_CHARGE_URL").unwrap_or_else(|_| "https://api.stripe.com/v1/charges".to_string());
    let payment_secret_key = get_env("PAYMENT_SECRET_KEY").unwrap_or_default();
    let payment_currency = get_env("PAYMENT_CURRENCY").unwrap_or_else(|_| "USD".to_string());
    let payment_timeout_secs = get_env("PAYMENT_TIMEOUT_SECS")
      .unwrap_or_else(|_| "30".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid PAYMENT_TIMEOUT_SECS: {}", e)))?;

    if payment_secret_key.is_empty() {
      tracing::warn!("PAYMENT_SECRET_KEY is not set; payment capture will be rejected upstream.");
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      jwt_secret,
      payment_charge_url,
      payment_secret_key,
      payment_currency,
      payment_timeout_secs,
    })
  }
}
