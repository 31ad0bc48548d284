//! Payment capture adapter.
//!
//! The charge amount is always derived from the persisted order total,
//! never from request fields, and is expressed in integer minor-currency
//! units. Transport failures and processor rejections are reported without
//! touching order state.

use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::Order;

#[derive(Clone)]
pub struct PaymentGateway {
  http: Client,
  charge_url: String,
  secret_key: String,
  currency: String,
}

impl PaymentGateway {
  pub fn new(config: &AppConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(Duration::from_secs(config.payment_timeout_secs))
      .build()
      .map_err(|e| AppError::Config(format!("Failed to build payment HTTP client: {}", e)))?;

    Ok(Self {
      http,
      charge_url: config.payment_charge_url.clone(),
      secret_key: config.payment_secret_key.clone(),
      currency: config.payment_currency.clone(),
    })
  }

  /// Convert a decimal order total to integer minor units (e.g. cents):
  /// multiply by 100 and round to the nearest integer.
  pub fn minor_units(total_amount: Decimal) -> Result<i64> {
    (total_amount * Decimal::from(100))
      .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
      .to_i64()
      .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order total out of range for minor units")))
  }

  /// Capture payment for an order. The amount comes from the persisted
  /// order row the caller re-fetched; the processor's JSON response is
  /// passed through on success.
  #[instrument(name = "payment::charge", skip(self, order, payment_token), fields(order_id = %order.order_id))]
  pub async fn charge(&self, order: &Order, email: &str, payment_token: &str) -> Result<serde_json::Value> {
    let amount = Self::minor_units(order.total_amount)?;
    let order_id = order.order_id.to_string();
    info!(amount, currency = %self.currency, "Submitting charge to payment processor.");

    let amount_str = amount.to_string();
    let form = [
      ("amount", amount_str.as_str()),
      ("currency", self.currency.as_str()),
      ("source", payment_token),
      ("metadata[order_id]", order_id.as_str()),
      ("metadata[email]", email),
    ];

    let response = self
      .http
      .post(&self.charge_url)
      .bearer_auth(&self.secret_key)
      .form(&form)
      .send()
      .await
      .map_err(|e| {
        if e.is_timeout() {
          warn!("Payment processor timed out.");
          AppError::GatewayTimeout
        } else {
          error!(error = %e, "Payment processor transport error.");
          AppError::PaymentGateway("payment processor unreachable".to_string())
        }
      })?;

    let status = response.status();
    if !status.is_success() {
      // Processor rejection bodies are logged for diagnosis, never surfaced.
      let body = response.text().await.unwrap_or_default();
      error!(%status, body = %body, "Payment processor rejected the charge.");
      return Err(AppError::PaymentGateway(format!(
        "payment processor returned {}",
        status
      )));
    }

    let payload = response.json::<serde_json::Value>().await.map_err(|e| {
      error!(error = %e, "Payment processor returned an unreadable body.");
      AppError::PaymentGateway("payment processor returned an invalid response".to_string())
    })?;

    info!("Charge accepted by payment processor.");
    Ok(payload)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whole_totals_convert_exactly() {
    assert_eq!(
      PaymentGateway::minor_units("210.00".parse().unwrap()).unwrap(),
      21000
    );
    assert_eq!(PaymentGateway::minor_units("0.00".parse().unwrap()).unwrap(), 0);
  }

  #[test]
  fn fractional_cents_round_to_nearest() {
    assert_eq!(
      PaymentGateway::minor_units("19.995".parse().unwrap()).unwrap(),
      2000
    );
    assert_eq!(
      PaymentGateway::minor_units("19.994".parse().unwrap()).unwrap(),
      1999
    );
  }
}
