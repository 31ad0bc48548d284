use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCustomer;

#[derive(Deserialize, Debug)]
pub struct ChargePayload {
  pub order_id: Uuid,
  pub email: String,
  pub payment_token: String,
}

/// Capture payment for an order. The charge amount is derived from the
/// persisted order total re-fetched here; nothing in the request body can
/// influence it.
#[instrument(
    name = "handler::charge_order",
    skip(app_state, payload, auth),
    fields(customer_id = %auth.customer_id, order_id = %payload.order_id)
)]
pub async fn charge_order(
  app_state: web::Data<AppState>,
  payload: web::Json<ChargePayload>,
  auth: AuthenticatedCustomer,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();

  let order = app_state.orders.get_order_summary(payload.order_id).await?;
  if order.customer_id != auth.customer_id {
    warn!("Customer attempted to pay an order they do not own.");
    return Err(AppError::not_found(format!(
      "Order with id {} does not exist",
      payload.order_id
    )));
  }

  let processor_response = app_state
    .payments
    .charge(&order, &payload.email, &payload.payment_token)
    .await?;

  // The charge succeeded; only now does the order transition to paid.
  app_state.orders.mark_paid(order.order_id).await?;
  info!("Order marked paid after successful capture.");

  Ok(HttpResponse::Ok().json(processor_response))
}
