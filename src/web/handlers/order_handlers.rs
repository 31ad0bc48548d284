use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::OrderMeta;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCustomer;

#[derive(Deserialize, Debug)]
pub struct CreateOrderPayload {
  pub cart_id: String,
  #[serde(flatten)]
  pub meta: OrderMeta,
}

#[instrument(
    name = "handler::create_order",
    skip(app_state, payload, auth),
    fields(customer_id = %auth.customer_id)
)]
pub async fn create_order(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderPayload>,
  auth: AuthenticatedCustomer,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let order_id = app_state
    .orders
    .create_order(&payload.cart_id, auth.customer_id, payload.meta)
    .await?;
  Ok(HttpResponse::Created().json(json!({ "order_id": order_id })))
}

#[instrument(
    name = "handler::get_order",
    skip(app_state, path, auth),
    fields(customer_id = %auth.customer_id)
)]
pub async fn get_order(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth: AuthenticatedCustomer,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state.orders.get_order(order_id).await?;
  if order.order.customer_id != auth.customer_id {
    // Another customer's order is indistinguishable from a missing one.
    return Err(AppError::not_found(format!("Order with id {} does not exist", order_id)));
  }
  Ok(HttpResponse::Ok().json(order))
}

/// Orders for the authenticated customer; identity comes from the verified
/// credential, never from request parameters.
#[instrument(
    name = "handler::get_customer_orders",
    skip(app_state, auth),
    fields(customer_id = %auth.customer_id)
)]
pub async fn get_customer_orders(
  app_state: web::Data<AppState>,
  auth: AuthenticatedCustomer,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.get_customer_orders(auth.customer_id).await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(
    name = "handler::get_order_summary",
    skip(app_state, path, auth),
    fields(customer_id = %auth.customer_id)
)]
pub async fn get_order_summary(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth: AuthenticatedCustomer,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state.orders.get_order_summary(order_id).await?;
  if order.customer_id != auth.customer_id {
    return Err(AppError::not_found(format!("Order with id {} does not exist", order_id)));
  }
  Ok(HttpResponse::Ok().json(order))
}
