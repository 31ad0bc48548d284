use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCustomer;

#[derive(Deserialize, Debug)]
pub struct RegisterPayload {
  pub name: String,
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::register_customer", skip(app_state, payload))]
pub async fn register_customer(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterPayload>,
) -> Result<HttpResponse, AppError> {
  let customer = app_state
    .customers
    .register(&payload.name, &payload.email, &payload.password)
    .await?;
  // Customer serialization skips the password hash.
  Ok(HttpResponse::Ok().json(customer))
}

#[instrument(name = "handler::login_customer", skip(app_state, payload))]
pub async fn login_customer(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let customer = app_state
    .customers
    .verify_login(&payload.email, &payload.password)
    .await?;
  let credential = app_state.tokens.issue(customer.customer_id)?;

  Ok(HttpResponse::Ok().json(json!({
      "customer": customer,
      "access_token": credential.access_token,
      "expires_in": credential.expires_in,
  })))
}

#[instrument(
    name = "handler::get_customer_profile",
    skip(app_state, auth),
    fields(customer_id = %auth.customer_id)
)]
pub async fn get_customer_profile(
  app_state: web::Data<AppState>,
  auth: AuthenticatedCustomer,
) -> Result<HttpResponse, AppError> {
  let customer = app_state.customers.profile(auth.customer_id).await?;
  Ok(HttpResponse::Ok().json(customer))
}
