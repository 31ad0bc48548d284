use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::cart::CartService;
use crate::state::AppState;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct AddToCartPayload {
  pub cart_id: String,
  pub product_id: Uuid,
  #[serde(default)]
  pub attributes: String,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityPayload {
  pub quantity: i32,
}

// --- Handler Implementations ---

/// Offer a fresh opaque cart identifier. Purely a convenience: the server
/// keeps no record of it and treats every cart id as untrusted input.
#[instrument(name = "handler::generate_unique_cart")]
pub async fn generate_unique_cart() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "cart_id": CartService::generate_cart_id() }))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, payload),
    fields(product_id = %payload.product_id, quantity = payload.quantity)
)]
pub async fn add_to_cart(
  app_state: web::Data<AppState>,
  payload: web::Json<AddToCartPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let item = app_state
    .carts
    .add_item(&payload.cart_id, payload.product_id, payload.attributes, payload.quantity)
    .await?;
  Ok(HttpResponse::Created().json(item))
}

#[instrument(name = "handler::get_cart", skip(app_state, path))]
pub async fn get_cart(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let lines = app_state.carts.get_cart(&cart_id).await?;
  Ok(HttpResponse::Ok().json(lines))
}

#[instrument(name = "handler::update_cart_item", skip(app_state, path, payload))]
pub async fn update_cart_item(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateQuantityPayload>,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  let item = app_state.carts.update_quantity(item_id, payload.quantity).await?;
  Ok(HttpResponse::Ok().json(item))
}

#[instrument(name = "handler::remove_item_from_cart", skip(app_state, path))]
pub async fn remove_item_from_cart(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  let removed = app_state.carts.remove_item(item_id).await?;
  info!(removed, "Removed cart line.");
  Ok(HttpResponse::Ok().json(json!({ "message": format!("Deleted {} record", removed) })))
}

#[instrument(name = "handler::empty_cart", skip(app_state, path))]
pub async fn empty_cart(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  app_state.carts.empty_cart(&cart_id).await?;
  Ok(HttpResponse::Ok().json(json!([])))
}
