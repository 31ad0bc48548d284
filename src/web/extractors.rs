//! Request extractors shared by protected handlers.

use actix_web::{web, FromRequest, HttpRequest};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Credential transport header, carrying `"<scheme> <token>"`.
pub const CREDENTIAL_HEADER: &str = "USER-KEY";

/// Verified customer identity for a protected operation. Absence or
/// invalidity of the credential always fails the request; there is no
/// anonymous fallback.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedCustomer {
  pub customer_id: Uuid,
}

impl FromRequest for AuthenticatedCustomer {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let state = match req.app_data::<web::Data<AppState>>() {
      Some(state) => state,
      None => {
        // Routes are always registered with AppState; reaching this is a wiring bug.
        return futures_util::future::ready(Err(AppError::Internal(anyhow::anyhow!(
          "application state missing from request"
        ))));
      }
    };

    let raw_header = req
      .headers()
      .get(CREDENTIAL_HEADER)
      .and_then(|value| value.to_str().ok());

    let result = state.tokens.verify(raw_header).map(|identity| AuthenticatedCustomer {
      customer_id: identity.customer_id,
    });
    if result.is_err() {
      warn!("Rejected request with missing or invalid credential.");
    }
    futures_util::future::ready(result)
  }
}
