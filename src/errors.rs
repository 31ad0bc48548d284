use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{message}")]
  Validation {
    code: &'static str,
    field: &'static str,
    message: String,
  },

  #[error("Authorization code is empty")]
  MissingCredential,

  #[error("Access Unauthorized")]
  InvalidCredential,

  #[error("Email or password is incorrect")]
  InvalidLogin,

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Cart is empty")]
  EmptyCart,

  #[error("Order could not be created")]
  OrderCreationFailed(#[source] anyhow::Error),

  #[error("Payment gateway rejected the charge: {0}")]
  PaymentGateway(String),

  #[error("Payment gateway timed out")]
  GatewayTimeout,

  #[error("Database Error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(#[source] anyhow::Error),
}

impl AppError {
  pub fn validation(code: &'static str, field: &'static str, message: impl Into<String>) -> Self {
    AppError::Validation {
      code,
      field,
      message: message.into(),
    }
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    AppError::NotFound(message.into())
  }

  /// Opaque error code surfaced to clients alongside the HTTP status.
  pub fn code(&self) -> &'static str {
    match self {
      AppError::Validation { code, .. } => code,
      AppError::MissingCredential => "AUT_01",
      AppError::InvalidCredential => "AUT_02",
      AppError::InvalidLogin => "USR_01",
      AppError::NotFound(_) => "NOT_FOUND",
      AppError::EmptyCart => "CRT_02",
      AppError::OrderCreationFailed(_) => "ORD_01",
      AppError::PaymentGateway(_) => "PAY_01",
      AppError::GatewayTimeout => "PAY_02",
      AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => "INTERNAL",
    }
  }
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in handlers and services using `?` on anyhow-returning helpers.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      // Already covered by `From<sqlx::Error>`, but the error may arrive wrapped.
      return match err.downcast::<sqlx::Error>() {
        Ok(sqlx_err) => AppError::Database(sqlx_err),
        Err(other) => AppError::Internal(other),
      };
    }
    AppError::Internal(err)
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation { .. } | AppError::EmptyCart => StatusCode::BAD_REQUEST,
      AppError::MissingCredential | AppError::InvalidCredential | AppError::InvalidLogin => {
        StatusCode::UNAUTHORIZED
      }
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::PaymentGateway(_) => StatusCode::BAD_GATEWAY,
      AppError::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
      AppError::OrderCreationFailed(_)
      | AppError::Database(_)
      | AppError::Config(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error chain here; the response body only carries the
    // opaque code and a client-safe message.
    tracing::error!(application_error = %self, "Responding with error");

    let status = self.status_code();
    let message = match self {
      // Never echo SQL or upstream detail back to the caller.
      AppError::Database(_) => "Database operation failed".to_string(),
      AppError::Internal(_) => "An internal error occurred".to_string(),
      AppError::Config(_) => "Configuration issue".to_string(),
      other => other.to_string(),
    };

    let mut body = json!({
        "status": status.as_u16(),
        "code": self.code(),
        "message": message,
    });
    if let AppError::Validation { field, .. } = self {
      body["field"] = json!(field);
    }

    HttpResponse::build(status).json(json!({ "error": body }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn auth_errors_map_to_unauthorized_with_opaque_codes() {
    assert_eq!(AppError::MissingCredential.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::MissingCredential.code(), "AUT_01");
    assert_eq!(AppError::InvalidCredential.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::InvalidCredential.code(), "AUT_02");
  }

  #[test]
  fn gateway_timeout_is_distinguishable_from_gateway_error() {
    assert_eq!(
      AppError::PaymentGateway("declined".into()).status_code(),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(AppError::GatewayTimeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    assert_ne!(
      AppError::PaymentGateway("declined".into()).code(),
      AppError::GatewayTimeout.code()
    );
  }

  #[test]
  fn database_errors_do_not_leak_detail() {
    let err = AppError::Database(sqlx::Error::RowNotFound);
    let resp = err.error_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
