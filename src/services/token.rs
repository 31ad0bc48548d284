//! Credential issue/verify. Tokens are signed, time-bounded proofs of
//! customer identity; verification is deterministic and never falls back to
//! an anonymous identity.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AppError, Result};

/// Credentials expire 24 hours after issuance.
const TOKEN_VALIDITY_SECS: i64 = 60 * 60 * 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  customer_id: Uuid,
  iat: i64,
  exp: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct CustomerIdentity {
  pub customer_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedCredential {
  pub access_token: String,
  pub expires_in: i64,
}

#[derive(Clone)]
pub struct TokenService {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validity_secs: i64,
}

impl TokenService {
  pub fn new(secret: &str) -> Self {
    Self::with_validity(secret, TOKEN_VALIDITY_SECS)
  }

  /// Construct with a custom validity window; negative windows produce
  /// already-expired tokens, which the tests rely on.
  pub fn with_validity(secret: &str, validity_secs: i64) -> Self {
    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validity_secs,
    }
  }

  /// Produce a signed credential for `customer_id`. Stateless; nothing is
  /// recorded server-side.
  pub fn issue(&self, customer_id: Uuid) -> Result<IssuedCredential> {
    let now = Utc::now();
    let claims = Claims {
      customer_id,
      iat: now.timestamp(),
      exp: (now + Duration::seconds(self.validity_secs)).timestamp(),
    };
    let access_token = encode(&Header::default(), &claims, &self.encoding_key)
      .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

    debug!(%customer_id, "Issued customer credential.");
    Ok(IssuedCredential {
      access_token,
      expires_in: self.validity_secs,
    })
  }

  /// Verify a raw header value of the form `"<scheme> <token>"`.
  ///
  /// A missing header fails with `MissingCredential`; a header without a
  /// scheme prefix, a bad signature, or an expired token all fail with
  /// `InvalidCredential`. Verification detail is logged, never surfaced.
  pub fn verify(&self, raw_header: Option<&str>) -> Result<CustomerIdentity> {
    let raw = match raw_header {
      Some(value) if !value.trim().is_empty() => value,
      _ => return Err(AppError::MissingCredential),
    };

    // Strip the "<scheme> " prefix; a value with no prefix is malformed.
    let token = raw
      .split_once(' ')
      .map(|(_, token)| token.trim())
      .ok_or(AppError::InvalidCredential)?;

    let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(|e| {
      debug!(error = %e, "Credential verification failed.");
      AppError::InvalidCredential
    })?;

    Ok(CustomerIdentity {
      customer_id: data.claims.customer_id,
    })
  }
}
