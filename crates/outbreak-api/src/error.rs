//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use outbreak_core::{Error as DomainError, store::StoreError};
use serde_json::{Value, json};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A rejection the caller can act on.
  #[error(transparent)]
  Domain(#[from] DomainError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: domain conditions keep their meaning, anything
  /// else is an opaque store failure.
  pub fn from_store<E: StoreError>(err: E) -> Self {
    let domain = err.domain().cloned();
    match domain {
      Some(domain) => Self::Domain(domain),
      None => Self::Store(Box::new(err)),
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::Domain(e) => match e {
        DomainError::EmptyResult { .. }
        | DomainError::NoDataAvailable
        | DomainError::ReferenceNotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidSortField { .. } | DomainError::InvalidMonth(_) => {
          StatusCode::BAD_REQUEST
        }
        DomainError::DuplicateKey { .. } => StatusCode::CONFLICT,
        DomainError::TotalOverflow => StatusCode::INTERNAL_SERVER_ERROR,
      },
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// The JSON body: always an `error` message, plus the structured fields of
  /// the domain condition where it has any.
  fn body(&self) -> Value {
    let message = self.to_string();
    let Self::Domain(e) = self else {
      return json!({ "error": message });
    };

    match e {
      DomainError::EmptyResult { resource } => {
        json!({ "error": message, "resource": resource })
      }
      DomainError::InvalidSortField { resource, field } => {
        json!({ "error": message, "resource": resource, "field": field })
      }
      DomainError::DuplicateKey { resource, fields } => {
        json!({ "error": message, "resource": resource, "fields": fields })
      }
      DomainError::ReferenceNotFound { resource, field, value } => json!({
        "error": message,
        "resource": resource,
        "field": field,
        "value": value,
      }),
      DomainError::InvalidMonth(month) => {
        json!({ "error": message, "value": month })
      }
      DomainError::NoDataAvailable | DomainError::TotalOverflow => {
        json!({ "error": message })
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(error = %self, %status, "request rejected");
    }
    (status, Json(self.body())).into_response()
  }
}
