//! Error types for `outbreak-core`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One named component of a composite key, with the offending value rendered
/// as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyField {
  pub name:  &'static str,
  pub value: String,
}

impl KeyField {
  pub fn new(name: &'static str, value: impl ToString) -> Self {
    Self { name, value: value.to_string() }
  }
}

impl fmt::Display for KeyField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}={}", self.name, self.value)
  }
}

fn join_fields(fields: &[KeyField]) -> String {
  fields
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join(", ")
}

#[derive(Debug, Clone, Error)]
pub enum Error {
  /// A listing or search matched no rows at all.
  #[error("no {resource} found")]
  EmptyResult { resource: &'static str },

  #[error("{resource} cannot be sorted by {field:?}")]
  InvalidSortField { resource: &'static str, field: String },

  #[error("{resource} already exists with {}", join_fields(.fields))]
  DuplicateKey {
    resource: &'static str,
    fields:   Vec<KeyField>,
  },

  /// Aggregation requested while the store holds no case records.
  #[error("no data available")]
  NoDataAvailable,

  #[error("{resource} not found with {field}: {value}")]
  ReferenceNotFound {
    resource: &'static str,
    field:    &'static str,
    value:    i64,
  },

  #[error("invalid month: {0:?}")]
  InvalidMonth(String),

  #[error("case total exceeds the supported range")]
  TotalOverflow,
}

impl Error {
  pub fn reference_not_found(
    resource: &'static str,
    field: &'static str,
    value: i64,
  ) -> Self {
    Self::ReferenceNotFound { resource, field, value }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
