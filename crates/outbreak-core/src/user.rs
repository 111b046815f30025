//! Staff user accounts. Credentials and roles live outside this crate.

use serde::{Deserialize, Serialize};

use crate::page::Sortable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub user_id:     i64,
  pub user_name:   String,
  pub email:       String,
  /// Cleared when the division is deleted.
  pub division_id: Option<i64>,
}

impl Sortable for User {
  const RESOURCE: &'static str = "User";
  const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
    ("userId", "user_id"),
    ("userName", "user_name"),
    ("email", "email"),
  ];
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
  pub user_name:   String,
  pub email:       String,
  #[serde(default)]
  pub division_id: Option<i64>,
}
