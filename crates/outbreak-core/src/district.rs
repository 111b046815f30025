//! Administrative regions: districts and the divisions inside them.
//!
//! A division's link to its district is nullable. Deleting a district
//! detaches its divisions instead of removing them.

use serde::{Deserialize, Serialize};

use crate::{
  error::KeyField,
  guard::CompositeKey,
  page::Sortable,
};

// ─── District ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
  pub district_id:   i64,
  /// Unique across all districts.
  pub district_name: String,
}

impl Sortable for District {
  const RESOURCE: &'static str = "District";
  const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
    ("districtId", "district_id"),
    ("districtName", "district_name"),
  ];
}

/// Input to [`crate::store::OutbreakStore::add_district`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDistrict {
  pub district_name: String,
}

// ─── Division ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
  pub division_id:   i64,
  /// Unique within the owning district.
  pub division_name: String,
  /// `None` once the owning district has been deleted.
  pub district_id:   Option<i64>,
}

impl Sortable for Division {
  const RESOURCE: &'static str = "Division";
  const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
    ("divisionId", "division_id"),
    ("divisionName", "division_name"),
    ("districtId", "district_id"),
  ];
}

/// Input to the guarded division insert. The district must exist.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDivision {
  pub division_name: String,
  pub district_id:   i64,
}

/// Input to [`crate::store::OutbreakStore::update_division`]. A division keeps
/// its district; only the name changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionUpdate {
  pub division_name: String,
}

impl CompositeKey for NewDivision {
  type Key = (i64, String);
  type Stored = Division;

  const RESOURCE: &'static str = "Division";

  fn composite_key(&self) -> Self::Key {
    (self.district_id, self.division_name.clone())
  }

  fn key_fields(&self) -> Vec<KeyField> {
    vec![
      KeyField::new("districtId", self.district_id),
      KeyField::new("divisionName", &self.division_name),
    ]
  }
}
