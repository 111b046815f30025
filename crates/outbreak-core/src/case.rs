//! Case counts.
//!
//! Two record shapes coexist:
//!
//! - [`CaseRecord`] is the time-series row the dashboards aggregate over. It
//!   carries a numeric month and an optional epidemiological week, and is
//!   unique per `(district, year, month, week)`.
//! - [`CaseTally`] is a coarse monthly tally keyed by month *name*, unique per
//!   `(district, year, month)`.

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  error::KeyField,
  guard::CompositeKey,
  page::Sortable,
};

// ─── Months ──────────────────────────────────────────────────────────────────

/// Full English name for a calendar month number (`1` → `"January"`).
pub fn month_name(month: u32) -> Result<&'static str> {
  u8::try_from(month)
    .ok()
    .and_then(|m| Month::try_from(m).ok())
    .map(|m| m.name())
    .ok_or_else(|| Error::InvalidMonth(month.to_string()))
}

/// Normalise a month name or abbreviation (any case) to its full name.
pub fn normalize_month_name(month: &str) -> Result<&'static str> {
  month
    .trim()
    .parse::<Month>()
    .map(|m| m.name())
    .map_err(|_| Error::InvalidMonth(month.to_owned()))
}

// ─── CaseRecord ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
  pub case_record_id: i64,
  /// `None` once the district has been deleted; the name below survives.
  pub district_id:    Option<i64>,
  /// District name captured when the record was inserted.
  pub district_name:  String,
  pub year:           i32,
  /// Calendar month, `1..=12`.
  pub month:          u32,
  pub week:           Option<u32>,
  pub case_count:     u32,
}

impl Sortable for CaseRecord {
  const RESOURCE: &'static str = "CaseRecord";
  const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
    ("caseRecordId", "case_record_id"),
    ("districtName", "district_name"),
    ("year", "year"),
    ("month", "month"),
    ("week", "week"),
    ("caseCount", "case_count"),
  ];
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCaseRecord {
  pub district_id: i64,
  pub year:        i32,
  pub month:       u32,
  #[serde(default)]
  pub week:        Option<u32>,
  pub case_count:  u32,
}

impl NewCaseRecord {
  /// Reject month numbers outside `1..=12` before anything is written.
  pub fn validate(&self) -> Result<()> {
    month_name(self.month).map(|_| ())
  }
}

impl CompositeKey for NewCaseRecord {
  type Key = (i64, i32, u32, Option<u32>);
  type Stored = CaseRecord;

  const RESOURCE: &'static str = "CaseRecord";

  fn composite_key(&self) -> Self::Key {
    (self.district_id, self.year, self.month, self.week)
  }

  fn key_fields(&self) -> Vec<KeyField> {
    let mut fields = vec![
      KeyField::new("districtId", self.district_id),
      KeyField::new("year", self.year),
      KeyField::new("month", self.month),
    ];
    if let Some(week) = self.week {
      fields.push(KeyField::new("week", week));
    }
    fields
  }
}

// ─── CaseTally ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseTally {
  pub case_tally_id: i64,
  pub district_id:   i64,
  pub year:          i32,
  /// Full English month name, e.g. `"March"`.
  pub month:         String,
  pub case_count:    u32,
}

/// A tally waiting to be inserted. Construct with [`NewCaseTally::new`] so
/// the month name is normalised before it becomes part of the key.
#[derive(Debug, Clone)]
pub struct NewCaseTally {
  pub district_id: i64,
  pub year:        i32,
  pub month:       &'static str,
  pub case_count:  u32,
}

impl NewCaseTally {
  pub fn new(
    district_id: i64,
    year: i32,
    month: &str,
    case_count: u32,
  ) -> Result<Self> {
    Ok(Self {
      district_id,
      year,
      month: normalize_month_name(month)?,
      case_count,
    })
  }
}

impl CompositeKey for NewCaseTally {
  type Key = (i64, i32, &'static str);
  type Stored = CaseTally;

  const RESOURCE: &'static str = "CaseTally";

  fn composite_key(&self) -> Self::Key { (self.district_id, self.year, self.month) }

  fn key_fields(&self) -> Vec<KeyField> {
    vec![
      KeyField::new("districtId", self.district_id),
      KeyField::new("year", self.year),
      KeyField::new("month", self.month),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn month_names_cover_the_calendar() {
    assert_eq!(month_name(1).unwrap(), "January");
    assert_eq!(month_name(3).unwrap(), "March");
    assert_eq!(month_name(12).unwrap(), "December");
  }

  #[test]
  fn month_numbers_outside_calendar_are_rejected() {
    assert!(matches!(month_name(0), Err(Error::InvalidMonth(_))));
    assert!(matches!(month_name(13), Err(Error::InvalidMonth(_))));
    assert!(matches!(month_name(300), Err(Error::InvalidMonth(_))));
  }

  #[test]
  fn tally_month_is_normalised() {
    let tally = NewCaseTally::new(1, 2024, "mar", 4).unwrap();
    assert_eq!(tally.month, "March");

    let tally = NewCaseTally::new(1, 2024, "  September ", 4).unwrap();
    assert_eq!(tally.month, "September");
  }

  #[test]
  fn tally_rejects_unknown_month() {
    let err = NewCaseTally::new(1, 2024, "Smarch", 4).unwrap_err();
    assert!(matches!(err, Error::InvalidMonth(m) if m == "Smarch"));
  }

  #[test]
  fn record_key_fields_include_week_only_when_present() {
    let mut record = NewCaseRecord {
      district_id: 1,
      year:        2024,
      month:       3,
      week:        None,
      case_count:  10,
    };
    assert_eq!(record.key_fields().len(), 3);

    record.week = Some(11);
    let names: Vec<_> = record.key_fields().iter().map(|f| f.name).collect();
    assert_eq!(names, ["districtId", "year", "month", "week"]);
  }
}
