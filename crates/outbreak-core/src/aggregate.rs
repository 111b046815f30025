//! Derived case-count views for the dashboards.
//!
//! All four views are computed on demand from a snapshot of
//! [`CaseRecord`]s and are never stored. Each row carries an `id` assigned in
//! emission order starting at 1; it is unique within one response and means
//! nothing across calls.

use std::{collections::HashMap, hash::Hash};

use serde::Serialize;

use crate::{
  Error, Result,
  case::{CaseRecord, month_name},
  store::OutbreakStore,
};

// ─── Rows ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
  pub id:          u64,
  pub month:       &'static str,
  pub year:        i32,
  pub total_cases: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTotal {
  pub id:          u64,
  pub week:        u32,
  pub year:        i32,
  pub total_cases: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictTotal {
  pub id:            u64,
  pub district_name: String,
  pub year:          i32,
  pub total_cases:   u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyTotal {
  pub id:          u64,
  pub year:        i32,
  pub total_cases: u64,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Group-by-and-sum over one snapshot of case records.
///
/// Every view fails with [`Error::NoDataAvailable`] when the snapshot is
/// empty.
#[derive(Debug, Clone, Copy)]
pub struct CaseSeries<'a> {
  records: &'a [CaseRecord],
}

impl<'a> CaseSeries<'a> {
  pub fn new(records: &'a [CaseRecord]) -> Self { Self { records } }

  /// The highest year present, or `None` for an empty snapshot.
  pub fn latest_year(&self) -> Option<i32> {
    self.records.iter().map(|r| r.year).max()
  }

  fn require_data(&self) -> Result<()> {
    if self.records.is_empty() {
      Err(Error::NoDataAvailable)
    } else {
      Ok(())
    }
  }

  fn in_year(&self, year: i32) -> impl Iterator<Item = &'a CaseRecord> {
    self.records.iter().filter(move |r| r.year == year)
  }

  /// Totals per calendar month, January first, months named in English.
  pub fn monthly_totals(&self, year: i32) -> Result<Vec<MonthlyTotal>> {
    self.require_data()?;
    let mut groups = group_sum(self.in_year(year).map(|r| (r.month, r.case_count)))?;
    groups.sort_by_key(|&(month, _)| month);

    numbered(groups)
      .map(|(id, (month, total_cases))| {
        month_name(month).map(|month| MonthlyTotal { id, month, year, total_cases })
      })
      .collect()
  }

  /// Totals per district, highest first. Equal totals keep the order in which
  /// their districts first appear in the snapshot.
  pub fn district_totals(&self, year: i32) -> Result<Vec<DistrictTotal>> {
    self.require_data()?;
    let mut groups = group_sum(
      self
        .in_year(year)
        .map(|r| (r.district_name.as_str(), r.case_count)),
    )?;
    groups.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(
      numbered(groups)
        .map(|(id, (name, total_cases))| DistrictTotal {
          id,
          district_name: name.to_owned(),
          year,
          total_cases,
        })
        .collect(),
    )
  }

  /// Totals per week, ascending. Records without a week are skipped.
  pub fn weekly_totals(&self, year: i32) -> Result<Vec<WeeklyTotal>> {
    self.require_data()?;
    let mut groups = group_sum(
      self
        .in_year(year)
        .filter_map(|r| r.week.map(|week| (week, r.case_count))),
    )?;
    groups.sort_by_key(|&(week, _)| week);

    Ok(
      numbered(groups)
        .map(|(id, (week, total_cases))| WeeklyTotal { id, week, year, total_cases })
        .collect(),
    )
  }

  /// Totals per year across the whole snapshot, ascending.
  pub fn yearly_totals(&self) -> Result<Vec<YearlyTotal>> {
    self.require_data()?;
    let mut groups = group_sum(self.records.iter().map(|r| (r.year, r.case_count)))?;
    groups.sort_by_key(|&(year, _)| year);

    Ok(
      numbered(groups)
        .map(|(id, (year, total_cases))| YearlyTotal { id, year, total_cases })
        .collect(),
    )
  }
}

/// Sum counts per key, keeping groups in first-seen order.
fn group_sum<K>(rows: impl Iterator<Item = (K, u32)>) -> Result<Vec<(K, u64)>>
where
  K: Eq + Hash + Clone,
{
  let mut index: HashMap<K, usize> = HashMap::new();
  let mut groups: Vec<(K, u64)> = Vec::new();

  for (key, count) in rows {
    let slot = *index.entry(key.clone()).or_insert_with(|| {
      groups.push((key, 0));
      groups.len() - 1
    });
    let total = &mut groups[slot].1;
    *total = add_count(*total, count)?;
  }

  Ok(groups)
}

fn add_count(total: u64, count: u32) -> Result<u64> {
  total
    .checked_add(u64::from(count))
    .ok_or(Error::TotalOverflow)
}

/// Pair each item with its 1-based position.
fn numbered<T>(items: Vec<T>) -> impl Iterator<Item = (u64, T)> {
  (1u64..).zip(items)
}

// ─── Store-backed entry points ───────────────────────────────────────────────

/// Read one snapshot of the store's case records and apply `view` at the
/// latest year found in it.
async fn at_latest_year<S, T>(
  store: &S,
  view: impl FnOnce(&CaseSeries<'_>, i32) -> Result<T>,
) -> Result<T, S::Error>
where
  S: OutbreakStore,
{
  let records = store.case_records().await?;
  let series = CaseSeries::new(&records);
  let year = series.latest_year().ok_or(Error::NoDataAvailable)?;
  Ok(view(&series, year)?)
}

/// Latest year across all case records in the store.
pub async fn latest_year<S: OutbreakStore>(store: &S) -> Result<i32, S::Error> {
  at_latest_year(store, |_, year| Ok(year)).await
}

pub async fn monthly_totals_for_latest_year<S: OutbreakStore>(
  store: &S,
) -> Result<Vec<MonthlyTotal>, S::Error> {
  at_latest_year(store, |series, year| series.monthly_totals(year)).await
}

pub async fn district_totals_for_latest_year<S: OutbreakStore>(
  store: &S,
) -> Result<Vec<DistrictTotal>, S::Error> {
  at_latest_year(store, |series, year| series.district_totals(year)).await
}

pub async fn weekly_totals_for_latest_year<S: OutbreakStore>(
  store: &S,
) -> Result<Vec<WeeklyTotal>, S::Error> {
  at_latest_year(store, |series, year| series.weekly_totals(year)).await
}

pub async fn yearly_totals<S: OutbreakStore>(
  store: &S,
) -> Result<Vec<YearlyTotal>, S::Error> {
  let records = store.case_records().await?;
  Ok(CaseSeries::new(&records).yearly_totals()?)
}
