//! Mapping between SQLite rows and domain types, plus the bits of SQL that
//! every listing shares.
//!
//! Each table is described by a [`Table`] whose column list and decoder must
//! stay in the same order.

use rusqlite::{Row, types::Value};

use outbreak_core::{
  case::{CaseRecord, CaseTally},
  district::{District, Division},
  notice::{Alert, Article},
  resolve::IdOrName,
  user::User,
  weather::{WeatherCovariates, WeatherRecord},
};

// ─── Name matching ───────────────────────────────────────────────────────────

/// SQL name of [`fold_case`] once registered on a connection.
pub const FOLD_CASE_FN: &str = "fold_case";

/// Unicode lowercase. Both sides of every name comparison go through this,
/// since SQLite's own `lower()` and `LIKE` fold ASCII only.
pub fn fold_case(text: &str) -> String { text.to_lowercase() }

/// Build a `LIKE` pattern for case-insensitive containment against a
/// [`fold_case`]d column. Wildcards in the fragment are escaped with `\`, so
/// callers must add `ESCAPE '\'`.
pub fn like_pattern(fragment: &str) -> String {
  let mut pattern = String::with_capacity(fragment.len() + 2);
  pattern.push('%');
  for c in fold_case(fragment).chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// An optional `WHERE` clause with its bound values.
#[derive(Debug, Clone, Default)]
pub struct Filter {
  pub clause: String,
  pub params: Vec<Value>,
}

impl Filter {
  /// Matches every row.
  pub fn all() -> Self { Self::default() }

  pub fn new(condition: &str, params: Vec<Value>) -> Self {
    Self { clause: format!("WHERE {condition}"), params }
  }

  /// Route a resolved search token to one of two conditions. Each condition
  /// takes exactly one `?` placeholder; the name branch receives a
  /// [`like_pattern`].
  pub fn id_or_name(
    query: Option<&IdOrName>,
    by_id: &str,
    by_name: &str,
  ) -> Self {
    match query {
      None => Self::all(),
      Some(query) => query.dispatch(
        |id| Self::new(by_id, vec![Value::Integer(id)]),
        |name| Self::new(by_name, vec![Value::Text(like_pattern(name))]),
      ),
    }
  }
}

// ─── Tables ──────────────────────────────────────────────────────────────────

pub type Decoder<T> = fn(&Row<'_>) -> rusqlite::Result<T>;

/// Where a record type lives and how to read it back.
pub struct Table<T> {
  pub name:     &'static str,
  /// Primary-key column.
  pub key:      &'static str,
  /// Wire name of the primary key, used in not-found errors.
  pub key_name: &'static str,
  pub columns:  &'static str,
  pub decode:   Decoder<T>,
}

impl<T> Clone for Table<T> {
  fn clone(&self) -> Self { *self }
}

impl<T> Copy for Table<T> {}

impl<T> Table<T> {
  pub fn select_by_key(&self) -> String {
    format!("SELECT {} FROM {} WHERE {} = ?1", self.columns, self.name, self.key)
  }

  pub fn exists_by_key(&self) -> String {
    format!("SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1)", self.name, self.key)
  }

  pub fn delete_by_key(&self) -> String {
    format!("DELETE FROM {} WHERE {} = ?1", self.name, self.key)
  }
}

// ─── Record tables ───────────────────────────────────────────────────────────

pub const DISTRICTS: Table<District> = Table {
  name:     "districts",
  key:      "district_id",
  key_name: "districtId",
  columns:  "district_id, district_name",
  decode:   district_row,
};

fn district_row(row: &Row<'_>) -> rusqlite::Result<District> {
  Ok(District {
    district_id:   row.get(0)?,
    district_name: row.get(1)?,
  })
}

pub const DIVISIONS: Table<Division> = Table {
  name:     "divisions",
  key:      "division_id",
  key_name: "divisionId",
  columns:  "division_id, division_name, district_id",
  decode:   division_row,
};

fn division_row(row: &Row<'_>) -> rusqlite::Result<Division> {
  Ok(Division {
    division_id:   row.get(0)?,
    division_name: row.get(1)?,
    district_id:   row.get(2)?,
  })
}

pub const USERS: Table<User> = Table {
  name:     "users",
  key:      "user_id",
  key_name: "userId",
  columns:  "user_id, user_name, email, division_id",
  decode:   user_row,
};

fn user_row(row: &Row<'_>) -> rusqlite::Result<User> {
  Ok(User {
    user_id:     row.get(0)?,
    user_name:   row.get(1)?,
    email:       row.get(2)?,
    division_id: row.get(3)?,
  })
}

pub const ALERTS: Table<Alert> = Table {
  name:     "alerts",
  key:      "alert_id",
  key_name: "alertId",
  columns:  "alert_id, alert_type, alert_description, district_id",
  decode:   alert_row,
};

fn alert_row(row: &Row<'_>) -> rusqlite::Result<Alert> {
  Ok(Alert {
    alert_id:          row.get(0)?,
    alert_type:        row.get(1)?,
    alert_description: row.get(2)?,
    district_id:       row.get(3)?,
  })
}

pub const ARTICLES: Table<Article> = Table {
  name:     "articles",
  key:      "article_id",
  key_name: "articleId",
  columns:  "article_id, title, description, image, author_name",
  decode:   article_row,
};

fn article_row(row: &Row<'_>) -> rusqlite::Result<Article> {
  Ok(Article {
    article_id:  row.get(0)?,
    title:       row.get(1)?,
    description: row.get(2)?,
    image:       row.get(3)?,
    author_name: row.get(4)?,
  })
}

pub const CASE_RECORDS: Table<CaseRecord> = Table {
  name:     "case_records",
  key:      "case_record_id",
  key_name: "caseRecordId",
  columns:  "case_record_id, district_id, district_name, year, month, week, case_count",
  decode:   case_record_row,
};

fn case_record_row(row: &Row<'_>) -> rusqlite::Result<CaseRecord> {
  Ok(CaseRecord {
    case_record_id: row.get(0)?,
    district_id:    row.get(1)?,
    district_name:  row.get(2)?,
    year:           row.get(3)?,
    month:          row.get(4)?,
    week:           row.get(5)?,
    case_count:     row.get(6)?,
  })
}

pub const CASE_TALLIES: Table<CaseTally> = Table {
  name:     "case_tallies",
  key:      "case_tally_id",
  key_name: "caseTallyId",
  columns:  "case_tally_id, district_id, year, month, case_count",
  decode:   case_tally_row,
};

fn case_tally_row(row: &Row<'_>) -> rusqlite::Result<CaseTally> {
  Ok(CaseTally {
    case_tally_id: row.get(0)?,
    district_id:   row.get(1)?,
    year:          row.get(2)?,
    month:         row.get(3)?,
    case_count:    row.get(4)?,
  })
}

pub const WEATHER_RECORDS: Table<WeatherRecord> = Table {
  name:     "weather_records",
  key:      "weather_record_id",
  key_name: "weatherRecordId",
  columns:  "weather_record_id, district_id,
  predict_year, predict_month, predict_week,
  avg_max_temp, avg_min_temp, avg_apparent_max_temp, avg_apparent_min_temp,
  total_precipitation, avg_wind_speed, max_wind_gusts, weather_code,
  cases_last_week, cases_last_2_weeks, cases_3_week_avg, cases_5_week_avg,
  cases_diff_1_week",
  decode:   weather_row,
};

fn weather_row(row: &Row<'_>) -> rusqlite::Result<WeatherRecord> {
  Ok(WeatherRecord {
    weather_record_id: row.get(0)?,
    district_id:       row.get(1)?,
    predict_year:      row.get(2)?,
    predict_month:     row.get(3)?,
    predict_week:      row.get(4)?,
    covariates:        WeatherCovariates {
      avg_max_temp:          row.get(5)?,
      avg_min_temp:          row.get(6)?,
      avg_apparent_max_temp: row.get(7)?,
      avg_apparent_min_temp: row.get(8)?,
      total_precipitation:   row.get(9)?,
      avg_wind_speed:        row.get(10)?,
      max_wind_gusts:        row.get(11)?,
      weather_code:          row.get(12)?,
      cases_last_week:       row.get(13)?,
      cases_last_2_weeks:    row.get(14)?,
      cases_3_week_avg:      row.get(15)?,
      cases_5_week_avg:      row.get(16)?,
      cases_diff_1_week:     row.get(17)?,
    },
  })
}
