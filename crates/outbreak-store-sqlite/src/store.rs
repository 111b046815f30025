//! [`SqliteStore`]: the SQLite implementation of [`OutbreakStore`].

use std::path::Path;

use rusqlite::{
  Connection, OptionalExtension as _, functions::FunctionFlags, params, types::Value,
};

use outbreak_core::{
  case::{CaseRecord, CaseTally, NewCaseRecord, NewCaseTally},
  district::{District, Division, DivisionUpdate, NewDistrict, NewDivision},
  error::KeyField,
  guard::{GuardedInsert, GuardedUpdate},
  notice::{Alert, Article, NewAlert, NewArticle},
  page::{Page, PageRequest, Sortable},
  resolve::IdOrName,
  store::{OutbreakStore, RecordStore, StoreError as _},
  user::{NewUser, User},
  weather::{NewWeatherRecord, WeatherRecord},
};

use crate::{
  Error, Result,
  encode::{
    ALERTS, ARTICLES, CASE_RECORDS, CASE_TALLIES, DISTRICTS, DIVISIONS, FOLD_CASE_FN,
    Filter, Table, USERS, WEATHER_RECORDS, fold_case, like_pattern,
  },
  schema::SCHEMA,
};

type CoreError = outbreak_core::Error;

// ─── Store ───────────────────────────────────────────────────────────────────

/// An outbreak record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read all rows of `table` in key order.
  async fn fetch_all<T: Send + 'static>(&self, table: Table<T>) -> Result<Vec<T>> {
    let rows = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM {} ORDER BY {} ASC",
          table.columns, table.name, table.key
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], table.decode)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Read one row by primary key.
  async fn find<T: Send + 'static>(&self, table: Table<T>, id: i64) -> Result<Option<T>> {
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&table.select_by_key(), params![id], table.decode)
            .optional()?,
        )
      })
      .await?;
    Ok(found)
  }

  /// Count the rows matching `filter` and fetch the requested slice of them,
  /// ordered by the validated sort column with the row id as tie-breaker.
  async fn fetch_page<T>(
    &self,
    table: Table<T>,
    filter: Filter,
    request: &PageRequest,
  ) -> Result<Page<T>>
  where
    T: Sortable + Send + 'static,
  {
    let sort   = request.sort_spec::<T>()?;
    let limit  = i64::try_from(request.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);

    let (content, total): (Vec<T>, i64) = self
      .conn
      .call(move |conn| {
        let Filter { clause, mut params } = filter;

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM {} {clause}", table.name),
          rusqlite::params_from_iter(params.iter()),
          |row| row.get(0),
        )?;

        let sql = format!(
          "SELECT {} FROM {} {clause}
           ORDER BY {} {}, rowid ASC
           LIMIT ? OFFSET ?",
          table.columns,
          table.name,
          sort.column,
          sort.direction.as_sql(),
        );
        params.push(Value::Integer(limit));
        params.push(Value::Integer(offset));

        let mut stmt = conn.prepare(&sql)?;
        let content = stmt
          .query_map(rusqlite::params_from_iter(params), table.decode)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((content, total))
      })
      .await?;

    Ok(Page::from_slice(
      content,
      u64::try_from(total).unwrap_or_default(),
      request,
    )?)
  }

  /// Delete one row by primary key and hand it back.
  async fn take<T>(&self, table: Table<T>, id: i64) -> Result<T>
  where
    T: Sortable + Send + 'static,
  {
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let row = tx
          .query_row(&table.select_by_key(), params![id], table.decode)
          .optional()?;
        if row.is_some() {
          tx.execute(&table.delete_by_key(), params![id])?;
        }
        tx.commit()?;
        Ok(row)
      })
      .await?;

    match removed {
      Some(row) => {
        tracing::debug!(table = table.name, id, "deleted");
        Ok(row)
      }
      None => Err(missing_row(table, id).into()),
    }
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Scalar functions the queries below rely on. Per connection.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    FOLD_CASE_FN,
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| fold_case(&text))),
  )
}

fn row_exists<T>(conn: &Connection, table: Table<T>, id: i64) -> rusqlite::Result<bool> {
  conn.query_row(&table.exists_by_key(), params![id], |row| row.get(0))
}

fn district_exists(conn: &Connection, district_id: i64) -> rusqlite::Result<bool> {
  row_exists(conn, DISTRICTS, district_id)
}

fn missing_row<T: Sortable>(table: Table<T>, id: i64) -> CoreError {
  CoreError::reference_not_found(T::RESOURCE, table.key_name, id)
}

fn missing_district(district_id: i64) -> CoreError {
  missing_row(DISTRICTS, district_id)
}

fn missing_division(division_id: i64) -> CoreError {
  missing_row(DIVISIONS, division_id)
}

/// Report a unique-index rejection as a duplicate; anything else passes
/// through.
fn on_conflict(
  err: tokio_rusqlite::Error,
  resource: &'static str,
  fields: Vec<KeyField>,
) -> Error {
  let err = Error::from(err);
  if err.is_unique_violation() {
    CoreError::DuplicateKey { resource, fields }.into()
  } else {
    err
  }
}

/// Condition matching a name column case-insensitively against a
/// [`like_pattern`]. The column is folded with the same Unicode lowercase as
/// the pattern.
fn name_like(column: &str) -> String {
  format!("{FOLD_CASE_FN}({column}) LIKE ? ESCAPE '\\'")
}

// ─── OutbreakStore impl ──────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;
}

impl OutbreakStore for SqliteStore {
  // ── Districts ─────────────────────────────────────────────────────────────

  async fn add_district(&self, input: NewDistrict) -> Result<District> {
    let fields = vec![KeyField::new("districtName", &input.district_name)];
    let name = input.district_name;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO districts (district_name) VALUES (?1)",
          params![name],
        )?;
        Ok(District { district_id: conn.last_insert_rowid(), district_name: name })
      })
      .await
      .map_err(|e| on_conflict(e, District::RESOURCE, fields))
  }

  async fn get_district(&self, id: i64) -> Result<Option<District>> {
    self.find(DISTRICTS, id).await
  }

  async fn page_districts(
    &self,
    query: Option<&IdOrName>,
    request: &PageRequest,
  ) -> Result<Page<District>> {
    let filter =
      Filter::id_or_name(query, "district_id = ?", &name_like("district_name"));
    self.fetch_page(DISTRICTS, filter, request).await
  }

  async fn update_district(&self, id: i64, input: NewDistrict) -> Result<District> {
    let fields = vec![KeyField::new("districtName", &input.district_name)];
    let name = input.district_name.clone();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE districts SET district_name = ?1 WHERE district_id = ?2",
          params![name, id],
        )?)
      })
      .await
      .map_err(|e| on_conflict(e, District::RESOURCE, fields))?;

    if changed == 0 {
      return Err(missing_district(id).into());
    }
    tracing::debug!(district_id = id, "renamed district");
    Ok(District { district_id: id, district_name: input.district_name })
  }

  async fn remove_district(&self, id: i64) -> Result<District> {
    self.take(DISTRICTS, id).await
  }

  // ── Divisions ─────────────────────────────────────────────────────────────

  async fn page_divisions(
    &self,
    query: Option<&IdOrName>,
    request: &PageRequest,
  ) -> Result<Page<Division>> {
    let filter =
      Filter::id_or_name(query, "division_id = ?", &name_like("division_name"));
    self.fetch_page(DIVISIONS, filter, request).await
  }

  async fn update_division(&self, id: i64, input: DivisionUpdate) -> Result<Division> {
    let current = self
      .find(DIVISIONS, id)
      .await?
      .ok_or_else(|| missing_division(id))?;

    let mut fields = Vec::with_capacity(2);
    if let Some(district_id) = current.district_id {
      fields.push(KeyField::new("districtId", district_id));
    }
    fields.push(KeyField::new("divisionName", &input.division_name));
    let name = input.division_name.clone();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE divisions SET division_name = ?1 WHERE division_id = ?2",
          params![name, id],
        )?)
      })
      .await
      .map_err(|e| on_conflict(e, Division::RESOURCE, fields))?;

    // Removed between the read and the write.
    if changed == 0 {
      return Err(missing_division(id).into());
    }
    Ok(Division { division_name: input.division_name, ..current })
  }

  async fn remove_division(&self, id: i64) -> Result<Division> {
    self.take(DIVISIONS, id).await
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let fields = vec![KeyField::new("userName", &input.user_name)];
    let division_id = input.division_id;

    let inserted = self
      .conn
      .call(move |conn| {
        if let Some(division_id) = input.division_id {
          let known: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM divisions WHERE division_id = ?1)",
            params![division_id],
            |row| row.get(0),
          )?;
          if !known {
            return Ok(None);
          }
        }

        conn.execute(
          "INSERT INTO users (user_name, email, division_id) VALUES (?1, ?2, ?3)",
          params![input.user_name, input.email, input.division_id],
        )?;
        Ok(Some(User {
          user_id:     conn.last_insert_rowid(),
          user_name:   input.user_name,
          email:       input.email,
          division_id: input.division_id,
        }))
      })
      .await
      .map_err(|e| on_conflict(e, User::RESOURCE, fields))?;

    inserted.ok_or_else(|| missing_division(division_id.unwrap_or_default()).into())
  }

  async fn page_users(
    &self,
    query: Option<&IdOrName>,
    request: &PageRequest,
  ) -> Result<Page<User>> {
    let filter = Filter::id_or_name(query, "user_id = ?", &name_like("user_name"));
    self.fetch_page(USERS, filter, request).await
  }

  async fn update_user(&self, id: i64, input: NewUser) -> Result<User> {
    let fields = vec![KeyField::new("userName", &input.user_name)];

    let outcome = self
      .conn
      .call(move |conn| {
        if !row_exists(conn, USERS, id)? {
          return Ok(Err(missing_row(USERS, id)));
        }
        if let Some(division_id) = input.division_id
          && !row_exists(conn, DIVISIONS, division_id)?
        {
          return Ok(Err(missing_division(division_id)));
        }

        conn.execute(
          "UPDATE users SET user_name = ?1, email = ?2, division_id = ?3
           WHERE user_id = ?4",
          params![input.user_name, input.email, input.division_id, id],
        )?;
        Ok(Ok(User {
          user_id:     id,
          user_name:   input.user_name,
          email:       input.email,
          division_id: input.division_id,
        }))
      })
      .await
      .map_err(|e| on_conflict(e, User::RESOURCE, fields))?;

    Ok(outcome?)
  }

  async fn remove_user(&self, id: i64) -> Result<User> {
    self.take(USERS, id).await
  }

  // ── Alerts ────────────────────────────────────────────────────────────────

  async fn add_alert(&self, input: NewAlert) -> Result<Alert> {
    let district_id = input.district_id;

    let inserted = self
      .conn
      .call(move |conn| {
        if !district_exists(conn, input.district_id)? {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO alerts (alert_type, alert_description, district_id)
           VALUES (?1, ?2, ?3)",
          params![input.alert_type, input.alert_description, input.district_id],
        )?;
        Ok(Some(Alert {
          alert_id:          conn.last_insert_rowid(),
          alert_type:        input.alert_type,
          alert_description: input.alert_description,
          district_id:       input.district_id,
        }))
      })
      .await?;

    inserted.ok_or_else(|| missing_district(district_id).into())
  }

  async fn page_alerts(
    &self,
    query: Option<&IdOrName>,
    request: &PageRequest,
  ) -> Result<Page<Alert>> {
    let by_name = format!(
      "district_id IN (SELECT district_id FROM districts WHERE {})",
      name_like("district_name")
    );
    let filter = Filter::id_or_name(query, "district_id = ?", &by_name);
    self.fetch_page(ALERTS, filter, request).await
  }

  async fn update_alert(&self, id: i64, input: NewAlert) -> Result<Alert> {
    let outcome = self
      .conn
      .call(move |conn| {
        if !row_exists(conn, ALERTS, id)? {
          return Ok(Err(missing_row(ALERTS, id)));
        }
        if !district_exists(conn, input.district_id)? {
          return Ok(Err(missing_district(input.district_id)));
        }

        conn.execute(
          "UPDATE alerts SET alert_type = ?1, alert_description = ?2, district_id = ?3
           WHERE alert_id = ?4",
          params![input.alert_type, input.alert_description, input.district_id, id],
        )?;
        Ok(Ok(Alert {
          alert_id:          id,
          alert_type:        input.alert_type,
          alert_description: input.alert_description,
          district_id:       input.district_id,
        }))
      })
      .await?;

    Ok(outcome?)
  }

  async fn remove_alert(&self, id: i64) -> Result<Alert> {
    self.take(ALERTS, id).await
  }

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn add_article(&self, input: NewArticle) -> Result<Article> {
    let article = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO articles (title, description, image, author_name)
           VALUES (?1, ?2, ?3, ?4)",
          params![input.title, input.description, input.image, input.author_name],
        )?;
        Ok(Article {
          article_id:  conn.last_insert_rowid(),
          title:       input.title,
          description: input.description,
          image:       input.image,
          author_name: input.author_name,
        })
      })
      .await?;
    Ok(article)
  }

  async fn page_articles(
    &self,
    keyword: Option<&str>,
    request: &PageRequest,
  ) -> Result<Page<Article>> {
    let filter = match keyword {
      None => Filter::all(),
      Some(keyword) => {
        let pattern = Value::Text(like_pattern(keyword));
        Filter::new(
          &format!("{} OR {}", name_like("title"), name_like("description")),
          vec![pattern.clone(), pattern],
        )
      }
    };
    self.fetch_page(ARTICLES, filter, request).await
  }

  async fn remove_article(&self, id: i64) -> Result<Article> {
    self.take(ARTICLES, id).await
  }

  // ── Case records ──────────────────────────────────────────────────────────

  async fn page_case_records(
    &self,
    query: Option<&IdOrName>,
    request: &PageRequest,
  ) -> Result<Page<CaseRecord>> {
    let filter = Filter::id_or_name(query, "year = ?", &name_like("district_name"));
    self.fetch_page(CASE_RECORDS, filter, request).await
  }

  async fn case_records(&self) -> Result<Vec<CaseRecord>> {
    self.fetch_all(CASE_RECORDS).await
  }

  async fn remove_case_record(&self, id: i64) -> Result<CaseRecord> {
    self.take(CASE_RECORDS, id).await
  }

  // ── Case tallies ──────────────────────────────────────────────────────────

  async fn case_tallies(&self) -> Result<Vec<CaseTally>> {
    let tallies = self.fetch_all(CASE_TALLIES).await?;
    if tallies.is_empty() {
      return Err(CoreError::EmptyResult { resource: "CaseTally" }.into());
    }
    Ok(tallies)
  }

  async fn remove_case_tally(&self, id: i64) -> Result<CaseTally> {
    self.take(CASE_TALLIES, id).await
  }

  // ── Weather ───────────────────────────────────────────────────────────────

  async fn page_weather_records(
    &self,
    request: &PageRequest,
  ) -> Result<Page<WeatherRecord>> {
    self.fetch_page(WEATHER_RECORDS, Filter::all(), request).await
  }

  async fn latest_weather_record(
    &self,
    district_id: i64,
  ) -> Result<Option<WeatherRecord>> {
    let latest = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM weather_records
           WHERE district_id = ?1
           ORDER BY predict_year DESC, predict_month DESC, predict_week DESC
           LIMIT 1",
          WEATHER_RECORDS.columns
        );
        Ok(
          conn
            .query_row(&sql, params![district_id], WEATHER_RECORDS.decode)
            .optional()?,
        )
      })
      .await?;
    Ok(latest)
  }
}

// ─── Guarded inserts ─────────────────────────────────────────────────────────

impl GuardedInsert<NewDivision> for SqliteStore {
  async fn key_exists(&self, key: &(i64, String)) -> Result<bool> {
    let (district_id, name) = key.clone();
    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM divisions WHERE district_id = ?1 AND division_name = ?2
           )",
          params![district_id, name],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(exists)
  }

  async fn insert_unchecked(&self, candidate: NewDivision) -> Result<Division> {
    let district_id = candidate.district_id;

    let inserted = self
      .conn
      .call(move |conn| {
        if !district_exists(conn, candidate.district_id)? {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO divisions (division_name, district_id) VALUES (?1, ?2)",
          params![candidate.division_name, candidate.district_id],
        )?;
        Ok(Some(Division {
          division_id:   conn.last_insert_rowid(),
          division_name: candidate.division_name,
          district_id:   Some(candidate.district_id),
        }))
      })
      .await?;

    inserted.ok_or_else(|| missing_district(district_id).into())
  }
}

impl GuardedInsert<NewCaseRecord> for SqliteStore {
  async fn key_exists(&self, key: &(i64, i32, u32, Option<u32>)) -> Result<bool> {
    let (district_id, year, month, week) = *key;
    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM case_records
             WHERE district_id = ?1 AND year = ?2 AND month = ?3 AND week IS ?4
           )",
          params![district_id, year, month, week],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(exists)
  }

  /// Captures the district's current name alongside the record.
  async fn insert_unchecked(&self, candidate: NewCaseRecord) -> Result<CaseRecord> {
    candidate.validate()?;
    let district_id = candidate.district_id;

    let inserted = self
      .conn
      .call(move |conn| {
        let Some(district_name) = conn
          .query_row(
            "SELECT district_name FROM districts WHERE district_id = ?1",
            params![candidate.district_id],
            |row| row.get::<_, String>(0),
          )
          .optional()?
        else {
          return Ok(None);
        };

        conn.execute(
          "INSERT INTO case_records
             (district_id, district_name, year, month, week, case_count)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![
            candidate.district_id,
            district_name,
            candidate.year,
            candidate.month,
            candidate.week,
            candidate.case_count,
          ],
        )?;
        Ok(Some(CaseRecord {
          case_record_id: conn.last_insert_rowid(),
          district_id:    Some(candidate.district_id),
          district_name,
          year:           candidate.year,
          month:          candidate.month,
          week:           candidate.week,
          case_count:     candidate.case_count,
        }))
      })
      .await?;

    inserted.ok_or_else(|| missing_district(district_id).into())
  }
}

impl GuardedInsert<NewCaseTally> for SqliteStore {
  async fn key_exists(&self, key: &(i64, i32, &'static str)) -> Result<bool> {
    let (district_id, year, month) = *key;
    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM case_tallies
             WHERE district_id = ?1 AND year = ?2 AND month = ?3
           )",
          params![district_id, year, month],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(exists)
  }

  async fn insert_unchecked(&self, candidate: NewCaseTally) -> Result<CaseTally> {
    let district_id = candidate.district_id;

    let inserted = self
      .conn
      .call(move |conn| {
        if !district_exists(conn, candidate.district_id)? {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO case_tallies (district_id, year, month, case_count)
           VALUES (?1, ?2, ?3, ?4)",
          params![
            candidate.district_id,
            candidate.year,
            candidate.month,
            candidate.case_count,
          ],
        )?;
        Ok(Some(CaseTally {
          case_tally_id: conn.last_insert_rowid(),
          district_id:   candidate.district_id,
          year:          candidate.year,
          month:         candidate.month.to_owned(),
          case_count:    candidate.case_count,
        }))
      })
      .await?;

    inserted.ok_or_else(|| missing_district(district_id).into())
  }
}

impl GuardedInsert<NewWeatherRecord> for SqliteStore {
  async fn key_exists(&self, key: &(u32, u32, i32)) -> Result<bool> {
    let (month, week, year) = *key;
    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM weather_records
             WHERE predict_month = ?1 AND predict_week = ?2 AND predict_year = ?3
           )",
          params![month, week, year],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(exists)
  }

  async fn insert_unchecked(&self, candidate: NewWeatherRecord) -> Result<WeatherRecord> {
    let district_id = candidate.district_id;

    let inserted = self
      .conn
      .call(move |conn| {
        if !district_exists(conn, candidate.district_id)? {
          return Ok(None);
        }
        let c = &candidate.covariates;
        conn.execute(
          "INSERT INTO weather_records (
             district_id, predict_year, predict_month, predict_week,
             avg_max_temp, avg_min_temp, avg_apparent_max_temp, avg_apparent_min_temp,
             total_precipitation, avg_wind_speed, max_wind_gusts, weather_code,
             cases_last_week, cases_last_2_weeks, cases_3_week_avg, cases_5_week_avg,
             cases_diff_1_week
           ) VALUES (
             ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17
           )",
          params![
            candidate.district_id,
            candidate.predict_year,
            candidate.predict_month,
            candidate.predict_week,
            c.avg_max_temp,
            c.avg_min_temp,
            c.avg_apparent_max_temp,
            c.avg_apparent_min_temp,
            c.total_precipitation,
            c.avg_wind_speed,
            c.max_wind_gusts,
            c.weather_code,
            c.cases_last_week,
            c.cases_last_2_weeks,
            c.cases_3_week_avg,
            c.cases_5_week_avg,
            c.cases_diff_1_week,
          ],
        )?;
        Ok(Some(WeatherRecord {
          weather_record_id: conn.last_insert_rowid(),
          district_id:       candidate.district_id,
          predict_year:      candidate.predict_year,
          predict_month:     candidate.predict_month,
          predict_week:      candidate.predict_week,
          covariates:        candidate.covariates,
        }))
      })
      .await?;

    inserted.ok_or_else(|| missing_district(district_id).into())
  }
}

// ─── Guarded updates ─────────────────────────────────────────────────────────

impl GuardedUpdate<NewCaseRecord> for SqliteStore {
  async fn key_taken(&self, key: &(i64, i32, u32, Option<u32>), id: i64) -> Result<bool> {
    let (district_id, year, month, week) = *key;
    let taken = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM case_records
             WHERE district_id = ?1 AND year = ?2 AND month = ?3 AND week IS ?4
               AND case_record_id != ?5
           )",
          params![district_id, year, month, week, id],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(taken)
  }

  /// Re-captures the name of the record's (possibly new) district.
  async fn update_unchecked(&self, id: i64, candidate: NewCaseRecord) -> Result<CaseRecord> {
    candidate.validate()?;

    let outcome = self
      .conn
      .call(move |conn| {
        if !row_exists(conn, CASE_RECORDS, id)? {
          return Ok(Err(missing_row(CASE_RECORDS, id)));
        }
        let Some(district_name) = conn
          .query_row(
            "SELECT district_name FROM districts WHERE district_id = ?1",
            params![candidate.district_id],
            |row| row.get::<_, String>(0),
          )
          .optional()?
        else {
          return Ok(Err(missing_district(candidate.district_id)));
        };

        conn.execute(
          "UPDATE case_records
           SET district_id = ?1, district_name = ?2, year = ?3, month = ?4,
               week = ?5, case_count = ?6
           WHERE case_record_id = ?7",
          params![
            candidate.district_id,
            district_name,
            candidate.year,
            candidate.month,
            candidate.week,
            candidate.case_count,
            id,
          ],
        )?;
        Ok(Ok(CaseRecord {
          case_record_id: id,
          district_id:    Some(candidate.district_id),
          district_name,
          year:           candidate.year,
          month:          candidate.month,
          week:           candidate.week,
          case_count:     candidate.case_count,
        }))
      })
      .await?;

    Ok(outcome?)
  }
}

impl GuardedUpdate<NewCaseTally> for SqliteStore {
  async fn key_taken(&self, key: &(i64, i32, &'static str), id: i64) -> Result<bool> {
    let (district_id, year, month) = *key;
    let taken = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM case_tallies
             WHERE district_id = ?1 AND year = ?2 AND month = ?3
               AND case_tally_id != ?4
           )",
          params![district_id, year, month, id],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(taken)
  }

  async fn update_unchecked(&self, id: i64, candidate: NewCaseTally) -> Result<CaseTally> {
    let outcome = self
      .conn
      .call(move |conn| {
        if !row_exists(conn, CASE_TALLIES, id)? {
          return Ok(Err(missing_row(CASE_TALLIES, id)));
        }
        if !district_exists(conn, candidate.district_id)? {
          return Ok(Err(missing_district(candidate.district_id)));
        }

        conn.execute(
          "UPDATE case_tallies SET district_id = ?1, year = ?2, month = ?3, case_count = ?4
           WHERE case_tally_id = ?5",
          params![
            candidate.district_id,
            candidate.year,
            candidate.month,
            candidate.case_count,
            id,
          ],
        )?;
        Ok(Ok(CaseTally {
          case_tally_id: id,
          district_id:   candidate.district_id,
          year:          candidate.year,
          month:         candidate.month.to_owned(),
          case_count:    candidate.case_count,
        }))
      })
      .await?;

    Ok(outcome?)
  }
}
