//! The `OutbreakStore` trait and its supporting error contract.
//!
//! The trait is implemented by storage backends (e.g.
//! `outbreak-store-sqlite`). Higher layers (`outbreak-api`) depend on this
//! abstraction, not on any concrete backend, and receive the store handle
//! explicitly.

use std::future::Future;

use crate::{
  Error,
  case::{CaseRecord, CaseTally, NewCaseRecord, NewCaseTally},
  district::{District, Division, DivisionUpdate, NewDistrict, NewDivision},
  guard::{GuardedInsert, GuardedUpdate},
  notice::{Alert, Article, NewAlert, NewArticle},
  page::{Page, PageRequest},
  resolve::IdOrName,
  user::{NewUser, User},
  weather::{NewWeatherRecord, WeatherRecord},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// What every backend error must expose so callers can classify it without
/// knowing the backend.
pub trait StoreError:
  std::error::Error + From<Error> + Send + Sync + 'static
{
  /// The domain condition carried by this error, if it is one.
  fn domain(&self) -> Option<&Error>;

  /// True when the backend rejected a write because of a unique index.
  fn is_unique_violation(&self) -> bool;
}

/// Base trait shared by [`OutbreakStore`] and every [`GuardedInsert`] impl.
pub trait RecordStore: Send + Sync {
  type Error: StoreError;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an outbreak record store backend.
///
/// Every `page_*` method validates the request's sort field for its resource
/// and builds the envelope with [`Page::from_slice`], so an empty match is
/// reported as [`Error::EmptyResult`].
///
/// Inserts of keyed records (divisions, case records, tallies, weather) go
/// through [`crate::guard::check_and_insert`] via the [`GuardedInsert`]
/// supertraits; updates of case records and tallies go through
/// [`crate::guard::check_and_update`].
///
/// Every `update_*` and `remove_*` fails with `ReferenceNotFound` when the
/// target row does not exist.
pub trait OutbreakStore:
  RecordStore
  + GuardedInsert<NewDivision>
  + GuardedInsert<NewCaseRecord>
  + GuardedInsert<NewCaseTally>
  + GuardedInsert<NewWeatherRecord>
  + GuardedUpdate<NewCaseRecord>
  + GuardedUpdate<NewCaseTally>
{
  // ── Districts ─────────────────────────────────────────────────────────

  /// Fails with `DuplicateKey` if the name is taken.
  fn add_district(
    &self,
    input: NewDistrict,
  ) -> impl Future<Output = Result<District, Self::Error>> + Send + '_;

  fn get_district(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<District>, Self::Error>> + Send + '_;

  /// `query`: `Id` compares `districtId`, `Name` the district name.
  fn page_districts<'a>(
    &'a self,
    query: Option<&'a IdOrName>,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<District>, Self::Error>> + Send + 'a;

  /// Rename a district. Fails with `DuplicateKey` if the name is taken.
  /// Case records keep the name captured when they were written.
  fn update_district(
    &self,
    id: i64,
    input: NewDistrict,
  ) -> impl Future<Output = Result<District, Self::Error>> + Send + '_;

  /// Delete a district, detaching (not deleting) its divisions.
  fn remove_district(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<District, Self::Error>> + Send + '_;

  // ── Divisions ─────────────────────────────────────────────────────────

  /// `query`: `Id` compares `divisionId`, `Name` the division name.
  fn page_divisions<'a>(
    &'a self,
    query: Option<&'a IdOrName>,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<Division>, Self::Error>> + Send + 'a;

  /// Rename a division. Fails with `DuplicateKey` if its district already
  /// has a division by that name.
  fn update_division(
    &self,
    id: i64,
    input: DivisionUpdate,
  ) -> impl Future<Output = Result<Division, Self::Error>> + Send + '_;

  /// Delete a division, detaching (not deleting) its users.
  fn remove_division(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Division, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Fails with `ReferenceNotFound` for an unknown division and
  /// `DuplicateKey` for a taken user name.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// `query`: `Id` compares `userId`, `Name` the user name.
  fn page_users<'a>(
    &'a self,
    query: Option<&'a IdOrName>,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<User>, Self::Error>> + Send + 'a;

  /// Same checks as [`Self::add_user`].
  fn update_user(
    &self,
    id: i64,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn remove_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Alerts ────────────────────────────────────────────────────────────

  fn add_alert(
    &self,
    input: NewAlert,
  ) -> impl Future<Output = Result<Alert, Self::Error>> + Send + '_;

  /// `query`: `Id` compares the alert's `districtId`, `Name` the name of the
  /// alert's district.
  fn page_alerts<'a>(
    &'a self,
    query: Option<&'a IdOrName>,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<Alert>, Self::Error>> + Send + 'a;

  /// The alert may move to another district, which must exist.
  fn update_alert(
    &self,
    id: i64,
    input: NewAlert,
  ) -> impl Future<Output = Result<Alert, Self::Error>> + Send + '_;

  fn remove_alert(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Alert, Self::Error>> + Send + '_;

  // ── Articles ──────────────────────────────────────────────────────────

  fn add_article(
    &self,
    input: NewArticle,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  /// `keyword` matches title or description, case-insensitively.
  fn page_articles<'a>(
    &'a self,
    keyword: Option<&'a str>,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<Article>, Self::Error>> + Send + 'a;

  fn remove_article(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  // ── Case records ──────────────────────────────────────────────────────

  /// `query`: `Id` compares the record's **year**, `Name` the district name.
  fn page_case_records<'a>(
    &'a self,
    query: Option<&'a IdOrName>,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<CaseRecord>, Self::Error>> + Send + 'a;

  /// Every case record, read in one pass. Input to the aggregation engine.
  fn case_records(
    &self,
  ) -> impl Future<Output = Result<Vec<CaseRecord>, Self::Error>> + Send + '_;

  fn remove_case_record(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<CaseRecord, Self::Error>> + Send + '_;

  // ── Case tallies ──────────────────────────────────────────────────────

  fn case_tallies(
    &self,
  ) -> impl Future<Output = Result<Vec<CaseTally>, Self::Error>> + Send + '_;

  fn remove_case_tally(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<CaseTally, Self::Error>> + Send + '_;

  // ── Weather ───────────────────────────────────────────────────────────

  fn page_weather_records<'a>(
    &'a self,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<WeatherRecord>, Self::Error>> + Send + 'a;

  /// The most recent prediction slot (year, month, week) for a district.
  fn latest_weather_record(
    &self,
    district_id: i64,
  ) -> impl Future<Output = Result<Option<WeatherRecord>, Self::Error>> + Send + '_;
}
