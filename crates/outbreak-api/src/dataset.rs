//! Handlers for the case-record time series ("dataset").
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/public/dataset` | Paged |
//! | `GET`    | `/public/dataset/district/{input}` | A number is a **year**, anything else a district name fragment |
//! | `POST`   | `/admin/dataset` | Unique per district, year, month and week |
//! | `PUT`    | `/admin/dataset/{id}` | Same uniqueness, ignoring the record itself |
//! | `DELETE` | `/admin/dataset/{id}` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use outbreak_core::{
  case::{CaseRecord, NewCaseRecord},
  guard::{check_and_insert, check_and_update},
  page::Page,
  resolve::resolve,
  store::OutbreakStore,
};

use crate::{AppState, error::ApiError, paging::PageParams};

const DEFAULT_SORT: &str = "caseRecordId";

/// `GET /public/dataset`
pub async fn list<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<CaseRecord>>, ApiError> {
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_case_records(None, &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `GET /public/dataset/district/{input}`
pub async fn search<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(input): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<CaseRecord>>, ApiError> {
  let query = resolve(&input);
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_case_records(Some(&query), &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `POST /admin/dataset`
pub async fn create<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewCaseRecord>,
) -> Result<impl IntoResponse, ApiError> {
  body.validate()?;
  let record = check_and_insert(state.store.as_ref(), body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /admin/dataset/{id}`
pub async fn update<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewCaseRecord>,
) -> Result<Json<CaseRecord>, ApiError> {
  body.validate()?;
  let record = check_and_update(state.store.as_ref(), id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(record))
}

/// `DELETE /admin/dataset/{id}`
pub async fn remove<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<CaseRecord>, ApiError> {
  let record = state
    .store
    .remove_case_record(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(record))
}
