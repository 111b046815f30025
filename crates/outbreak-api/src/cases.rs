//! Handlers for monthly case tallies.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use outbreak_core::{
  case::{CaseTally, NewCaseTally},
  guard::{check_and_insert, check_and_update},
  store::OutbreakStore,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub year:       i32,
  /// Month name or three-letter abbreviation, any case.
  pub month:      String,
  pub case_count: u32,
}

/// `POST /admin/districts/{id}/cases`
pub async fn create<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(district_id): Path<i64>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let tally = NewCaseTally::new(district_id, body.year, &body.month, body.case_count)?;
  let stored = check_and_insert(state.store.as_ref(), tally)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(stored)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub district_id: i64,
  pub year:        i32,
  pub month:       String,
  pub case_count:  u32,
}

/// `PUT /admin/cases/{id}`
pub async fn update<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<CaseTally>, ApiError> {
  let tally = NewCaseTally::new(body.district_id, body.year, &body.month, body.case_count)?;
  let stored = check_and_update(state.store.as_ref(), id, tally)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stored))
}

/// `DELETE /admin/cases/{id}`
pub async fn remove<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<CaseTally>, ApiError> {
  let tally = state
    .store
    .remove_case_tally(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(tally))
}

/// `GET /public/cases`
pub async fn list<S: OutbreakStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<CaseTally>>, ApiError> {
  let tallies = state
    .store
    .case_tallies()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(tallies))
}
