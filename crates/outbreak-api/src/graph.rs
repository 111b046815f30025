//! Dashboard aggregates, computed per request from the stored case records.
//!
//! Every endpoint answers 404 with `"no data available"` while the store
//! holds no case records.

use axum::{Json, extract::State};
use outbreak_core::{
  aggregate::{self, DistrictTotal, MonthlyTotal, WeeklyTotal, YearlyTotal},
  store::OutbreakStore,
};

use crate::{AppState, error::ApiError};

/// `GET /public/graph/monthly`: latest year, January first.
pub async fn monthly<S: OutbreakStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<MonthlyTotal>>, ApiError> {
  let totals = aggregate::monthly_totals_for_latest_year(state.store.as_ref())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(totals))
}

/// `GET /public/graph/week`: latest year, ascending week.
pub async fn weekly<S: OutbreakStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<WeeklyTotal>>, ApiError> {
  let totals = aggregate::weekly_totals_for_latest_year(state.store.as_ref())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(totals))
}

/// `GET /public/graph/district`: latest year, highest total first.
pub async fn district<S: OutbreakStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<DistrictTotal>>, ApiError> {
  let totals = aggregate::district_totals_for_latest_year(state.store.as_ref())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(totals))
}

/// `GET /public/graph/year`: every year, ascending.
pub async fn yearly<S: OutbreakStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<YearlyTotal>>, ApiError> {
  let totals = aggregate::yearly_totals(state.store.as_ref())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(totals))
}
