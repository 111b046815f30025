//! Handlers for weather covariates.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/public/weather` | Paged |
//! | `GET`  | `/public/districts/{id}/weather/latest` | Latest year, month, week |
//! | `POST` | `/admin/districts/{id}/weather` | One record per prediction slot |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use outbreak_core::{
  Error as DomainError,
  case::month_name,
  guard::check_and_insert,
  page::{Page, Sortable as _},
  store::OutbreakStore,
  weather::{NewWeatherRecord, WeatherCovariates, WeatherRecord},
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, paging::PageParams};

/// `GET /public/weather`
pub async fn list<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<WeatherRecord>>, ApiError> {
  let request = params.into_request("weatherRecordId", state.default_page_size);
  let page = state
    .store
    .page_weather_records(&request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `GET /public/districts/{id}/weather/latest`
pub async fn latest<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(district_id): Path<i64>,
) -> Result<Json<WeatherRecord>, ApiError> {
  let record = state
    .store
    .latest_weather_record(district_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(DomainError::EmptyResult { resource: WeatherRecord::RESOURCE })?;
  Ok(Json(record))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub predict_year:  i32,
  pub predict_month: u32,
  pub predict_week:  u32,
  #[serde(flatten)]
  pub covariates:    WeatherCovariates,
}

/// `POST /admin/districts/{id}/weather`
pub async fn create<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(district_id): Path<i64>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  month_name(body.predict_month)?;
  let candidate = NewWeatherRecord {
    district_id,
    predict_year: body.predict_year,
    predict_month: body.predict_month,
    predict_week: body.predict_week,
    covariates: body.covariates,
  };
  let record = check_and_insert(state.store.as_ref(), candidate)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}
