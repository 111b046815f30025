//! Handlers for district endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/public/districts` | Paged |
//! | `GET`    | `/public/districts/{id}` | 404 when unknown |
//! | `GET`    | `/public/districts/search/{input}` | Id or name fragment |
//! | `POST`   | `/admin/districts` | Body: `{"districtName":"Colombo"}` |
//! | `PUT`    | `/admin/districts/{id}` | Rename; body as for `POST` |
//! | `DELETE` | `/admin/districts/{id}` | Detaches the district's divisions |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use outbreak_core::{
  Error as DomainError,
  district::{District, NewDistrict},
  page::Page,
  resolve::resolve,
  store::OutbreakStore,
};

use crate::{AppState, error::ApiError, paging::PageParams};

const DEFAULT_SORT: &str = "districtId";

/// `GET /public/districts`
pub async fn list<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<District>>, ApiError> {
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_districts(None, &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `GET /public/districts/{id}`
pub async fn get<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<District>, ApiError> {
  let district = state
    .store
    .get_district(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| DomainError::reference_not_found("District", "districtId", id))?;
  Ok(Json(district))
}

/// `GET /public/districts/search/{input}`
pub async fn search<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(input): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<District>>, ApiError> {
  let query = resolve(&input);
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_districts(Some(&query), &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `POST /admin/districts`
pub async fn create<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewDistrict>,
) -> Result<impl IntoResponse, ApiError> {
  let district = state
    .store
    .add_district(body)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(district_id = district.district_id, "district created");
  Ok((StatusCode::CREATED, Json(district)))
}

/// `PUT /admin/districts/{id}`
pub async fn update<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewDistrict>,
) -> Result<Json<District>, ApiError> {
  let district = state
    .store
    .update_district(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(district))
}

/// `DELETE /admin/districts/{id}`
pub async fn remove<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<District>, ApiError> {
  let district = state
    .store
    .remove_district(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(district))
}
