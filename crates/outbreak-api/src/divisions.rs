//! Handlers for division endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/public/divisions` | Paged |
//! | `GET`    | `/public/divisions/search/{input}` | Id or name fragment |
//! | `POST`   | `/admin/divisions` | Name unique within the district |
//! | `PUT`    | `/admin/divisions/{id}` | Rename; body: `{"divisionName":"..."}` |
//! | `DELETE` | `/admin/divisions/{id}` | Detaches the division's users |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use outbreak_core::{
  district::{Division, DivisionUpdate, NewDivision},
  guard::check_and_insert,
  page::Page,
  resolve::resolve,
  store::OutbreakStore,
};

use crate::{AppState, error::ApiError, paging::PageParams};

const DEFAULT_SORT: &str = "divisionId";

/// `GET /public/divisions`
pub async fn list<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<Division>>, ApiError> {
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_divisions(None, &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `GET /public/divisions/search/{input}`
pub async fn search<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(input): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<Division>>, ApiError> {
  let query = resolve(&input);
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_divisions(Some(&query), &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `POST /admin/divisions` with body `{"divisionName":..., "districtId":...}`
pub async fn create<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewDivision>,
) -> Result<impl IntoResponse, ApiError> {
  let division = check_and_insert(state.store.as_ref(), body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(division)))
}

/// `PUT /admin/divisions/{id}`
pub async fn update<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<DivisionUpdate>,
) -> Result<Json<Division>, ApiError> {
  let division = state
    .store
    .update_division(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(division))
}

/// `DELETE /admin/divisions/{id}`
pub async fn remove<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Division>, ApiError> {
  let division = state
    .store
    .remove_division(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(division))
}
