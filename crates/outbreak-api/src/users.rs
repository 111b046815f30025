//! Handlers for `/admin/users` endpoints.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use outbreak_core::{
  page::Page,
  resolve::resolve,
  store::OutbreakStore,
  user::{NewUser, User},
};

use crate::{AppState, error::ApiError, paging::PageParams};

const DEFAULT_SORT: &str = "userId";

/// `GET /admin/users`
pub async fn list<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<User>>, ApiError> {
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_users(None, &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `GET /admin/users/search/{input}`
pub async fn search<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(input): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<User>>, ApiError> {
  let query = resolve(&input);
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_users(Some(&query), &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `POST /admin/users`
pub async fn create<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
  let user = state
    .store
    .add_user(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /admin/users/{id}`
pub async fn update<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
  let user = state
    .store
    .update_user(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(user))
}

/// `DELETE /admin/users/{id}`
pub async fn remove<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
  let user = state
    .store
    .remove_user(id)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(user_id = id, "user removed");
  Ok(Json(user))
}
