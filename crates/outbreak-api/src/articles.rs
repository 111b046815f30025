//! Handlers for health articles.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use outbreak_core::{
  notice::{Article, NewArticle},
  page::Page,
  store::OutbreakStore,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, paging::PageParams};

#[derive(Debug, Default, Deserialize)]
pub struct KeywordParams {
  /// Matched against title or description, ignoring case.
  pub keyword: Option<String>,
}

/// `GET /public/articles[?keyword=...]`
pub async fn list<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
  Query(search): Query<KeywordParams>,
) -> Result<Json<Page<Article>>, ApiError> {
  let request = params.into_request("articleId", state.default_page_size);
  let page = state
    .store
    .page_articles(search.keyword.as_deref(), &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `POST /admin/articles`
pub async fn create<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewArticle>,
) -> Result<impl IntoResponse, ApiError> {
  let article = state
    .store
    .add_article(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(article)))
}

/// `DELETE /admin/articles/{id}`
pub async fn remove<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Article>, ApiError> {
  let article = state
    .store
    .remove_article(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(article))
}
