//! Handlers for alert endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/public/alerts` | Paged |
//! | `GET`    | `/public/alerts/district/{input}` | District id or district name fragment |
//! | `POST`   | `/admin/districts/{id}/alerts` | Body: `{"alertType":..., "alertDescription":...}` |
//! | `PUT`    | `/admin/alerts/{id}` | Body also carries `districtId`; the alert may move |
//! | `DELETE` | `/admin/alerts/{id}` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use outbreak_core::{
  notice::{Alert, NewAlert},
  page::Page,
  resolve::resolve,
  store::OutbreakStore,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, paging::PageParams};

const DEFAULT_SORT: &str = "alertId";

/// `GET /public/alerts`
pub async fn list<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<Alert>>, ApiError> {
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_alerts(None, &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

/// `GET /public/alerts/district/{input}`
pub async fn by_district<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(input): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<Alert>>, ApiError> {
  let query = resolve(&input);
  let request = params.into_request(DEFAULT_SORT, state.default_page_size);
  let page = state
    .store
    .page_alerts(Some(&query), &request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub alert_type:        String,
  pub alert_description: String,
}

/// `POST /admin/districts/{id}/alerts`
pub async fn create<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(district_id): Path<i64>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let alert = state
    .store
    .add_alert(NewAlert {
      district_id,
      alert_type: body.alert_type,
      alert_description: body.alert_description,
    })
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(alert_id = alert.alert_id, district_id, "alert issued");
  Ok((StatusCode::CREATED, Json(alert)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub district_id:       i64,
  pub alert_type:        String,
  pub alert_description: String,
}

/// `PUT /admin/alerts/{id}`
pub async fn update<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Alert>, ApiError> {
  let alert = state
    .store
    .update_alert(id, NewAlert {
      district_id:       body.district_id,
      alert_type:        body.alert_type,
      alert_description: body.alert_description,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(alert))
}

/// `DELETE /admin/alerts/{id}`
pub async fn remove<S: OutbreakStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Alert>, ApiError> {
  let alert = state
    .store
    .remove_alert(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(alert))
}
