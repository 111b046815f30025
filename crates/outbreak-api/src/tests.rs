use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use outbreak_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(Arc::new(store))
}

async fn oneshot_raw(
  state:  AppState<SqliteStore>,
  method: &str,
  uri:    &str,
  body:   Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(state)
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();

  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
  };
  (status, value)
}

async fn create_district(state: &AppState<SqliteStore>, name: &str) -> i64 {
  let (status, body) = oneshot_raw(
    state.clone(),
    "POST",
    "/admin/districts",
    Some(json!({ "districtName": name })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["districtId"].as_i64().unwrap()
}

async fn create_record(
  state: &AppState<SqliteStore>,
  district_id: i64,
  year: i32,
  month: u32,
  week: u32,
  cases: u32,
) -> i64 {
  let (status, body) = oneshot_raw(
    state.clone(),
    "POST",
    "/admin/dataset",
    Some(json!({
      "districtId": district_id,
      "year": year,
      "month": month,
      "week": week,
      "caseCount": cases,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["caseRecordId"].as_i64().unwrap()
}

// ── Districts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_district_is_conflict() {
  let state = make_state().await;
  create_district(&state, "Colombo").await;

  let (status, body) = oneshot_raw(
    state,
    "POST",
    "/admin/districts",
    Some(json!({ "districtName": "Colombo" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["resource"], "District");
}

#[tokio::test]
async fn empty_listing_is_not_found_with_json_error() {
  let state = make_state().await;
  let (status, body) = oneshot_raw(state, "GET", "/public/districts", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "no District found");
  assert_eq!(body["resource"], "District");
}

#[tokio::test]
async fn listing_returns_page_envelope() {
  let state = make_state().await;
  for name in ["Galle", "Matara", "Hambantota"] {
    create_district(&state, name).await;
  }

  let (status, body) = oneshot_raw(
    state,
    "GET",
    "/public/districts?pageNumber=1&pageSize=2&sortBy=districtName&sortOrder=asc",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["pageNumber"], 1);
  assert_eq!(body["pageSize"], 2);
  assert_eq!(body["totalElements"], 3);
  assert_eq!(body["totalPages"], 2);
  assert_eq!(body["isLastPage"], true);
  assert_eq!(body["content"][0]["districtName"], "Matara");
}

#[tokio::test]
async fn unknown_sort_field_is_bad_request() {
  let state = make_state().await;
  create_district(&state, "Kandy").await;

  let (status, body) =
    oneshot_raw(state, "GET", "/public/districts?sortBy=password", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["field"], "password");
}

#[tokio::test]
async fn zero_page_size_is_rejected() {
  let state = make_state().await;
  create_district(&state, "Kandy").await;

  let (status, _) = oneshot_raw(state, "GET", "/public/districts?pageSize=0", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_accepts_id_or_name() {
  let state = make_state().await;
  create_district(&state, "Nuwara Eliya").await;
  let id = create_district(&state, "Badulla").await;

  let (status, body) =
    oneshot_raw(state.clone(), "GET", &format!("/public/districts/search/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["content"][0]["districtName"], "Badulla");

  let (status, body) =
    oneshot_raw(state.clone(), "GET", "/public/districts/search/ELIYA", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["totalElements"], 1);
  assert_eq!(body["content"][0]["districtName"], "Nuwara Eliya");

  let (status, _) = oneshot_raw(state, "GET", "/public/districts/search/Jaffna", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_missing_district_is_not_found() {
  let state = make_state().await;
  let (status, body) = oneshot_raw(state, "DELETE", "/admin/districts/42", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["value"], 42);
}

#[tokio::test]
async fn get_district_by_id() {
  let state = make_state().await;
  let id = create_district(&state, "Jaffna").await;

  let (status, body) =
    oneshot_raw(state.clone(), "GET", &format!("/public/districts/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["districtName"], "Jaffna");

  let (status, body) = oneshot_raw(state, "GET", "/public/districts/404", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["resource"], "District");
  assert_eq!(body["value"], 404);
}

#[tokio::test]
async fn renaming_district_onto_taken_name_is_conflict() {
  let state = make_state().await;
  let id = create_district(&state, "Kandy").await;
  create_district(&state, "Galle").await;
  let uri = format!("/admin/districts/{id}");

  let (status, body) = oneshot_raw(
    state.clone(),
    "PUT",
    &uri,
    Some(json!({ "districtName": "Galle" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["fields"][0]["value"], "Galle");

  let (status, body) =
    oneshot_raw(state, "PUT", &uri, Some(json!({ "districtName": "Nuwara" }))).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["districtName"], "Nuwara");
}

// ── Divisions ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn renaming_missing_division_is_not_found() {
  let state = make_state().await;
  let (status, body) = oneshot_raw(
    state,
    "PUT",
    "/admin/divisions/3",
    Some(json!({ "divisionName": "Kesbewa" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["resource"], "Division");
}

// ── Users and articles ────────────────────────────────────────────────────────

#[tokio::test]
async fn user_update_and_delete() {
  let state = make_state().await;
  let (status, body) = oneshot_raw(
    state.clone(),
    "POST",
    "/admin/users",
    Some(json!({ "userName": "kamala", "email": "k@example.org" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  let uri = format!("/admin/users/{}", body["userId"]);

  let (status, body) = oneshot_raw(
    state.clone(),
    "PUT",
    &uri,
    Some(json!({ "userName": "kamala", "email": "kamala@example.org", "divisionId": 9 })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["resource"], "Division");

  let (status, body) = oneshot_raw(state.clone(), "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["email"], "k@example.org");

  let (status, _) = oneshot_raw(state, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn article_delete() {
  let state = make_state().await;
  let (status, body) = oneshot_raw(
    state.clone(),
    "POST",
    "/admin/articles",
    Some(json!({
      "title": "Hydration",
      "description": "Drink water",
      "authorName": "Health Office",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  let uri = format!("/admin/articles/{}", body["articleId"]);

  let (status, body) = oneshot_raw(state.clone(), "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["title"], "Hydration");

  let (status, body) = oneshot_raw(state, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["resource"], "Article");
}

#[tokio::test]
async fn division_needs_existing_district() {
  let state = make_state().await;
  let (status, body) = oneshot_raw(
    state,
    "POST",
    "/admin/divisions",
    Some(json!({ "divisionName": "Kesbewa", "districtId": 7 })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["resource"], "District");
}

// ── Case tallies ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_tally_is_conflict() {
  let state = make_state().await;
  let id = create_district(&state, "Colombo").await;
  let uri = format!("/admin/districts/{id}/cases");

  let (status, body) = oneshot_raw(
    state.clone(),
    "POST",
    &uri,
    Some(json!({ "year": 2024, "month": "March", "caseCount": 5 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(body["month"], "March");

  let (status, body) = oneshot_raw(
    state,
    "POST",
    &uri,
    Some(json!({ "year": 2024, "month": "mar", "caseCount": 9 })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["resource"], "CaseTally");
  assert_eq!(body["fields"][2]["value"], "March");
}

#[tokio::test]
async fn tally_update_and_delete() {
  let state = make_state().await;
  let d = create_district(&state, "Colombo").await;
  let uri = format!("/admin/districts/{d}/cases");
  let mut ids = Vec::new();
  for month in ["March", "April"] {
    let (status, body) = oneshot_raw(
      state.clone(),
      "POST",
      &uri,
      Some(json!({ "year": 2024, "month": month, "caseCount": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    ids.push(body["caseTallyId"].as_i64().unwrap());
  }
  let march = format!("/admin/cases/{}", ids[0]);

  let (status, body) = oneshot_raw(
    state.clone(),
    "PUT",
    &march,
    Some(json!({ "districtId": d, "year": 2024, "month": "apr", "caseCount": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["resource"], "CaseTally");

  let (status, body) = oneshot_raw(
    state.clone(),
    "PUT",
    &march,
    Some(json!({ "districtId": d, "year": 2024, "month": "MAR", "caseCount": 11 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["caseCount"], 11);
  assert_eq!(body["month"], "March");

  let (status, _) = oneshot_raw(state.clone(), "DELETE", &march, None).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = oneshot_raw(state, "GET", "/public/cases", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn tally_with_unknown_month_is_bad_request() {
  let state = make_state().await;
  let id = create_district(&state, "Colombo").await;
  let (status, body) = oneshot_raw(
    state,
    "POST",
    &format!("/admin/districts/{id}/cases"),
    Some(json!({ "year": 2024, "month": "Smarch", "caseCount": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["value"], "Smarch");
}

// ── Dataset and dashboards ────────────────────────────────────────────────────

#[tokio::test]
async fn dashboards_without_records_are_not_found() {
  let state = make_state().await;
  for uri in [
    "/public/graph/monthly",
    "/public/graph/week",
    "/public/graph/district",
    "/public/graph/year",
  ] {
    let (status, body) = oneshot_raw(state.clone(), "GET", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    assert_eq!(body["error"], "no data available");
  }
}

#[tokio::test]
async fn dashboards_aggregate_latest_year() {
  let state = make_state().await;
  let d1 = create_district(&state, "D1").await;
  let d2 = create_district(&state, "D2").await;
  create_record(&state, d1, 2023, 1, 1, 10).await;
  create_record(&state, d1, 2024, 1, 1, 5).await;
  create_record(&state, d2, 2024, 1, 2, 7).await;

  let (status, body) = oneshot_raw(state.clone(), "GET", "/public/graph/monthly", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!([{ "id": 1, "month": "January", "year": 2024, "totalCases": 12 }])
  );

  let (_, body) = oneshot_raw(state.clone(), "GET", "/public/graph/district", None).await;
  assert_eq!(body[0]["districtName"], "D2");
  assert_eq!(body[1]["districtName"], "D1");

  let (_, body) = oneshot_raw(state.clone(), "GET", "/public/graph/week", None).await;
  assert_eq!(body[0]["week"], 1);
  assert_eq!(body[1]["week"], 2);

  let (_, body) = oneshot_raw(state, "GET", "/public/graph/year", None).await;
  assert_eq!(
    body,
    json!([
      { "id": 1, "year": 2023, "totalCases": 10 },
      { "id": 2, "year": 2024, "totalCases": 12 },
    ])
  );
}

#[tokio::test]
async fn dataset_search_treats_number_as_year() {
  let state = make_state().await;
  let d = create_district(&state, "Ratnapura").await;
  create_record(&state, d, 2023, 5, 20, 3).await;
  create_record(&state, d, 2024, 5, 20, 4).await;

  let (status, body) =
    oneshot_raw(state.clone(), "GET", "/public/dataset/district/2024", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["totalElements"], 1);
  assert_eq!(body["content"][0]["caseCount"], 4);

  let (_, body) = oneshot_raw(state, "GET", "/public/dataset/district/ratna", None).await;
  assert_eq!(body["totalElements"], 2);
}

#[tokio::test]
async fn duplicate_case_record_is_conflict() {
  let state = make_state().await;
  let d = create_district(&state, "Kegalle").await;
  create_record(&state, d, 2024, 3, 11, 2).await;

  let (status, body) = oneshot_raw(
    state,
    "POST",
    "/admin/dataset",
    Some(json!({ "districtId": d, "year": 2024, "month": 3, "week": 11, "caseCount": 8 })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["resource"], "CaseRecord");
}

#[tokio::test]
async fn case_record_update_is_guarded() {
  let state = make_state().await;
  let d = create_district(&state, "Kegalle").await;
  let first = create_record(&state, d, 2024, 3, 10, 2).await;
  create_record(&state, d, 2024, 3, 11, 4).await;
  let uri = format!("/admin/dataset/{first}");

  let (status, body) = oneshot_raw(
    state.clone(),
    "PUT",
    &uri,
    Some(json!({ "districtId": d, "year": 2024, "month": 3, "week": 11, "caseCount": 8 })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["resource"], "CaseRecord");

  let (status, body) = oneshot_raw(
    state,
    "PUT",
    &uri,
    Some(json!({ "districtId": d, "year": 2024, "month": 3, "week": 10, "caseCount": 8 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["caseCount"], 8);
  assert_eq!(body["districtName"], "Kegalle");
}

// ── Weather ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_weather_round_trip() {
  let state = make_state().await;
  let d = create_district(&state, "Jaffna").await;
  let uri = format!("/admin/districts/{d}/weather");

  let (status, _) = oneshot_raw(
    state.clone(),
    "GET",
    &format!("/public/districts/{d}/weather/latest"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  for (month, week) in [(1, 2), (2, 6)] {
    let (status, body) = oneshot_raw(
      state.clone(),
      "POST",
      &uri,
      Some(json!({
        "predictYear": 2024,
        "predictMonth": month,
        "predictWeek": week,
        "avgMaxTemp": 31,
        "cases3WeekAvg": 4.5,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
  }

  let (status, body) = oneshot_raw(
    state,
    "GET",
    &format!("/public/districts/{d}/weather/latest"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["predictMonth"], 2);
  assert_eq!(body["predictWeek"], 6);
  assert_eq!(body["avgMaxTemp"], 31);
  assert_eq!(body["cases3WeekAvg"], 4.5);
}

#[tokio::test]
async fn weather_with_bad_month_is_rejected() {
  let state = make_state().await;
  let d = create_district(&state, "Mannar").await;
  let (status, _) = oneshot_raw(
    state,
    "POST",
    &format!("/admin/districts/{d}/weather"),
    Some(json!({ "predictYear": 2024, "predictMonth": 13, "predictWeek": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}
