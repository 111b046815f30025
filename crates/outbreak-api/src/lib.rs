//! JSON REST API for the outbreak tracker.
//!
//! Exposes an axum [`Router`] backed by any
//! [`outbreak_core::store::OutbreakStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility; the `/public` and `/admin` prefixes only
//! group routes for whoever mounts them.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", outbreak_api::api_router(state))
//! ```

pub mod alerts;
pub mod articles;
pub mod cases;
pub mod dataset;
pub mod districts;
pub mod divisions;
pub mod error;
pub mod graph;
pub mod paging;
pub mod users;
pub mod weather;

use std::{num::NonZeroU32, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use outbreak_core::{page::DEFAULT_PAGE_SIZE, store::OutbreakStore};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:             Arc<S>,
  /// Used when a listing request omits `pageSize`.
  pub default_page_size: NonZeroU32,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:             Arc::clone(&self.store),
      default_page_size: self.default_page_size,
    }
  }
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      default_page_size: NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
    }
  }

  pub fn with_default_page_size(mut self, size: NonZeroU32) -> Self {
    self.default_page_size = size;
    self
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: OutbreakStore + 'static,
{
  Router::new()
    // Districts
    .route("/public/districts", get(districts::list::<S>))
    .route("/public/districts/{id}", get(districts::get::<S>))
    .route("/public/districts/search/{input}", get(districts::search::<S>))
    .route("/admin/districts", post(districts::create::<S>))
    .route(
      "/admin/districts/{id}",
      put(districts::update::<S>).delete(districts::remove::<S>),
    )
    // Divisions
    .route("/public/divisions", get(divisions::list::<S>))
    .route("/public/divisions/search/{input}", get(divisions::search::<S>))
    .route("/admin/divisions", post(divisions::create::<S>))
    .route(
      "/admin/divisions/{id}",
      put(divisions::update::<S>).delete(divisions::remove::<S>),
    )
    // Users
    .route("/admin/users", get(users::list::<S>).post(users::create::<S>))
    .route("/admin/users/search/{input}", get(users::search::<S>))
    .route("/admin/users/{id}", put(users::update::<S>).delete(users::remove::<S>))
    // Alerts
    .route("/public/alerts", get(alerts::list::<S>))
    .route("/public/alerts/district/{input}", get(alerts::by_district::<S>))
    .route("/admin/districts/{id}/alerts", post(alerts::create::<S>))
    .route("/admin/alerts/{id}", put(alerts::update::<S>).delete(alerts::remove::<S>))
    // Articles
    .route("/public/articles", get(articles::list::<S>))
    .route("/admin/articles", post(articles::create::<S>))
    .route("/admin/articles/{id}", delete(articles::remove::<S>))
    // Case records
    .route("/public/dataset", get(dataset::list::<S>))
    .route("/public/dataset/district/{input}", get(dataset::search::<S>))
    .route("/admin/dataset", post(dataset::create::<S>))
    .route("/admin/dataset/{id}", put(dataset::update::<S>).delete(dataset::remove::<S>))
    // Case tallies
    .route("/public/cases", get(cases::list::<S>))
    .route("/admin/districts/{id}/cases", post(cases::create::<S>))
    .route("/admin/cases/{id}", put(cases::update::<S>).delete(cases::remove::<S>))
    // Weather
    .route("/public/weather", get(weather::list::<S>))
    .route("/public/districts/{id}/weather/latest", get(weather::latest::<S>))
    .route("/admin/districts/{id}/weather", post(weather::create::<S>))
    // Dashboards
    .route("/public/graph/monthly", get(graph::monthly::<S>))
    .route("/public/graph/week", get(graph::weekly::<S>))
    .route("/public/graph/district", get(graph::district::<S>))
    .route("/public/graph/year", get(graph::yearly::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
