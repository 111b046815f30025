//! Public-facing notices: district alerts and health articles.

use serde::{Deserialize, Serialize};

use crate::page::Sortable;

// ─── Alert ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
  pub alert_id:          i64,
  pub alert_type:        String,
  pub alert_description: String,
  pub district_id:       i64,
}

impl Sortable for Alert {
  const RESOURCE: &'static str = "Alert";
  const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
    ("alertId", "alert_id"),
    ("alertType", "alert_type"),
    ("districtId", "district_id"),
  ];
}

#[derive(Debug, Clone)]
pub struct NewAlert {
  pub district_id:       i64,
  pub alert_type:        String,
  pub alert_description: String,
}

// ─── Article ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
  pub article_id:  i64,
  pub title:       String,
  pub description: String,
  pub image:       Option<String>,
  pub author_name: String,
}

impl Sortable for Article {
  const RESOURCE: &'static str = "Article";
  const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
    ("articleId", "article_id"),
    ("title", "title"),
    ("authorName", "author_name"),
  ];
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
  pub title:       String,
  pub description: String,
  #[serde(default)]
  pub image:       Option<String>,
  pub author_name: String,
}
