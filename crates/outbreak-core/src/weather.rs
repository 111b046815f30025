//! Weather covariates recorded per district and prediction week.

use serde::{Deserialize, Serialize};

use crate::{error::KeyField, guard::CompositeKey, page::Sortable};

/// The measured and lagged inputs handed to the case-prediction model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCovariates {
  pub avg_max_temp:          Option<i32>,
  pub avg_min_temp:          Option<i32>,
  pub avg_apparent_max_temp: Option<i32>,
  pub avg_apparent_min_temp: Option<i32>,
  pub total_precipitation:   Option<i32>,
  pub avg_wind_speed:        Option<i32>,
  pub max_wind_gusts:        Option<i32>,
  pub weather_code:          Option<i32>,
  pub cases_last_week:       Option<i32>,
  #[serde(rename = "casesLast2Weeks")]
  pub cases_last_2_weeks:    Option<i32>,
  #[serde(rename = "cases3WeekAvg")]
  pub cases_3_week_avg:      Option<f64>,
  #[serde(rename = "cases5WeekAvg")]
  pub cases_5_week_avg:      Option<f64>,
  #[serde(rename = "casesDiff1Week")]
  pub cases_diff_1_week:     Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
  pub weather_record_id: i64,
  pub district_id:       i64,
  pub predict_year:      i32,
  pub predict_month:     u32,
  pub predict_week:      u32,
  #[serde(flatten)]
  pub covariates:        WeatherCovariates,
}

impl Sortable for WeatherRecord {
  const RESOURCE: &'static str = "WeatherRecord";
  const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
    ("weatherRecordId", "weather_record_id"),
    ("districtId", "district_id"),
    ("predictYear", "predict_year"),
    ("predictMonth", "predict_month"),
    ("predictWeek", "predict_week"),
  ];
}

#[derive(Debug, Clone)]
pub struct NewWeatherRecord {
  pub district_id:   i64,
  pub predict_year:  i32,
  pub predict_month: u32,
  pub predict_week:  u32,
  pub covariates:    WeatherCovariates,
}

/// Weather rows are unique per prediction slot across every district.
impl CompositeKey for NewWeatherRecord {
  type Key = (u32, u32, i32);
  type Stored = WeatherRecord;

  const RESOURCE: &'static str = "WeatherRecord";

  fn composite_key(&self) -> Self::Key {
    (self.predict_month, self.predict_week, self.predict_year)
  }

  fn key_fields(&self) -> Vec<KeyField> {
    vec![
      KeyField::new("predictMonth", self.predict_month),
      KeyField::new("predictWeek", self.predict_week),
      KeyField::new("predictYear", self.predict_year),
    ]
  }
}
