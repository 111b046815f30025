//! Query-string paging parameters shared by every listing endpoint.

use std::num::NonZeroU32;

use outbreak_core::page::{DEFAULT_PAGE_NUMBER, PageRequest, SortDirection};
use serde::Deserialize;

/// `?pageNumber=&pageSize=&sortBy=&sortOrder=`; all optional.
///
/// A `pageSize` of zero is rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
  pub page_number: Option<u32>,
  pub page_size:   Option<NonZeroU32>,
  pub sort_by:     Option<String>,
  pub sort_order:  Option<SortDirection>,
}

impl PageParams {
  /// Fill in whatever the caller left out.
  pub fn into_request(self, default_sort: &str, default_size: NonZeroU32) -> PageRequest {
    PageRequest::new(
      self.page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
      self.page_size.unwrap_or(default_size),
      self.sort_by.unwrap_or_else(|| default_sort.to_owned()),
      self.sort_order.unwrap_or_default(),
    )
  }
}
