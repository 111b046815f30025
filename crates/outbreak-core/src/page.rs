//! Paging, sorting, and the page envelope returned by every listing.

use std::{convert::Infallible, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PAGE_NUMBER: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 50;

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Sort direction. Parsing is lenient: `"asc"` in any case is ascending and
/// every other value is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

impl SortDirection {
  pub fn as_sql(self) -> &'static str {
    match self {
      Self::Asc => "ASC",
      Self::Desc => "DESC",
    }
  }
}

impl FromStr for SortDirection {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.eq_ignore_ascii_case("asc") {
      Ok(Self::Asc)
    } else {
      Ok(Self::Desc)
    }
  }
}

impl From<String> for SortDirection {
  fn from(s: String) -> Self {
    match s.parse() {
      Ok(direction) => direction,
      Err(never) => match never {},
    }
  }
}

/// A type that can be listed through the page executor.
pub trait Sortable {
  /// Resource name used in error details.
  const RESOURCE: &'static str;
  /// `(wire name, storage column)` for every attribute a caller may sort on.
  const SORT_FIELDS: &'static [(&'static str, &'static str)];
}

/// A validated sort: the column is always one listed in
/// [`Sortable::SORT_FIELDS`], so it is safe to splice into a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
  pub column:    &'static str,
  pub direction: SortDirection,
}

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
  /// Zero-based.
  pub page_number: u32,
  pub page_size:   NonZeroU32,
  /// Wire name of the sort attribute, e.g. `"districtId"`.
  pub sort_by:     String,
  pub sort_order:  SortDirection,
}

impl PageRequest {
  pub fn new(
    page_number: u32,
    page_size: NonZeroU32,
    sort_by: impl Into<String>,
    sort_order: SortDirection,
  ) -> Self {
    Self { page_number, page_size, sort_by: sort_by.into(), sort_order }
  }

  /// First page, default size, ascending on `sort_by`.
  pub fn first(sort_by: impl Into<String>) -> Self {
    Self::new(
      DEFAULT_PAGE_NUMBER,
      NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
      sort_by,
      SortDirection::Asc,
    )
  }

  /// Resolve `sort_by` against `T`'s sortable attributes.
  pub fn sort_spec<T: Sortable>(&self) -> Result<SortSpec> {
    T::SORT_FIELDS
      .iter()
      .find(|&&(name, _)| name == self.sort_by)
      .map(|&(_, column)| SortSpec { column, direction: self.sort_order })
      .ok_or_else(|| Error::InvalidSortField {
        resource: T::RESOURCE,
        field:    self.sort_by.clone(),
      })
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.page_number) * u64::from(self.page_size.get())
  }

  pub fn limit(&self) -> u64 { u64::from(self.page_size.get()) }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// One page of results plus the totals needed to walk the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub content:        Vec<T>,
  pub page_number:    u32,
  pub page_size:      u32,
  pub total_elements: u64,
  pub total_pages:    u64,
  pub is_last_page:   bool,
}

impl<T: Sortable> Page<T> {
  /// Wrap one fetched slice in the envelope.
  ///
  /// Fails with [`Error::EmptyResult`] whenever the underlying query matched
  /// nothing, whatever the page number. A page past the end of a non-empty
  /// result is returned empty and marked as the last page.
  pub fn from_slice(
    content: Vec<T>,
    total_elements: u64,
    request: &PageRequest,
  ) -> Result<Self> {
    if total_elements == 0 {
      return Err(Error::EmptyResult { resource: T::RESOURCE });
    }

    let page_size   = request.page_size.get();
    let total_pages = total_elements.div_ceil(u64::from(page_size));

    Ok(Self {
      content,
      page_number: request.page_number,
      page_size,
      total_elements,
      total_pages,
      is_last_page: u64::from(request.page_number) + 1 >= total_pages,
    })
  }
}
