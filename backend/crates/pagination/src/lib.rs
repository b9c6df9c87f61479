//! Page-number pagination primitives shared by listing endpoints.
//!
//! Listing endpoints accept a 1-based `page` query parameter together with an
//! optional free-text `search` term and serve a fixed number of rows per page.
//! Raw query values are tolerated rather than rejected: anything that is not a
//! positive integer selects the first page.
//!
//! # Examples
//! ```
//! use pagination::{PageRequest, PageSize};
//!
//! let size = PageSize::clamped(8);
//! let page = PageRequest::parse(Some("3"), size);
//! assert_eq!(page.offset(), 16);
//! assert_eq!(page.limit(), 8);
//!
//! let fallback = PageRequest::parse(Some("-4"), size);
//! assert_eq!(fallback.number(), 1);
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing pagination primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page sizes must hold at least one row.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Number of rows served per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// Validate and construct a page size.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPageSize`] when `rows` is zero.
    pub const fn new(rows: u32) -> Result<Self, PaginationError> {
        match NonZeroU32::new(rows) {
            Some(non_zero) => Ok(Self(non_zero)),
            None => Err(PaginationError::ZeroPageSize),
        }
    }

    /// Construct a page size for constant contexts, treating zero as one row.
    #[must_use]
    pub const fn clamped(rows: u32) -> Self {
        match NonZeroU32::new(rows) {
            Some(non_zero) => Self(non_zero),
            None => Self(NonZeroU32::MIN),
        }
    }

    /// Row count as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

/// A resolved request for one page of a listing.
///
/// ## Invariants
/// - `number` is 1-based and never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    number: NonZeroU32,
    size: PageSize,
}

impl PageRequest {
    /// The first page for the given size.
    #[must_use]
    pub const fn first(size: PageSize) -> Self {
        Self {
            number: NonZeroU32::MIN,
            size,
        }
    }

    /// Resolve a signed page number, mapping zero, negative, and oversized
    /// values to the first page.
    #[must_use]
    pub fn new(number: i64, size: PageSize) -> Self {
        u32::try_from(number)
            .ok()
            .and_then(NonZeroU32::new)
            .map_or_else(|| Self::first(size), |resolved| Self {
                number: resolved,
                size,
            })
    }

    /// Resolve a raw query-string value. Missing or non-numeric input selects
    /// the first page.
    #[must_use]
    pub fn parse(raw: Option<&str>, size: PageSize) -> Self {
        raw.and_then(|value| value.trim().parse::<i64>().ok())
            .map_or_else(|| Self::first(size), |parsed| Self::new(parsed, size))
    }

    /// 1-based page number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number.get()
    }

    /// Rows per page.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// SQL `LIMIT` for this page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.size.get())
    }

    /// SQL `OFFSET` for this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.number.get() - 1) * self.limit()
    }

    /// Apply the page window to an in-memory sequence.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

/// Query-string parameters accepted by paginated listing endpoints.
///
/// `page` is kept as raw text so malformed values fall back to the first page
/// instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// Raw 1-based page number.
    #[serde(default)]
    pub page: Option<String>,
    /// Optional free-text search term.
    #[serde(default)]
    pub search: Option<String>,
}

impl PageQuery {
    /// Resolve the requested page for a fixed page size.
    #[must_use]
    pub fn page_request(&self, size: PageSize) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), size)
    }

    /// Search term as sent, or `None` when absent or empty.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|term| !term.is_empty())
    }
}
