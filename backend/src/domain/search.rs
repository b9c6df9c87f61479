//! Free-text search and paging parameters for listing endpoints.

use pagination::{PageQuery, PageRequest, PageSize};

/// Non-empty search term matched case-insensitively as a substring.
///
/// The term is kept verbatim, surrounding whitespace included.
///
/// # Examples
/// ```
/// use safeplate::domain::SearchTerm;
///
/// let term = SearchTerm::parse(Some("50%_off")).unwrap();
/// assert!(term.matches("Deal: 50%_OFF today"));
/// assert_eq!(term.like_pattern(), r"%50\%\_off%");
/// assert!(SearchTerm::parse(Some("")).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Parse a raw `search` query value; an empty value means no search.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.filter(|value| !value.is_empty())
            .map(|value| Self(value.to_owned()))
    }

    /// Borrow the term.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `haystack` contains the term, ignoring case.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }

    /// `ILIKE` pattern that matches the term literally anywhere in a column.
    ///
    /// `\` is the escape character, so `%`, `_` and `\` in the term lose their
    /// wildcard meaning.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// One page of a listing with an optional search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Requested page.
    pub page: PageRequest,
    /// Optional search filter.
    pub search: Option<SearchTerm>,
}

impl Listing {
    /// Build a listing from query parameters with the endpoint's page size.
    pub fn from_query(query: &PageQuery, size: PageSize) -> Self {
        Self {
            page: query.page_request(size),
            search: SearchTerm::parse(query.search()),
        }
    }

    /// First page, no search.
    pub fn first(size: PageSize) -> Self {
        Self {
            page: PageRequest::first(size),
            search: None,
        }
    }

    /// Whether an item with the given searchable texts belongs in the listing.
    pub fn admits<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> bool {
        match &self.search {
            None => true,
            Some(term) => texts.into_iter().any(|text| term.matches(text)),
        }
    }
}

/// Rows shown per page of the dish and recommendation listings.
pub const DISH_PAGE_SIZE: PageSize = PageSize::clamped(8);

/// Rows shown per page of every other administrative listing.
pub const ADMIN_PAGE_SIZE: PageSize = PageSize::clamped(12);
