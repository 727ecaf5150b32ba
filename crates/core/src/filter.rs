//! Listing filter criteria shared by the book and user listings.
//!
//! A listing accepts two optional predicates: a free-text search term and a
//! value from a closed enumeration (book status, user role). The enumerated
//! value is validated here, at the boundary. Anything outside the valid set
//! is treated as "no filter" rather than rejected.

/// An enumeration whose values may be used as an equality filter.
pub trait EnumFilter: Copy {
    /// Parse a raw query-string value. Returns `None` for unknown values.
    fn parse_filter(raw: &str) -> Option<Self>;

    /// The exact value stored in the database column.
    fn filter_value(&self) -> &'static str;
}

/// Validated listing criteria. Each predicate is independently optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria<E> {
    search: Option<String>,
    value: Option<E>,
}

impl<E: EnumFilter> FilterCriteria<E> {
    /// Criteria with no predicates: the full listing.
    pub fn all() -> Self {
        Self {
            search: None,
            value: None,
        }
    }

    /// Build criteria from raw query-string values.
    ///
    /// The search term is trimmed and dropped when empty. The enumerated value
    /// is dropped when it is empty or not a member of `E`.
    pub fn from_raw(search: &str, value: &str) -> Self {
        let search = search.trim();
        Self {
            search: (!search.is_empty()).then(|| search.to_string()),
            value: E::parse_filter(value.trim()),
        }
    }

    /// Build criteria from already-typed values.
    pub fn new(search: Option<String>, value: Option<E>) -> Self {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self { search, value }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn value(&self) -> Option<E> {
        self.value
    }

    /// Number of active predicates (0, 1, or 2).
    pub fn active_predicates(&self) -> usize {
        usize::from(self.search.is_some()) + usize::from(self.value.is_some())
    }
}

impl<E: EnumFilter> Default for FilterCriteria<E> {
    fn default() -> Self {
        Self::all()
    }
}

/// Escape `\`, `%` and `_` so a user term matches literally inside `LIKE`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wrap an escaped term as a substring pattern: `%term%`.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}
