//! Search criteria, their validation and their translation into a request URL.

mod filters;
mod query;

use std::fmt;

use serde::Serialize;

pub use filters::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Gender, JobLevel, JobType, MAX_PAGE_SIZE, PostedWithin,
    Range, SearchFilters, SearchFiltersBuilder, WorkArrangement,
};
pub use query::{SEARCH_ENDPOINT, build_search_url, query_params};

/// One reason a [`SearchFilters`] value cannot be sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InvalidInput {
    EmptyKeyword,
    PageOutOfRange(i32),
    PageSizeOutOfRange(i32),
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKeyword => write!(f, "Keyword cannot be empty"),
            Self::PageOutOfRange(page) => write!(f, "Page must be at least 1, got {page}"),
            Self::PageSizeOutOfRange(size) => write!(
                f,
                "Page size must be between 1 and {MAX_PAGE_SIZE}, got {size}"
            ),
        }
    }
}

/// Check every constraint and report all violations at once.
pub fn validate(filters: &SearchFilters) -> Vec<InvalidInput> {
    let mut problems = Vec::new();
    if filters.keyword.trim().is_empty() {
        problems.push(InvalidInput::EmptyKeyword);
    }
    if filters.page < 1 {
        problems.push(InvalidInput::PageOutOfRange(filters.page));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&filters.page_size) {
        problems.push(InvalidInput::PageSizeOutOfRange(filters.page_size));
    }
    problems
}
