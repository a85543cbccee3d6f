//! Search, status filtering and sorting for the list screens.

use std::cmp::Ordering;

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub trait Searchable {
    /// Text fields matched by the free-text search box.
    fn search_fields(&self) -> Vec<&str>;
}

pub trait HasStatus {
    fn status(&self) -> Option<&str>;
}

/// Case-insensitive substring match over [`Searchable::search_fields`].
/// A blank term keeps everything.
pub fn search_items<T: Searchable + Clone>(items: &[T], term: &str) -> Vec<T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// `None`, an empty string and `"all"` disable the filter.
pub fn filter_by_status<T: HasStatus + Clone>(items: &[T], status: Option<&str>) -> Vec<T> {
    match status.map(str::trim) {
        None | Some("") | Some("all") => items.to_vec(),
        Some(wanted) => items
            .iter()
            .filter(|item| item.status() == Some(wanted))
            .cloned()
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Case-insensitive comparison; missing values sort first.
pub fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or("").to_lowercase();
    let b = b.unwrap_or("").to_lowercase();
    a.cmp(&b)
}

/// Query string shared by the school list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Status code, or `all`
    pub status: Option<String>,
    pub search: Option<String>,
    /// Sort key, specific to each list
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}
