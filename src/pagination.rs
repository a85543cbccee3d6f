use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

/// One page of an already filtered list. Pages are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(per_page)
}

/// Slices `items` for the requested page. Out-of-range pages yield an empty
/// slice rather than an error; `page` 0 is treated as 1.
pub fn paginate<T: Clone>(items: &[T], page: Option<usize>, per_page: Option<usize>) -> Paginated<T> {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let start = (page - 1).saturating_mul(per_page);
    let slice = if start >= items.len() {
        Vec::new()
    } else {
        let end = (start + per_page).min(items.len());
        items[start..end].to_vec()
    };

    Paginated {
        items: slice,
        page,
        per_page,
        total_items: items.len(),
        total_pages: total_pages(items.len(), per_page),
    }
}
