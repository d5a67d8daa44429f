//! Pagination over an already filtered and sorted sequence.

use serde::Serialize;

/// One page of a sequence, plus enough metadata to render the pager.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served (after clamping).
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Total item count before slicing.
    pub total: usize,
}

/// Slice out the 1-based `page` of `items`.
///
/// Page numbers clamp rather than error: below 1 serves page 1, beyond the
/// last serves the last page. An empty input yields zero pages and an empty
/// slice. A zero page size is treated as 1.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);

    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);

    Page {
        items: items.get(start..end).unwrap_or(&[]).to_vec(),
        page,
        page_size,
        total_pages,
        total,
    }
}
